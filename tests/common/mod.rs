//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::sync::Arc;
use wager_vault::common::traits::{Ledger, RandomnessSource};
use wager_vault::games::ScriptedRandomness;
use wager_vault::{AccountId, Amount, AssetType, InMemoryLedger, MemoryEventSink, SettlementEngine, WagerConfig};

pub const PLAYER_FUNDS: Amount = 1_000_000;
pub const VAULT_FUNDS: Amount = 100_000;

pub struct World {
    pub ledger: Arc<InMemoryLedger>,
    pub rng: Arc<ScriptedRandomness>,
    pub events: Arc<MemoryEventSink>,
    pub engine: SettlementEngine,
    pub asset: AssetType,
    pub house: AccountId,
    pub player: AccountId,
}

impl World {
    /// Scripted outcomes, a funded player and a funded standard vault owned by `house`
    pub fn new() -> Self {
        Self::with_config(WagerConfig::testing())
    }

    pub fn with_config(config: WagerConfig) -> Self {
        let ledger = Arc::new(InMemoryLedger::new());
        let rng = Arc::new(ScriptedRandomness::default());
        let events = Arc::new(MemoryEventSink::new());
        let asset = config.primary_asset();
        let house = AccountId::new("house");
        let player = AccountId::new("player");

        fund(&ledger, &house, &asset, VAULT_FUNDS * 2);
        fund(&ledger, &player, &asset, PLAYER_FUNDS);

        let engine = SettlementEngine::new(config, ledger.clone(), rng.clone(), events.clone())
            .expect("engine should start");
        engine.create_vault(&house).expect("vault");
        engine.vaults().add_coins(&house, &house, VAULT_FUNDS).expect("fund vault");

        Self {
            ledger,
            rng,
            events,
            engine,
            asset,
            house,
            player,
        }
    }

    pub fn script(&self, outcomes: &[u64]) {
        for outcome in outcomes {
            self.rng.push(*outcome);
        }
    }

    pub fn player_balance(&self) -> Amount {
        self.ledger.balance(&self.player, &self.asset)
    }

    pub fn vault_balance(&self) -> Amount {
        self.engine
            .vaults()
            .custody_balance(&self.house, &self.asset)
            .expect("vault exists")
    }

    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.ledger.balance(account, &self.asset)
    }
}

pub fn fund(ledger: &InMemoryLedger, account: &AccountId, asset: &AssetType, amount: Amount) {
    ledger.open_account(account, asset).expect("open account");
    ledger.credit(account, asset, amount).expect("credit");
}

pub fn shared(randomness: impl RandomnessSource + 'static) -> Arc<dyn RandomnessSource> {
    Arc::new(randomness)
}
