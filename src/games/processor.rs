use crate::common::traits::{Draw, EventSink, Ledger, RandomnessSource};
use crate::common::types::{AccountId, Amount, AssetType};
use crate::config::WagerConfig;
use crate::errors::{WagerError, WagerResult};
use crate::events::{GameEvent, SettlementEvent};
use crate::games::settlement::TransferBatch;
use crate::metrics::SettlementMetrics;
use crate::vault::{DelegateVaultRegistry, VaultRegistry};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Orchestrates single wagers: validation, outcome draw, staged transfers,
/// atomic execution and event emission.
///
/// Game entry points live in `coin_flip` and `roulette`.
pub struct SettlementEngine {
    pub(super) config: WagerConfig,
    pub(super) ledger: Arc<dyn Ledger>,
    randomness: Arc<dyn RandomnessSource>,
    events: Arc<dyn EventSink>,
    pub(super) vaults: Arc<VaultRegistry>,
    pub(super) delegate_vaults: Arc<DelegateVaultRegistry>,
    metrics: Arc<SettlementMetrics>,
}

impl SettlementEngine {
    /// Build an engine with fresh vault registries on `ledger`.
    ///
    /// The delegate fee receiver and the roulette house account are opened
    /// for the primary asset so stakes and fees always have a destination.
    pub fn new(
        config: WagerConfig,
        ledger: Arc<dyn Ledger>,
        randomness: Arc<dyn RandomnessSource>,
        events: Arc<dyn EventSink>,
    ) -> WagerResult<Self> {
        config.validate()?;

        let primary = config.primary_asset();
        ledger.open_account(&config.fee_receiver(), &primary)?;
        ledger.open_account(&config.house_account(), &primary)?;

        let vaults = Arc::new(VaultRegistry::new(ledger.clone(), primary.clone()));
        let delegate_vaults = Arc::new(DelegateVaultRegistry::new(ledger.clone(), primary));

        info!(
            primary_asset = %config.assets.primary,
            flip_fee_bps = config.flip.fee_bps,
            delegate_fee_bps = config.delegate.fee_bps,
            "Settlement engine ready"
        );

        Ok(Self {
            config,
            ledger,
            randomness,
            events,
            vaults,
            delegate_vaults,
            metrics: Arc::new(SettlementMetrics::new()),
        })
    }

    pub fn config(&self) -> &WagerConfig {
        &self.config
    }

    pub fn vaults(&self) -> &Arc<VaultRegistry> {
        &self.vaults
    }

    pub fn delegate_vaults(&self) -> &Arc<DelegateVaultRegistry> {
        &self.delegate_vaults
    }

    pub fn metrics(&self) -> &Arc<SettlementMetrics> {
        &self.metrics
    }

    pub fn create_vault(&self, owner: &AccountId) -> WagerResult<()> {
        self.vaults.create_vault(owner)
    }

    pub fn create_delegate_vault(&self, owner: &AccountId) -> WagerResult<()> {
        self.delegate_vaults.create_vault(owner)
    }

    pub(super) fn ensure_funds(&self, player: &AccountId, asset: &AssetType, required: Amount) -> WagerResult<()> {
        let available = self.ledger.balance(player, asset);
        if available < required {
            return Err(WagerError::InsufficientFunds {
                account: player.clone(),
                required,
                available,
            });
        }
        Ok(())
    }

    /// Draw the outcome. Callers must have fixed every amount beforehand.
    pub(super) fn draw(&self, upper: u64) -> WagerResult<Draw> {
        let draw = self.randomness.draw_attested(upper)?;
        debug!(upper, outcome = draw.value, proof = ?draw.proof_ref, "Outcome drawn");
        Ok(draw)
    }

    /// Execute the staged batch, then record and publish the result
    pub(super) fn commit(
        &self,
        batch: TransferBatch,
        game: GameEvent,
        proof_ref: Option<String>,
        stake: Amount,
        fee: Amount,
        payout: Option<Amount>,
    ) -> WagerResult<()> {
        batch.execute(self.ledger.as_ref())?;

        self.metrics.record_settled(stake, fee, payout);
        info!(
            player = %game.player(),
            amount_bet = game.amount_bet(),
            is_won = game.is_won(),
            "Wager settled"
        );
        self.events.emit(SettlementEvent::new(game).with_proof_ref(proof_ref));
        Ok(())
    }

    /// Count and log a rejected wager on the way out
    pub(super) fn observe<T>(&self, game: &'static str, result: WagerResult<T>) -> WagerResult<T> {
        if let Err(ref e) = result {
            self.metrics.record_rejected();
            warn!(game, error = %e, "Wager rejected");
        }
        result
    }
}
