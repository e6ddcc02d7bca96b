//! Loading configuration from disk and running an engine with it

mod common;

use common::{fund, shared};
use std::io::Write;
use std::sync::Arc;
use wager_vault::common::traits::Ledger;
use wager_vault::games::ScriptedRandomness;
use wager_vault::{AccountId, ConfigLoader, InMemoryLedger, MemoryEventSink, SettlementEngine, WagerError};

#[test]
fn test_engine_uses_file_configuration() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[assets]
primary = "TOKEN"

[delegate]
fee_bps = 200
fee_receiver = "treasury"

[roulette]
house_account = "croupier"
"#
    )
    .unwrap();

    let config = ConfigLoader::new().with_path(file.path()).load().unwrap();
    assert_eq!(config.assets.primary, "TOKEN");
    assert_eq!(config.flip.fee_bps, 250);

    let asset = config.primary_asset();
    let ledger = Arc::new(InMemoryLedger::new());
    let owner = AccountId::new("owner");
    let player = AccountId::new("player");
    fund(&ledger, &owner, &asset, 100_000);
    fund(&ledger, &player, &asset, 100_000);

    let engine = SettlementEngine::new(
        config,
        ledger.clone(),
        shared(ScriptedRandomness::new([0, 0])),
        Arc::new(MemoryEventSink::new()),
    )
    .unwrap();
    engine.create_delegate_vault(&owner).unwrap();
    engine.delegate_vaults().add_coins(&owner, &owner, 50_000).unwrap();
    engine.create_vault(&owner).unwrap();

    engine.play_delegate(&player, 1_000, &owner, &asset).unwrap();
    assert_eq!(ledger.balance(&AccountId::new("treasury"), &asset), 20);

    engine.play_roulette(&player, 100, &[5], &owner, &asset).unwrap();
    assert_eq!(ledger.balance(&AccountId::new("croupier"), &asset), 100);
}

#[test]
fn test_missing_file_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let err = ConfigLoader::new()
        .with_path(dir.path().join("absent.toml"))
        .load()
        .unwrap_err();
    assert!(matches!(err, WagerError::Configuration(_)));
}

#[test]
fn test_engine_refuses_invalid_configuration() {
    let mut config = wager_vault::WagerConfig::testing();
    config.flip.fee_bps = 10_000;

    let result = SettlementEngine::new(
        config,
        Arc::new(InMemoryLedger::new()),
        shared(ScriptedRandomness::default()),
        Arc::new(MemoryEventSink::new()),
    );
    assert!(matches!(result, Err(WagerError::Configuration(_))));
}
