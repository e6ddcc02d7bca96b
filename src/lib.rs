//! Wager Vault - settlement core for house-banked wagers
//!
//! Vault owners bank coin-flip and roulette games from custody accounts that
//! only the settlement engine can debit. Each wager is validated, its outcome
//! drawn, and every resulting transfer applied in one atomic ledger call.

pub mod common;
pub mod config;
pub mod errors;
pub mod events;
pub mod games;
pub mod ledger;
pub mod logging;
pub mod metrics;
pub mod vault;

pub use common::config::ConfigLoader;
pub use common::traits::{EventSink, Ledger, RandomnessSource};
pub use common::types::{AccountId, Amount, AssetType};
pub use config::WagerConfig;
pub use errors::{LedgerError, RandomnessError, WagerError, WagerResult};
pub use events::{
    BroadcastEventSink, FlipEvent, FlipEventTyped, GameEvent, MemoryEventSink, RouletteEvent, SettlementEvent,
    TracingEventSink,
};
pub use games::SettlementEngine;
pub use ledger::InMemoryLedger;
pub use metrics::SettlementMetrics;
pub use vault::{DelegateVaultRegistry, VaultRegistry};
