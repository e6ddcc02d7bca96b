//! Game settlement
//!
//! Coin-flip (standard, multi-asset, delegate) and roulette entry points on
//! [`SettlementEngine`], the odds math they share, and the randomness sources
//! that decide outcomes.

pub mod coin_flip;
pub mod odds;
pub mod processor;
pub mod randomness;
pub mod roulette;
pub mod settlement;
pub mod vrf_engine;

pub use processor::SettlementEngine;
pub use randomness::{OsRandomness, ScriptedRandomness, SeededRandomness};
pub use settlement::{Obligations, TransferBatch};
pub use vrf_engine::{VrfProof, VrfRandomness, DEFAULT_PROOF_RETENTION};
