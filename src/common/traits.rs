//! Collaborator interfaces
//!
//! The settlement engine depends on three external collaborators through
//! these traits so they can be swapped for real backends or test doubles.

use crate::common::types::{AccountId, Amount, AssetType};
use crate::errors::{LedgerResult, RandomnessError};
use crate::events::SettlementEvent;
use crate::ledger::TransferInstruction;

/// Typed-asset transfer primitive.
///
/// `execute` is all-or-nothing: either every instruction in the slice is
/// applied in order, or the ledger is left exactly as it was and the first
/// failure is returned.
pub trait Ledger: Send + Sync {
    /// Register `asset` for a holder account (idempotent)
    fn open_account(&self, account: &AccountId, asset: &AssetType) -> LedgerResult<()>;

    /// Register `asset` for a custody account. Custody accounts may only be
    /// debited through a vault capability.
    fn open_custody_account(&self, account: &AccountId, asset: &AssetType) -> LedgerResult<()>;

    fn is_registered(&self, account: &AccountId, asset: &AssetType) -> bool;

    /// Current balance; unregistered accounts report zero
    fn balance(&self, account: &AccountId, asset: &AssetType) -> Amount;

    fn execute(&self, instructions: &[TransferInstruction]) -> LedgerResult<()>;
}

/// One drawn outcome and, for verifiable sources, the key of the proof
/// that backs it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    pub value: u64,
    pub proof_ref: Option<String>,
}

/// Source of unbiased outcomes that the caller cannot influence once the
/// wager parameters are fixed.
pub trait RandomnessSource: Send + Sync {
    /// Draw a uniformly distributed integer in `[0, upper)`
    fn draw(&self, upper: u64) -> Result<u64, RandomnessError>;

    /// Draw and report which proof, if any, attests the value
    fn draw_attested(&self, upper: u64) -> Result<Draw, RandomnessError> {
        Ok(Draw {
            value: self.draw(upper)?,
            proof_ref: None,
        })
    }
}

/// Append-only log of settlement outcomes
pub trait EventSink: Send + Sync {
    fn emit(&self, event: SettlementEvent);
}
