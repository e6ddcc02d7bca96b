//! Transfer instructions and ledger implementations
//!
//! A [`TransferInstruction`] moves a typed amount from a debit source to a
//! recipient. Debits from a vault's custody account can only be produced by
//! that vault's capability, which lives in the `vault` module.

pub mod memory;

pub use memory::InMemoryLedger;

use crate::common::types::{AccountId, Amount, AssetType};
use serde::Serialize;

/// Source of funds for a single transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Debit {
    account: AccountId,
    custodial: bool,
}

impl Debit {
    /// Debit a holder account, authorised by the holder signing the call
    pub fn holder(account: AccountId) -> Self {
        Self {
            account,
            custodial: false,
        }
    }

    pub(crate) fn custody(account: AccountId) -> Self {
        Self {
            account,
            custodial: true,
        }
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    /// True when the debit was authorised by a vault capability
    pub fn is_custodial(&self) -> bool {
        self.custodial
    }
}

/// What the ledger does with a recipient not yet registered for the asset.
///
/// Registration happens inside the same atomic `execute` as the credit, so a
/// batch that fails leaves no new accounts behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Registration {
    /// Recipient must already be registered
    Existing,
    /// Open a holder account on credit
    OpenHolder,
    /// Open a custody account on credit
    OpenCustody,
}

/// One staged transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferInstruction {
    pub from: Debit,
    pub to: AccountId,
    pub asset: AssetType,
    pub amount: Amount,
    registration: Registration,
}

impl TransferInstruction {
    pub fn new(from: Debit, to: AccountId, asset: AssetType, amount: Amount) -> Self {
        Self {
            from,
            to,
            asset,
            amount,
            registration: Registration::Existing,
        }
    }

    /// Open the recipient as a holder account if it cannot yet receive the asset
    pub fn opening_recipient(mut self) -> Self {
        self.registration = Registration::OpenHolder;
        self
    }

    /// Open the recipient as a custody account. Only vault custody ids are
    /// ever opened this way.
    pub(crate) fn opening_custody(mut self) -> Self {
        self.registration = Registration::OpenCustody;
        self
    }

    pub fn registration(&self) -> Registration {
        self.registration
    }
}
