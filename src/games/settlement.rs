//! Staged settlement
//!
//! A wager's transfers are staged into a [`TransferBatch`] once every
//! precondition has been checked and the outcome drawn, then handed to the
//! ledger in one atomic call. Vault leases taken while staging ride along
//! with the batch and are released only after it has executed.

use crate::common::traits::Ledger;
use crate::common::types::{AccountId, Amount, AssetType};
use crate::errors::WagerResult;
use crate::ledger::TransferInstruction;
use crate::vault::VaultLease;
use tracing::debug;

#[derive(Default)]
pub struct TransferBatch {
    instructions: Vec<TransferInstruction>,
    leases: Vec<VaultLease>,
}

impl TransferBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&mut self, instruction: TransferInstruction) {
        debug!(
            from = %instruction.from.account(),
            to = %instruction.to,
            asset = %instruction.asset,
            amount = instruction.amount,
            "Transfer staged"
        );
        self.instructions.push(instruction);
    }

    pub(crate) fn hold(&mut self, lease: VaultLease) {
        self.leases.push(lease);
    }

    pub(crate) fn holds(&self, namespace: &str, owner: &AccountId) -> bool {
        self.lease(namespace, owner).is_some()
    }

    pub(crate) fn lease(&self, namespace: &str, owner: &AccountId) -> Option<&VaultLease> {
        self.leases
            .iter()
            .find(|lease| lease.namespace() == namespace && lease.owner() == owner)
    }

    pub fn instructions(&self) -> &[TransferInstruction] {
        &self.instructions
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Total staged out of `account` in `asset`
    pub fn debits_from(&self, account: &AccountId, asset: &AssetType) -> u128 {
        self.instructions
            .iter()
            .filter(|i| i.from.account() == account && &i.asset == asset)
            .map(|i| i.amount as u128)
            .sum()
    }

    /// Total staged into `account` in `asset`
    pub fn credits_to(&self, account: &AccountId, asset: &AssetType) -> u128 {
        self.instructions
            .iter()
            .filter(|i| &i.to == account && &i.asset == asset)
            .map(|i| i.amount as u128)
            .sum()
    }

    /// Execute every staged transfer atomically, then release the leases
    pub fn execute(self, ledger: &dyn Ledger) -> WagerResult<()> {
        ledger.execute(&self.instructions)?;
        Ok(())
    }
}

/// Amounts locked in before the outcome is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Obligations {
    /// Debited from the player into the stake account
    pub stake_debit: Amount,
    /// Debited from the player into the external fee receiver
    pub fee_debit: Amount,
    /// Paid to the player if the wager wins
    pub payout: Amount,
}

impl Obligations {
    pub fn player_debit(&self) -> WagerResult<Amount> {
        self.stake_debit
            .checked_add(self.fee_debit)
            .ok_or(crate::errors::WagerError::AmountOverflow("player debit"))
    }
}
