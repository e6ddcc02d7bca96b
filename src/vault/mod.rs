//! Owner-scoped vaults
//!
//! A vault pairs an owner with the capability over its custody account.
//! Registries are parameterised by a [`Namespace`] marker so the coin-flip
//! and delegate namespaces are distinct types and can never be mixed up.

pub mod capability;
pub mod registry;

pub use capability::CustodyCapability;
pub use registry::{DelegateVaultRegistry, VaultLease, VaultRegistry};

use crate::common::types::{AccountId, Amount, AssetType};
use crate::ledger::TransferInstruction;

/// Registry namespace marker
pub trait Namespace: Send + Sync + 'static {
    const NAME: &'static str;
    /// Seed mixed into custody account derivation
    const SEED: &'static [u8];
}

/// Namespace of the coin-flip vaults (also the roulette payout namespace)
#[derive(Debug)]
pub struct Standard;

/// Namespace of the fee-splitting delegate vaults
#[derive(Debug)]
pub struct Delegate;

impl Namespace for Standard {
    const NAME: &'static str = "standard";
    const SEED: &'static [u8] = b"wager-vault::coin_flip";
}

impl Namespace for Delegate {
    const NAME: &'static str = "delegate";
    const SEED: &'static [u8] = b"wager-vault::delegate";
}

/// One owner's custody pool
#[derive(Debug)]
pub struct Vault {
    owner: AccountId,
    namespace: &'static str,
    custody_account: AccountId,
    capability: CustodyCapability,
}

impl Vault {
    pub(crate) fn new(owner: AccountId, namespace: &'static str, custody_account: AccountId) -> Self {
        let capability = CustodyCapability::new(custody_account.clone());
        Self {
            owner,
            namespace,
            custody_account,
            capability,
        }
    }

    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    /// Account that receives deposits and stakes
    pub fn custody_account(&self) -> &AccountId {
        &self.custody_account
    }

    /// Stage a transfer out of custody, authorised by this vault's capability
    pub(crate) fn payout(&self, recipient: &AccountId, asset: &AssetType, amount: Amount) -> TransferInstruction {
        TransferInstruction::new(
            self.capability.authorize_debit(),
            recipient.clone(),
            asset.clone(),
            amount,
        )
    }
}
