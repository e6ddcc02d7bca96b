//! Shared type definitions for the wager settlement core
//!
//! Canonical identity, asset and amount types used by the vault registries,
//! the ledger collaborators and the settlement engine.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Token amount in the asset's smallest unit
pub type Amount = u64;

/// Denominator for basis-point fee rates (1 bp = 0.01%)
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Account identity (player, vault owner, fee receiver or custody account)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive the custody account that backs `owner`'s vault in a namespace.
    ///
    /// The derivation is deterministic so auditors can recompute where a
    /// vault's funds live from the owner identity alone.
    pub fn derive_custody(namespace_seed: &[u8], owner: &AccountId) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(namespace_seed);
        hasher.update(owner.as_str().as_bytes());
        Self(format!("custody:{}", hex::encode(hasher.finalize())))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Fully-qualified type of a fungible asset
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetType(String);

impl AssetType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Name recorded in typed settlement events
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custody_derivation_is_deterministic() {
        let owner = AccountId::new("0xabc");
        let a = AccountId::derive_custody(b"coin_flip", &owner);
        let b = AccountId::derive_custody(b"coin_flip", &owner);
        assert_eq!(a, b);
        assert!(a.as_str().starts_with("custody:"));
    }

    #[test]
    fn test_custody_derivation_separates_namespaces() {
        let owner = AccountId::new("0xabc");
        let standard = AccountId::derive_custody(b"coin_flip", &owner);
        let delegate = AccountId::derive_custody(b"delegate", &owner);
        assert_ne!(standard, delegate);
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let json = serde_json::to_string(&AssetType::new("0x1::coin::USDC")).unwrap();
        assert_eq!(json, "\"0x1::coin::USDC\"");
    }
}
