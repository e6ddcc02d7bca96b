use crate::common::traits::Ledger;
use crate::common::types::{AccountId, Amount, AssetType};
use crate::errors::{WagerError, WagerResult};
use crate::games::settlement::TransferBatch;
use crate::ledger::{Debit, TransferInstruction};
use crate::vault::{Delegate, Namespace, Standard, Vault};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex};
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;
use tracing::{debug, info};

/// Exclusive, owned hold on one vault for the duration of a settlement.
///
/// Mutations of a vault's custody balance are serialised through leases, so
/// two settlements against the same vault never act on a stale balance.
pub struct VaultLease {
    guard: ArcMutexGuard<RawMutex, Vault>,
}

impl Deref for VaultLease {
    type Target = Vault;

    fn deref(&self) -> &Vault {
        &self.guard
    }
}

/// Owner → vault store for one namespace
pub struct VaultRegistry<N: Namespace = Standard> {
    ledger: Arc<dyn Ledger>,
    primary_asset: AssetType,
    vaults: DashMap<AccountId, Arc<Mutex<Vault>>>,
    _namespace: PhantomData<N>,
}

/// Registry of fee-splitting delegate vaults
pub type DelegateVaultRegistry = VaultRegistry<Delegate>;

impl<N: Namespace> VaultRegistry<N> {
    pub fn new(ledger: Arc<dyn Ledger>, primary_asset: AssetType) -> Self {
        Self {
            ledger,
            primary_asset,
            vaults: DashMap::new(),
            _namespace: PhantomData,
        }
    }

    pub fn namespace(&self) -> &'static str {
        N::NAME
    }

    /// Create the vault for `owner`, opening its custody account with the
    /// primary asset registered. A second call for the same owner fails.
    pub fn create_vault(&self, owner: &AccountId) -> WagerResult<()> {
        match self.vaults.entry(owner.clone()) {
            Entry::Occupied(_) => Err(WagerError::VaultAlreadyExists {
                namespace: N::NAME,
                owner: owner.clone(),
            }),
            Entry::Vacant(slot) => {
                let custody_account = AccountId::derive_custody(N::SEED, owner);
                self.ledger
                    .open_custody_account(&custody_account, &self.primary_asset)?;

                info!(
                    namespace = N::NAME,
                    owner = %owner,
                    custody = %custody_account,
                    "Vault created"
                );
                slot.insert(Arc::new(Mutex::new(Vault::new(
                    owner.clone(),
                    N::NAME,
                    custody_account,
                ))));
                Ok(())
            }
        }
    }

    pub fn contains(&self, owner: &AccountId) -> bool {
        self.vaults.contains_key(owner)
    }

    pub fn len(&self) -> usize {
        self.vaults.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vaults.is_empty()
    }

    /// Custody account backing `owner`'s vault. Does not take the lease.
    pub fn custody_account(&self, owner: &AccountId) -> WagerResult<AccountId> {
        if !self.contains(owner) {
            return Err(self.not_found(owner));
        }
        Ok(AccountId::derive_custody(N::SEED, owner))
    }

    pub fn custody_balance(&self, owner: &AccountId, asset: &AssetType) -> WagerResult<Amount> {
        let custody = self.custody_account(owner)?;
        Ok(self.ledger.balance(&custody, asset))
    }

    /// Deposit the primary asset from `from` into `owner`'s vault
    pub fn add_coins(&self, from: &AccountId, owner: &AccountId, amount: Amount) -> WagerResult<()> {
        let asset = self.primary_asset.clone();
        self.add_coins_typed(from, owner, amount, &asset)
    }

    /// Deposit any asset, registering it in the custody account on first use
    pub fn add_coins_typed(
        &self,
        from: &AccountId,
        owner: &AccountId,
        amount: Amount,
        asset: &AssetType,
    ) -> WagerResult<()> {
        let lease = self.lease(owner)?;

        let available = self.ledger.balance(from, asset);
        if available < amount {
            return Err(WagerError::InsufficientFunds {
                account: from.clone(),
                required: amount,
                available,
            });
        }

        self.ledger.execute(&[TransferInstruction::new(
            Debit::holder(from.clone()),
            lease.custody_account().clone(),
            asset.clone(),
            amount,
        )
        .opening_custody()])?;

        debug!(namespace = N::NAME, owner = %owner, from = %from, amount, asset = %asset, "Coins added");
        Ok(())
    }

    /// Withdraw the primary asset from `owner`'s vault back to `owner`.
    ///
    /// The caller must be `owner`; resolving the capability through the
    /// owner key is what authorises the debit.
    pub fn withdraw_coins(&self, owner: &AccountId, amount: Amount) -> WagerResult<()> {
        let asset = self.primary_asset.clone();
        self.withdraw_coins_typed(owner, amount, &asset)
    }

    pub fn withdraw_coins_typed(&self, owner: &AccountId, amount: Amount, asset: &AssetType) -> WagerResult<()> {
        let lease = self.lease(owner)?;
        self.ledger
            .execute(&[lease.payout(owner, asset, amount)])?;

        info!(namespace = N::NAME, owner = %owner, amount, asset = %asset, "Coins withdrawn");
        Ok(())
    }

    /// Take the exclusive lease on `owner`'s vault, blocking until any
    /// in-flight settlement against it has finished.
    pub(crate) fn lease(&self, owner: &AccountId) -> WagerResult<VaultLease> {
        let cell = self
            .vaults
            .get(owner)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| self.not_found(owner))?;

        Ok(VaultLease {
            guard: cell.lock_arc(),
        })
    }

    /// Cross-game payout hook, reserved for the settlement engine.
    ///
    /// Stages `amount` from `vault_owner`'s custody to `recipient` in this
    /// namespace. The vault's lease is taken (or reused if the batch already
    /// holds it) and stays with the batch until it executes.
    pub(crate) fn transfer(
        &self,
        batch: &mut TransferBatch,
        amount: Amount,
        vault_owner: &AccountId,
        recipient: &AccountId,
        asset: &AssetType,
    ) -> WagerResult<()> {
        if !batch.holds(N::NAME, vault_owner) {
            let lease = self.lease(vault_owner)?;
            batch.hold(lease);
        }

        let instruction = batch
            .lease(N::NAME, vault_owner)
            .map(|lease| lease.payout(recipient, asset, amount))
            .ok_or_else(|| self.not_found(vault_owner))?;
        batch.stage(instruction);
        Ok(())
    }

    fn not_found(&self, owner: &AccountId) -> WagerError {
        WagerError::VaultNotFound {
            namespace: N::NAME,
            owner: owner.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryLedger;

    fn native() -> AssetType {
        AssetType::new("NATIVE")
    }

    fn setup() -> (Arc<InMemoryLedger>, VaultRegistry<Standard>, AccountId) {
        let ledger = Arc::new(InMemoryLedger::new());
        let registry = VaultRegistry::<Standard>::new(ledger.clone(), native());
        let funder = AccountId::new("funder");
        ledger.open_account(&funder, &native()).unwrap();
        ledger.credit(&funder, &native(), 1_000).unwrap();
        (ledger, registry, funder)
    }

    #[test]
    fn test_create_vault_twice_fails_without_state_change() {
        let (ledger, registry, _) = setup();
        let owner = AccountId::new("owner");

        registry.create_vault(&owner).unwrap();
        let custody = registry.custody_account(&owner).unwrap();

        let second = registry.create_vault(&owner);
        assert!(matches!(second, Err(WagerError::VaultAlreadyExists { .. })));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.custody_account(&owner).unwrap(), custody);
        assert!(ledger.is_registered(&custody, &native()));
    }

    #[test]
    fn test_namespaces_do_not_resolve_each_other() {
        let (ledger, standard, _) = setup();
        let delegate = DelegateVaultRegistry::new(ledger, native());
        let owner = AccountId::new("owner");

        standard.create_vault(&owner).unwrap();

        assert!(matches!(
            delegate.custody_account(&owner),
            Err(WagerError::VaultNotFound { namespace: "delegate", .. })
        ));
        delegate.create_vault(&owner).unwrap();
        assert_ne!(
            standard.custody_account(&owner).unwrap(),
            delegate.custody_account(&owner).unwrap()
        );
    }

    #[test]
    fn test_add_and_withdraw_coins() {
        let (ledger, registry, funder) = setup();
        let owner = funder.clone();
        registry.create_vault(&owner).unwrap();

        registry.add_coins(&funder, &owner, 600).unwrap();
        assert_eq!(registry.custody_balance(&owner, &native()).unwrap(), 600);
        assert_eq!(ledger.balance(&funder, &native()), 400);

        registry.withdraw_coins(&owner, 250).unwrap();
        assert_eq!(registry.custody_balance(&owner, &native()).unwrap(), 350);
        assert_eq!(ledger.balance(&owner, &native()), 650);
    }

    #[test]
    fn test_add_coins_errors() {
        let (_, registry, funder) = setup();
        let owner = AccountId::new("owner");

        assert!(matches!(
            registry.add_coins(&funder, &owner, 1),
            Err(WagerError::VaultNotFound { .. })
        ));

        registry.create_vault(&owner).unwrap();
        assert!(matches!(
            registry.add_coins(&funder, &owner, 1_001),
            Err(WagerError::InsufficientFunds { required: 1_001, available: 1_000, .. })
        ));
    }

    #[test]
    fn test_over_withdrawal_leaves_balances_unchanged() {
        let (ledger, registry, funder) = setup();
        registry.create_vault(&funder).unwrap();
        registry.add_coins(&funder, &funder, 300).unwrap();

        let result = registry.withdraw_coins(&funder, 301);

        assert!(matches!(result, Err(WagerError::TransferFailed(_))));
        assert_eq!(registry.custody_balance(&funder, &native()).unwrap(), 300);
        assert_eq!(ledger.balance(&funder, &native()), 700);
    }

    #[test]
    fn test_add_coins_registers_new_asset() {
        let (ledger, registry, funder) = setup();
        let usdc = AssetType::new("USDC");
        ledger.open_account(&funder, &usdc).unwrap();
        ledger.credit(&funder, &usdc, 50).unwrap();
        registry.create_vault(&funder).unwrap();

        registry.add_coins_typed(&funder, &funder, 50, &usdc).unwrap();

        assert_eq!(registry.custody_balance(&funder, &usdc).unwrap(), 50);
        registry.withdraw_coins_typed(&funder, 20, &usdc).unwrap();
        assert_eq!(ledger.balance(&funder, &usdc), 20);
    }

    #[test]
    fn test_transfer_hook_reuses_held_lease() {
        let (ledger, registry, funder) = setup();
        registry.create_vault(&funder).unwrap();
        registry.add_coins(&funder, &funder, 500).unwrap();
        let winner = AccountId::new("winner");
        ledger.open_account(&winner, &native()).unwrap();

        let mut batch = TransferBatch::new();
        batch.hold(registry.lease(&funder).unwrap());
        registry
            .transfer(&mut batch, 120, &funder, &winner, &native())
            .unwrap();
        batch.execute(ledger.as_ref()).unwrap();

        assert_eq!(ledger.balance(&winner, &native()), 120);
        assert_eq!(registry.custody_balance(&funder, &native()).unwrap(), 380);
    }
}
