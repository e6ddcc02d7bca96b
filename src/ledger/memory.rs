use crate::common::traits::Ledger;
use crate::common::types::{AccountId, Amount, AssetType};
use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::{Registration, TransferInstruction};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

type BalanceKey = (AccountId, AssetType);

#[derive(Default)]
struct LedgerState {
    balances: HashMap<BalanceKey, Amount>,
    custody: HashSet<AccountId>,
}

/// In-process ledger with atomic batch execution.
///
/// Batches are applied against a staged overlay and only committed when
/// every instruction succeeds, so a failed batch leaves no trace.
#[derive(Default)]
pub struct InMemoryLedger {
    state: RwLock<LedgerState>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `amount` into a registered account (simulation and test faucet)
    pub fn credit(&self, account: &AccountId, asset: &AssetType, amount: Amount) -> LedgerResult<()> {
        let mut state = self.state.write();
        let key = (account.clone(), asset.clone());
        let balance = state
            .balances
            .get_mut(&key)
            .ok_or_else(|| LedgerError::NotRegistered {
                account: account.clone(),
                asset: asset.clone(),
            })?;
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::BalanceOverflow(account.clone()))?;
        Ok(())
    }

    /// Sum of every balance held in `asset`
    pub fn total_supply(&self, asset: &AssetType) -> u128 {
        self.state
            .read()
            .balances
            .iter()
            .filter(|((_, a), _)| a == asset)
            .map(|(_, amount)| *amount as u128)
            .sum()
    }

    fn register(&self, account: &AccountId, asset: &AssetType, custodial: bool) {
        let mut state = self.state.write();
        state
            .balances
            .entry((account.clone(), asset.clone()))
            .or_insert(0);
        if custodial {
            state.custody.insert(account.clone());
        }
    }
}

impl Ledger for InMemoryLedger {
    fn open_account(&self, account: &AccountId, asset: &AssetType) -> LedgerResult<()> {
        self.register(account, asset, false);
        Ok(())
    }

    fn open_custody_account(&self, account: &AccountId, asset: &AssetType) -> LedgerResult<()> {
        self.register(account, asset, true);
        Ok(())
    }

    fn is_registered(&self, account: &AccountId, asset: &AssetType) -> bool {
        self.state
            .read()
            .balances
            .contains_key(&(account.clone(), asset.clone()))
    }

    fn balance(&self, account: &AccountId, asset: &AssetType) -> Amount {
        self.state
            .read()
            .balances
            .get(&(account.clone(), asset.clone()))
            .copied()
            .unwrap_or(0)
    }

    fn execute(&self, instructions: &[TransferInstruction]) -> LedgerResult<()> {
        let mut state = self.state.write();
        let mut staged: HashMap<BalanceKey, Amount> = HashMap::new();
        let mut opened_custody: HashSet<AccountId> = HashSet::new();

        for instruction in instructions {
            let source = instruction.from.account();
            let is_custody = state.custody.contains(source) || opened_custody.contains(source);
            if is_custody && !instruction.from.is_custodial() {
                return Err(LedgerError::CustodyViolation(source.clone()));
            }

            let from_key = (source.clone(), instruction.asset.clone());
            let to_key = (instruction.to.clone(), instruction.asset.clone());

            let from_balance = match staged.get(&from_key) {
                Some(balance) => *balance,
                None => *state.balances.get(&from_key).ok_or_else(|| LedgerError::NotRegistered {
                    account: source.clone(),
                    asset: instruction.asset.clone(),
                })?,
            };
            if from_balance < instruction.amount {
                return Err(LedgerError::InsufficientBalance {
                    account: source.clone(),
                    asset: instruction.asset.clone(),
                    required: instruction.amount,
                    available: from_balance,
                });
            }
            staged.insert(from_key, from_balance - instruction.amount);

            let to_balance = match (staged.get(&to_key), state.balances.get(&to_key)) {
                (Some(balance), _) | (None, Some(balance)) => *balance,
                (None, None) => match instruction.registration() {
                    Registration::Existing => {
                        return Err(LedgerError::NotRegistered {
                            account: instruction.to.clone(),
                            asset: instruction.asset.clone(),
                        })
                    }
                    Registration::OpenHolder => 0,
                    Registration::OpenCustody => {
                        opened_custody.insert(instruction.to.clone());
                        0
                    }
                },
            };
            let credited = to_balance
                .checked_add(instruction.amount)
                .ok_or_else(|| LedgerError::BalanceOverflow(instruction.to.clone()))?;
            staged.insert(to_key, credited);
        }

        state.balances.extend(staged);
        state.custody.extend(opened_custody);
        Ok(())
    }
}
