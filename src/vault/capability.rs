use crate::common::types::AccountId;
use crate::ledger::Debit;
use std::fmt;

/// Exclusive authority to debit one custody account.
///
/// Not `Clone`, not constructible outside the `vault` module, and the account
/// it guards is never handed out. The only thing it can do is authorise a
/// single debit.
pub struct CustodyCapability {
    account: AccountId,
}

impl CustodyCapability {
    pub(super) fn new(account: AccountId) -> Self {
        Self { account }
    }

    pub(super) fn authorize_debit(&self) -> Debit {
        Debit::custody(self.account.clone())
    }
}

impl fmt::Debug for CustodyCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustodyCapability(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_debits_are_custodial() {
        let capability = CustodyCapability::new(AccountId::new("custody:1"));
        let debit = capability.authorize_debit();
        assert!(debit.is_custodial());
        assert_eq!(debit.account().as_str(), "custody:1");
    }

    #[test]
    fn test_debug_does_not_leak_account() {
        let capability = CustodyCapability::new(AccountId::new("custody:secret"));
        assert!(!format!("{:?}", capability).contains("secret"));
    }
}
