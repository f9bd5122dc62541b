use serde::{Serialize, Deserialize};

use crate::core::transaction::{Transaction, TransactionId, Amount};
use crate::core::error::{LedgerError, LedgerResult};

/// What to do when a transaction reuses an id already on the ledger.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Append anyway; callers own idempotency.
    #[default]
    Accept,
    /// Drop the transaction without changing anything.
    Ignore,
    /// Fail with `LedgerError::DuplicateTransactionId`.
    Reject
}

/// Outcome of applying a transaction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Applied {
    Appended,
    Ignored
}

/// A balance overwritten during reconciliation.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Repair {
    pub stored: Amount,
    pub calculated: Amount
}

/// The transactions on record and the running balance cached from them.
///
/// The transactions are authoritative. `balance` is kept equal to their
/// sum by every transition here; only a state decoded from storage may
/// disagree, until `reconcile` is called on it.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct LedgerState {
    transactions: Vec<Transaction>,
    balance: Amount
}

impl LedgerState {
    pub const BALANCE_TOLERANCE: Amount = 0.01;

    pub fn new() -> LedgerState {
        LedgerState::default()
    }

    /// Builds a state as found in storage, without checking the balance.
    pub fn from_parts(transactions: Vec<Transaction>, balance: Amount) -> LedgerState {
        LedgerState { transactions, balance }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn find(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| &t.id == id)
    }

    /// Appends a transaction. Non-finite amounts and balances are refused
    /// before anything changes, since they cannot be persisted.
    pub fn apply(&mut self, transaction: Transaction, policy: DuplicatePolicy) -> LedgerResult<Applied> {
        if !transaction.amount.is_finite() {
            return Err(LedgerError::NonFiniteAmount(transaction.id));
        }

        if policy != DuplicatePolicy::Accept && self.find(&transaction.id).is_some() {
            return match policy {
                DuplicatePolicy::Reject => Err(LedgerError::DuplicateTransactionId(transaction.id)),
                _ => Ok(Applied::Ignored)
            };
        }

        let balance = self.balance + transaction.amount;
        if !balance.is_finite() {
            return Err(LedgerError::BalanceOverflow(transaction.id));
        }

        self.balance = balance;
        self.transactions.push(transaction);
        return Ok(Applied::Appended);
    }

    pub fn clear(&mut self) {
        self.transactions = Vec::new();
        self.balance = 0.0;
    }

    pub fn calculated_balance(&self) -> Amount {
        return self.transactions.iter()
            .map(|t| t.amount).sum();
    }

    pub fn is_consistent(&self, tolerance: Amount) -> bool {
        (self.balance - self.calculated_balance()).abs() <= tolerance
    }

    /// Rebuilds the balance from the transactions when the cached value
    /// is off by more than `tolerance`. Differences within the tolerance
    /// are floating point drift and are left alone.
    pub fn reconcile(&mut self, tolerance: Amount) -> Option<Repair> {
        let calculated = self.calculated_balance();
        if (self.balance - calculated).abs() <= tolerance {
            return None;
        }

        let repair = Repair { stored: self.balance, calculated };
        self.balance = calculated;
        return Some(repair);
    }
}
