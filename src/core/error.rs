use thiserror::Error;

use crate::core::TransactionId;

#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    /// Occurs when the ledger is configured to reject duplicates
    /// and a transaction reuses an id already on the ledger.
    #[error("duplicate transaction id: {0}")]
    DuplicateTransactionId(TransactionId),
    /// Occurs when a transaction amount is infinite or NaN.
    #[error("transaction {0} has a non-finite amount")]
    NonFiniteAmount(TransactionId),
    /// Occurs when adding a transaction would push the balance
    /// beyond the representable range.
    #[error("transaction {0} overflows the balance")]
    BalanceOverflow(TransactionId),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
