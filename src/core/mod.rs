pub mod transaction;
pub mod ledger;
pub mod error;

pub use transaction::{Transaction, TransactionId, Amount};
pub use ledger::{LedgerState, DuplicatePolicy, Applied, Repair};
pub use error::{LedgerError, LedgerResult};
