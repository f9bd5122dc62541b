mod core;
pub mod backend;
mod store;

pub use crate::core::{LedgerState, Transaction, TransactionId, Amount};
pub use crate::core::{ledger, transaction, error};
pub use crate::store::{LedgerStore, StoreOptions, StoreError, StoreResult, Rehydration};
