use log::{debug, error, info, warn};
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::backend::{KeyValueStore, BackendError, Snapshot, SnapshotError};
use crate::core::{LedgerState, LedgerError, Transaction, DuplicatePolicy, Applied, Amount};

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Name of the blob holding the ledger.
    pub key: String,
    /// Largest balance drift left alone on load.
    pub tolerance: Amount,
    pub duplicates: DuplicatePolicy
}

impl StoreOptions {
    pub const DEFAULT_KEY: &'static str = "balance-storage";
}

impl Default for StoreOptions {
    fn default() -> Self {
        StoreOptions {
            key: Self::DEFAULT_KEY.to_owned(),
            tolerance: LedgerState::BALANCE_TOLERANCE,
            duplicates: DuplicatePolicy::default()
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// The in-memory ledger was updated but could not be written out.
    #[error("change applied but not persisted: {source}")]
    NotDurable {
        #[source]
        source: BackendError
    },
    #[error("could not encode ledger: {0}")]
    Encode(#[from] SnapshotError)
}

pub type StoreResult<T> = Result<T, StoreError>;

/// How the in-memory ledger was obtained from storage.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Rehydration {
    /// Nothing was stored.
    Empty,
    /// Stored state loaded as is.
    Restored { transactions: usize },
    /// Stored state loaded with its balance rebuilt from the transactions.
    Repaired { stored: Amount, calculated: Amount },
    /// The stored blob could not be decoded and was ignored.
    Discarded,
    /// The backend could not be read.
    Unavailable
}

/// A ledger kept in sync with a key-value backend.
///
/// The store only exists rehydrated: `open` loads and reconciles the
/// persisted state before handing out the value, so no mutation can
/// run ahead of rehydration. Every mutation writes the new state
/// through to the backend before returning.
pub struct LedgerStore<S: KeyValueStore> {
    backend: S,
    options: StoreOptions,
    state: LedgerState,
    last_rehydration: Rehydration
}

impl<S: KeyValueStore> LedgerStore<S> {
    pub fn open(backend: S, options: StoreOptions) -> LedgerStore<S> {
        let mut store = LedgerStore {
            backend,
            options,
            state: LedgerState::new(),
            last_rehydration: Rehydration::Empty
        };
        store.rehydrate();
        return store;
    }

    pub fn with_defaults(backend: S) -> LedgerStore<S> {
        LedgerStore::open(backend, StoreOptions::default())
    }

    /// Replaces the in-memory state with what the backend holds.
    ///
    /// Fails open: an unreadable backend or an undecodable blob yields an
    /// empty ledger. Never writes to the backend.
    pub fn rehydrate(&mut self) -> Rehydration {
        let key = &self.options.key;
        let (state, outcome) = match self.backend.get(key) {
            Ok(None) => (LedgerState::new(), Rehydration::Empty),
            Ok(Some(blob)) => match Snapshot::decode(&blob) {
                Ok(mut state) => match state.reconcile(self.options.tolerance) {
                    Some(repair) => {
                        info!("ledger {}: balance {} rebuilt as {} from {} transactions",
                            key, repair.stored, repair.calculated, state.len());
                        (state, Rehydration::Repaired { stored: repair.stored, calculated: repair.calculated })
                    },
                    None => {
                        let transactions = state.len();
                        (state, Rehydration::Restored { transactions })
                    }
                },
                Err(err) => {
                    warn!("ledger {}: discarding stored state: {}", key, err);
                    (LedgerState::new(), Rehydration::Discarded)
                }
            },
            Err(err) => {
                error!("ledger {}: could not read stored state: {}", key, err);
                (LedgerState::new(), Rehydration::Unavailable)
            }
        };

        debug!("ledger {} rehydrated: {:?}", key, outcome);
        self.state = state;
        self.last_rehydration = outcome;
        return outcome;
    }

    pub fn append_transaction(&mut self, transaction: Transaction) -> StoreResult<Applied> {
        debug!("appending {} ({})", transaction.id, transaction.amount);
        let applied = self.state.apply(transaction, self.options.duplicates)?;
        if applied == Applied::Ignored {
            return Ok(applied);
        }
        self.persist()?;
        return Ok(applied);
    }

    pub fn clear_ledger(&mut self) -> StoreResult<()> {
        debug!("clearing ledger {}", self.options.key);
        self.state.clear();
        self.persist()
    }

    fn persist(&self) -> StoreResult<()> {
        let blob = Snapshot::encode(&self.state)?;
        if let Err(source) = self.backend.set(&self.options.key, &blob) {
            error!("ledger {}: change kept in memory only: {}", self.options.key, source);
            return Err(StoreError::NotDurable { source });
        }
        return Ok(());
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn balance(&self) -> Amount {
        self.state.balance()
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.state.transactions()
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn last_rehydration(&self) -> Rehydration {
        self.last_rehydration
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn into_backend(self) -> S {
        self.backend
    }
}
