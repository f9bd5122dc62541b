mod interface;
mod json_store;
mod memory;
mod snapshot;

pub use interface::{KeyValueStore, Result, BackendError};
pub use json_store::JsonStore;
pub use memory::MemoryStore;
pub use snapshot::{Snapshot, SnapshotError};
