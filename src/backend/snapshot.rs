//! Encoding of the persisted ledger projection.
//!
//! Only the transactions and the cached balance are written, wrapped in
//! a `{ "state": ..., "version": n }` envelope. A bare
//! `{ "transactions": ..., "balance": ... }` object is accepted on read,
//! and so is either form encoded a second time as a JSON string, which is
//! what javascript clients of the same storage key produce.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::LedgerState;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unsupported snapshot version {found}, newest known is {supported}")]
    UnsupportedVersion { found: u32, supported: u32 }
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    state: &'a LedgerState,
    version: u32
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Stored {
    Envelope {
        state: LedgerState,
        #[serde(default)]
        version: u32
    },
    Bare(LedgerState)
}

pub struct Snapshot;

impl Snapshot {
    pub const VERSION: u32 = 0;

    pub fn encode(state: &LedgerState) -> Result<String, SnapshotError> {
        let envelope = EnvelopeRef { state, version: Self::VERSION };
        return Ok(serde_json::to_string(&envelope)?);
    }

    /// Decodes a stored blob. The returned balance is exactly what was
    /// stored; reconciling it is left to the caller.
    pub fn decode(blob: &str) -> Result<LedgerState, SnapshotError> {
        let stored = match serde_json::from_str::<Stored>(blob) {
            Ok(stored) => stored,
            Err(err) => match serde_json::from_str::<String>(blob) {
                Ok(inner) => serde_json::from_str::<Stored>(&inner)?,
                Err(_) => return Err(err.into())
            }
        };

        match stored {
            Stored::Envelope { version, .. } if version > Self::VERSION => {
                Err(SnapshotError::UnsupportedVersion { found: version, supported: Self::VERSION })
            },
            Stored::Envelope { state, .. } => Ok(state),
            Stored::Bare(state) => Ok(state)
        }
    }
}
