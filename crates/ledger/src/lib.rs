//! Ledger State Store
//!
//! Key-addressed state with per-transaction write sets. A transaction runs against a
//! [`TxContext`] overlay and its writes reach the backing [`Storage`] only when it commits.

mod context;
mod crypto;
mod history;
mod storage;
mod types;

pub use context::TxContext;
pub use history::CommitLog;
pub use storage::{FileBackedStorage, InMemoryStorage, Storage};
pub use types::{ChainHead, CommitReceipt, Hash32, WriteOp};

use std::fmt::Display;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Corrupt state file {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("State lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Default number of receipts kept by the commit log
pub const DEFAULT_LOG_CAPACITY: usize = 100;

/// Host ledger: serializes transactions over one backing store
pub struct Ledger<S: Storage> {
    storage: S,
    height: u64,
    last_tx_id: Hash32,
    log: CommitLog,
}

impl<S: Storage> Ledger<S> {
    pub fn new(storage: S) -> Self {
        Self::with_log_capacity(storage, DEFAULT_LOG_CAPACITY)
    }

    /// Continues the chain from the head the storage recorded, if any
    pub fn with_log_capacity(storage: S, capacity: usize) -> Self {
        let (height, last_tx_id) = match storage.head() {
            Some(head) => (head.height, head.tx_id),
            None => (0, [0u8; 32]),
        };
        Self {
            storage,
            height,
            last_tx_id,
            log: CommitLog::new(capacity),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Height of the latest committed transaction
    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn latest_receipt(&self) -> Option<&CommitReceipt> {
        self.log.latest()
    }

    pub fn receipt(&self, tx_id: &Hash32) -> Option<&CommitReceipt> {
        self.log.receipt(tx_id)
    }

    pub fn verify_commit_log(&self) -> bool {
        self.log.verify_chain()
    }

    /// Run `f` as one transaction.
    ///
    /// On `Ok` the write set and the new chain head are handed to the backing store as a single
    /// batch and a receipt is recorded. On `Err` nothing the transaction wrote becomes visible.
    pub fn submit<T, E, F>(&mut self, tx_name: &str, f: F) -> std::result::Result<(T, CommitReceipt), E>
    where
        F: FnOnce(&mut TxContext<'_, S>) -> std::result::Result<T, E>,
        E: From<LedgerError> + Display,
    {
        let mut ctx = TxContext::new(&self.storage);
        let out = match f(&mut ctx) {
            Ok(out) => out,
            Err(e) => {
                warn!(tx = %tx_name, error = %e, "transaction rejected, write set discarded");
                return Err(e);
            }
        };
        let write_set = ctx.into_write_set();

        let height = self.height + 1;
        let tx_id = crypto::tx_id(&self.last_tx_id, height, tx_name, &write_set)?;

        self.storage.commit(&write_set, ChainHead { height, tx_id })?;

        let receipt = CommitReceipt {
            tx_id,
            prev_tx_id: self.last_tx_id,
            tx_name: tx_name.to_string(),
            height,
            write_set,
            timestamp: now(),
        };

        self.height = height;
        self.last_tx_id = tx_id;
        self.log.record(receipt.clone());

        info!(
            tx = %tx_name,
            tx_id = %hex::encode(tx_id),
            prev_tx_id = %hex::encode(receipt.prev_tx_id),
            height,
            keys = ?receipt.write_set.iter().map(WriteOp::key).collect::<Vec<_>>(),
            "transaction committed"
        );

        Ok((out, receipt))
    }

    /// Run `f` as a read-only query. Any writes it makes are dropped.
    pub fn evaluate<T, E, F>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&mut TxContext<'_, S>) -> std::result::Result<T, E>,
    {
        let mut ctx = TxContext::new(&self.storage);
        let out = f(&mut ctx)?;
        let discarded = ctx.into_write_set().len();
        if discarded > 0 {
            debug!(discarded, "query produced writes, dropped");
        }
        Ok(out)
    }
}

fn now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
