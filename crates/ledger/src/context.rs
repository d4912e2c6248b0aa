use std::collections::BTreeMap;

use crate::{Result, Storage, WriteOp};

/// Per-transaction view of state.
///
/// Reads see the transaction's own writes first, then the backing store. Writes are buffered
/// until the host decides to commit or discard them.
pub struct TxContext<'a, S: Storage + ?Sized> {
    base: &'a S,
    // None marks a delete
    writes: BTreeMap<String, Option<Vec<u8>>>,
}

impl<'a, S: Storage + ?Sized> TxContext<'a, S> {
    pub fn new(base: &'a S) -> Self {
        Self {
            base,
            writes: BTreeMap::new(),
        }
    }

    /// Buffered writes, one per key, in key order
    pub fn write_set(&self) -> Vec<WriteOp> {
        self.writes
            .iter()
            .map(|(key, value)| to_op(key.clone(), value.clone()))
            .collect()
    }

    pub fn into_write_set(self) -> Vec<WriteOp> {
        self.writes
            .into_iter()
            .map(|(key, value)| to_op(key, value))
            .collect()
    }
}

fn to_op(key: String, value: Option<Vec<u8>>) -> WriteOp {
    match value {
        Some(value) => WriteOp::Put { key, value },
        None => WriteOp::Delete { key },
    }
}

impl<'a, S: Storage + ?Sized> Storage for TxContext<'a, S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.writes.get(key) {
            Some(pending) => Ok(pending.clone()),
            None => self.base.get(key),
        }
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.writes.insert(key.to_string(), Some(value.to_vec()));
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.writes.insert(key.to_string(), None);
        Ok(())
    }
}
