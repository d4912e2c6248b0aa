//! Storage trait and implementations

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::debug;

use serde::{Deserialize, Serialize};

use crate::{ChainHead, LedgerError, Result, WriteOp};

/// Key-addressed state: opaque byte values under string keys
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn put(&mut self, key: &str, value: &[u8]) -> Result<()>;
    fn delete(&mut self, key: &str) -> Result<()>;

    /// Apply a committed write set in order
    fn apply(&mut self, ops: &[WriteOp]) -> Result<()> {
        for op in ops {
            match op {
                WriteOp::Put { key, value } => self.put(key, value)?,
                WriteOp::Delete { key } => self.delete(key)?,
            }
        }
        Ok(())
    }

    /// Chain head recorded by the last commit, for stores that keep one
    fn head(&self) -> Option<ChainHead> {
        None
    }

    /// Apply a committed write set together with the chain head it produced
    fn commit(&mut self, ops: &[WriteOp], _head: ChainHead) -> Result<()> {
        self.apply(ops)
    }
}

/// In-memory storage (for testing and demos)
///
/// Clones share the same map, so a test can keep a handle while a ledger owns another.
#[derive(Clone)]
pub struct InMemoryStorage {
    data: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Storage seeded with the given entries
    pub fn with_entries<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Vec<u8>>,
        I: IntoIterator<Item = (K, V)>,
    {
        let data = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            data: Arc::new(RwLock::new(data)),
        }
    }

    pub fn len(&self) -> Result<usize> {
        let data = self.data.read().map_err(|_| LedgerError::Poisoned)?;
        Ok(data.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Sorted copy of the current state
    pub fn snapshot(&self) -> Result<BTreeMap<String, Vec<u8>>> {
        let data = self.data.read().map_err(|_| LedgerError::Poisoned)?;
        Ok(data.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for InMemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let data = self.data.read().map_err(|_| LedgerError::Poisoned)?;
        Ok(data.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<()> {
        let mut data = self.data.write().map_err(|_| LedgerError::Poisoned)?;
        data.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        let mut data = self.data.write().map_err(|_| LedgerError::Poisoned)?;
        data.remove(key);
        Ok(())
    }
}

/// State persisted to a JSON file:
///
/// ```json
/// { "head": { "height": 2, "tx_id": "<hex>" }, "state": { "<key>": "<hex value>" } }
/// ```
///
/// `head` sits beside `state`, never inside it, so it cannot collide with a key. The whole file
/// is rewritten through a temp file and a rename, once per put, delete or committed batch.
pub struct FileBackedStorage {
    path: PathBuf,
    head: Option<ChainHead>,
    data: BTreeMap<String, Vec<u8>>,
}

#[derive(Serialize)]
struct StateFileRef<'a> {
    head: Option<ChainHead>,
    state: BTreeMap<&'a str, String>,
}

#[derive(Deserialize)]
struct StateFile {
    #[serde(default)]
    head: Option<ChainHead>,
    state: BTreeMap<String, String>,
}

impl FileBackedStorage {
    /// Open the state file at `path`. A missing file means empty state.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let (head, data) = match fs::read(&path) {
            Ok(bytes) => decode_file(&path, &bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => (None, BTreeMap::new()),
            Err(source) => return Err(LedgerError::Io { path, source }),
        };
        debug!(
            path = %path.display(),
            entries = data.len(),
            height = head.map(|h| h.height).unwrap_or(0),
            "state file opened"
        );
        Ok(Self { path, head, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // Stage on a copy so a failed write leaves memory and disk in agreement.
    fn write(&mut self, ops: &[WriteOp], head: Option<ChainHead>) -> Result<()> {
        let mut next = self.data.clone();
        for op in ops {
            match op {
                WriteOp::Put { key, value } => {
                    next.insert(key.clone(), value.clone());
                }
                WriteOp::Delete { key } => {
                    next.remove(key);
                }
            }
        }
        self.persist(head, &next)?;
        self.head = head;
        self.data = next;
        Ok(())
    }

    fn persist(&self, head: Option<ChainHead>, data: &BTreeMap<String, Vec<u8>>) -> Result<()> {
        let file = StateFileRef {
            head,
            state: data
                .iter()
                .map(|(k, v)| (k.as_str(), hex::encode(v)))
                .collect(),
        };
        let bytes = serde_json::to_vec_pretty(&file)
            .map_err(|e| LedgerError::Serialization(e.to_string()))?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, bytes).map_err(|source| LedgerError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| LedgerError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

fn decode_file(path: &Path, bytes: &[u8]) -> Result<(Option<ChainHead>, BTreeMap<String, Vec<u8>>)> {
    let corrupt = |reason: String| LedgerError::Corrupt {
        path: path.to_path_buf(),
        reason,
    };

    let file: StateFile = serde_json::from_slice(bytes).map_err(|e| corrupt(e.to_string()))?;
    let data: BTreeMap<String, Vec<u8>> = file
        .state
        .into_iter()
        .map(|(k, v)| {
            let value = hex::decode(&v).map_err(|e| corrupt(format!("key {k}: {e}")))?;
            Ok((k, value))
        })
        .collect::<Result<_>>()?;
    Ok((file.head, data))
}

impl Storage for FileBackedStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.data.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.apply(&[WriteOp::Put {
            key: key.to_string(),
            value: value.to_vec(),
        }])
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.apply(&[WriteOp::Delete {
            key: key.to_string(),
        }])
    }

    fn apply(&mut self, ops: &[WriteOp]) -> Result<()> {
        self.write(ops, self.head)
    }

    fn head(&self) -> Option<ChainHead> {
        self.head
    }

    fn commit(&mut self, ops: &[WriteOp], head: ChainHead) -> Result<()> {
        self.write(ops, Some(head))
    }
}
