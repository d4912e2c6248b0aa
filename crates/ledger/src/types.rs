//! Core types for ledger state

use serde::{Deserialize, Serialize};

/// 32-byte hash
pub type Hash32 = [u8; 32];

/// One entry of a transaction's write set
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum WriteOp {
    Put {
        key: String,
        #[serde(with = "hex")]
        value: Vec<u8>,
    },
    Delete {
        key: String,
    },
}

impl WriteOp {
    pub fn key(&self) -> &str {
        match self {
            WriteOp::Put { key, .. } => key,
            WriteOp::Delete { key } => key,
        }
    }
}

/// Receipt for a committed transaction
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommitReceipt {
    #[serde(with = "hex")]
    pub tx_id: Hash32,
    #[serde(with = "hex")]
    pub prev_tx_id: Hash32,
    pub tx_name: String,
    pub height: u64,
    pub write_set: Vec<WriteOp>,
    pub timestamp: u64,
}

/// Latest committed transaction, persisted next to state so the chain survives restarts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainHead {
    pub height: u64,
    #[serde(with = "hex")]
    pub tx_id: Hash32,
}
