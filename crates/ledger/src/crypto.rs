//! Domain-separated transaction hashing

use crate::{Hash32, LedgerError, Result, WriteOp};

const DOMAIN_TX: &[u8] = b"tx";

/// tx_id = H("tx" || prev_tx_id || height_le || len(name)_le || name || json(write_set))
pub fn tx_id(prev_tx_id: &Hash32, height: u64, tx_name: &str, write_set: &[WriteOp]) -> Result<Hash32> {
    let ops = serde_json::to_vec(write_set).map_err(|e| LedgerError::Serialization(e.to_string()))?;

    let mut hasher = blake3::Hasher::new();
    hasher.update(DOMAIN_TX);
    hasher.update(prev_tx_id);
    hasher.update(&height.to_le_bytes());
    hasher.update(&(tx_name.len() as u64).to_le_bytes());
    hasher.update(tx_name.as_bytes());
    hasher.update(&ops);
    Ok(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put(key: &str, value: &[u8]) -> WriteOp {
        WriteOp::Put { key: key.into(), value: value.to_vec() }
    }

    #[test]
    fn test_tx_id_deterministic() {
        let ops = vec![put("1001", b"{\"value\":1}")];
        let a = tx_id(&[0u8; 32], 1, "createCarQuality", &ops).unwrap();
        let b = tx_id(&[0u8; 32], 1, "createCarQuality", &ops).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_tx_id_binds_every_input() {
        let ops = vec![put("1001", b"{\"value\":1}")];
        let base = tx_id(&[0u8; 32], 1, "createCarQuality", &ops).unwrap();

        assert_ne!(base, tx_id(&[1u8; 32], 1, "createCarQuality", &ops).unwrap());
        assert_ne!(base, tx_id(&[0u8; 32], 2, "createCarQuality", &ops).unwrap());
        assert_ne!(base, tx_id(&[0u8; 32], 1, "updateCarQuality", &ops).unwrap());

        let other = vec![put("1001", b"{\"value\":2}")];
        assert_ne!(base, tx_id(&[0u8; 32], 1, "createCarQuality", &other).unwrap());

        let deleted = vec![WriteOp::Delete { key: "1001".into() }];
        assert_ne!(base, tx_id(&[0u8; 32], 1, "createCarQuality", &deleted).unwrap());
    }
}
