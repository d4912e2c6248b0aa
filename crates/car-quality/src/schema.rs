use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lowest accepted quality score
pub const MIN_QUALITY: i32 = 0;
/// Highest accepted quality score
pub const MAX_QUALITY: i32 = 100;

/// Quality score of one car. The car id is the ledger key, not a field.
///
/// Stored as compact JSON, `{"value":42}`. Other ledger participants read the same bytes,
/// so the field name and layout are fixed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityRecord {
    pub value: i32,
}

impl QualityRecord {
    pub fn new(value: i32) -> Self {
        Self { value }
    }

    pub fn is_valid_value(value: i32) -> bool {
        (MIN_QUALITY..=MAX_QUALITY).contains(&value)
    }

    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Decode stored bytes. Unknown fields are ignored; a missing or non-integer `value` is not.
    ///
    /// Only a JSON object is a record. The derived `Deserialize` would also take the sequence
    /// form `[42]`, so the object is parsed first.
    pub fn from_bytes(bytes: &[u8]) -> serde_json::Result<Self> {
        let object: Map<String, Value> = serde_json::from_slice(bytes)?;
        serde_json::from_value(Value::Object(object))
    }
}
