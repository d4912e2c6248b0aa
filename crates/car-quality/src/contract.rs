use ledger::{LedgerError, Storage};
use thiserror::Error;
use tracing::debug;

use crate::{ContractMetadata, QualityRecord};

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("Quality already exists for car {car_id}")]
    DuplicateAsset { car_id: String },

    // The message keeps the historical "[1-100]" wording; 0 is accepted.
    #[error("Quality value has to be a percentage value [1-100], got {value}")]
    InvalidValue { value: i32 },

    #[error("Quality doesn't exist for car {car_id}")]
    AssetNotFound { car_id: String },

    #[error("Stored quality for car {car_id} is malformed: {reason}")]
    MalformedRecord { car_id: String, reason: String },

    #[error("Ledger state error: {0}")]
    State(#[from] LedgerError),
}

pub type Result<T> = std::result::Result<T, ContractError>;

/// Transactions over the car quality asset.
///
/// Each method is one ledger transaction: `state` is the transaction's view of the ledger and
/// every precondition is checked before the single put or delete it may perform.
#[derive(Clone, Copy, Debug, Default)]
pub struct CarQualityContract;

impl CarQualityContract {
    pub fn new() -> Self {
        Self
    }

    pub fn metadata(&self) -> ContractMetadata {
        ContractMetadata::car_quality()
    }

    /// True iff non-empty bytes are stored under `car_id`
    pub fn car_quality_exists<S: Storage + ?Sized>(&self, state: &S, car_id: &str) -> Result<bool> {
        let exists = state.get(car_id)?.is_some_and(|bytes| !bytes.is_empty());
        debug!(car_id, exists, "carQualityExists");
        Ok(exists)
    }

    pub fn create_car_quality<S: Storage + ?Sized>(
        &self,
        state: &mut S,
        car_id: &str,
        value: i32,
    ) -> Result<()> {
        if self.car_quality_exists(&*state, car_id)? {
            return Err(ContractError::DuplicateAsset { car_id: car_id.to_string() });
        }
        check_value(value)?;

        put_record(state, car_id, QualityRecord::new(value))?;
        debug!(car_id, value, "createCarQuality");
        Ok(())
    }

    pub fn read_car_quality<S: Storage + ?Sized>(&self, state: &S, car_id: &str) -> Result<QualityRecord> {
        let bytes = match state.get(car_id)? {
            Some(bytes) if !bytes.is_empty() => bytes,
            _ => return Err(ContractError::AssetNotFound { car_id: car_id.to_string() }),
        };

        QualityRecord::from_bytes(&bytes).map_err(|e| ContractError::MalformedRecord {
            car_id: car_id.to_string(),
            reason: e.to_string(),
        })
    }

    /// Full replace of the stored record. A missing record reports the same
    /// `AssetNotFound` a read would.
    pub fn update_car_quality<S: Storage + ?Sized>(
        &self,
        state: &mut S,
        car_id: &str,
        new_value: i32,
    ) -> Result<()> {
        check_value(new_value)?;
        if !self.car_quality_exists(&*state, car_id)? {
            return Err(ContractError::AssetNotFound { car_id: car_id.to_string() });
        }

        put_record(state, car_id, QualityRecord::new(new_value))?;
        debug!(car_id, new_value, "updateCarQuality");
        Ok(())
    }

    pub fn delete_car_quality<S: Storage + ?Sized>(&self, state: &mut S, car_id: &str) -> Result<()> {
        if !self.car_quality_exists(&*state, car_id)? {
            return Err(ContractError::AssetNotFound { car_id: car_id.to_string() });
        }

        state.delete(car_id)?;
        debug!(car_id, "deleteCarQuality");
        Ok(())
    }
}

fn check_value(value: i32) -> Result<()> {
    if QualityRecord::is_valid_value(value) {
        Ok(())
    } else {
        Err(ContractError::InvalidValue { value })
    }
}

fn put_record<S: Storage + ?Sized>(state: &mut S, car_id: &str, record: QualityRecord) -> Result<()> {
    let bytes = record
        .to_bytes()
        .map_err(|e| LedgerError::Serialization(e.to_string()))?;
    state.put(car_id, &bytes)?;
    Ok(())
}
