//! By-name transaction entry point.
//!
//! A peer hands the contract a function name and string arguments and expects a byte payload
//! back. This module maps that onto [`CarQualityContract`].

use ledger::{LedgerError, Storage};
use thiserror::Error;

use crate::{
    CarQualityContract, ContractError, ContractMetadata, TX_CREATE, TX_DELETE, TX_EXISTS, TX_READ,
    TX_UPDATE,
};

/// System function returning the contract metadata
pub const GET_METADATA: &str = "org.hyperledger.fabric:GetMetadata";

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown transaction function: {0}")]
    UnknownFunction(String),

    #[error("{function} expects {expected} argument(s), got {got}")]
    ArgumentCount {
        function: String,
        expected: usize,
        got: usize,
    },

    #[error("Argument {name} is not a 32-bit integer: {value:?}")]
    InvalidArgument { name: &'static str, value: String },

    #[error("Metadata encoding failed: {0}")]
    Metadata(String),

    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl From<LedgerError> for DispatchError {
    fn from(e: LedgerError) -> Self {
        DispatchError::Contract(ContractError::State(e))
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;

/// Run `function` with `args` against `state` and return the payload.
///
/// Payloads: `true`/`false` for the existence check, the record encoding for a read, the
/// metadata JSON for [`GET_METADATA`], empty for mutations.
pub fn invoke<S, A>(
    contract: &CarQualityContract,
    state: &mut S,
    function: &str,
    args: &[A],
) -> Result<Vec<u8>>
where
    S: Storage + ?Sized,
    A: AsRef<str>,
{
    match function {
        TX_EXISTS => {
            let [car_id] = expect_args::<1, _>(function, args)?;
            let exists = contract.car_quality_exists(&*state, car_id)?;
            Ok(exists.to_string().into_bytes())
        }
        TX_CREATE => {
            let [car_id, value] = expect_args::<2, _>(function, args)?;
            contract.create_car_quality(state, car_id, parse_int("value", value)?)?;
            Ok(Vec::new())
        }
        TX_READ => {
            let [car_id] = expect_args::<1, _>(function, args)?;
            let record = contract.read_car_quality(&*state, car_id)?;
            record
                .to_bytes()
                .map_err(|e| DispatchError::from(LedgerError::Serialization(e.to_string())))
        }
        TX_UPDATE => {
            let [car_id, new_value] = expect_args::<2, _>(function, args)?;
            contract.update_car_quality(state, car_id, parse_int("newValue", new_value)?)?;
            Ok(Vec::new())
        }
        TX_DELETE => {
            let [car_id] = expect_args::<1, _>(function, args)?;
            contract.delete_car_quality(state, car_id)?;
            Ok(Vec::new())
        }
        GET_METADATA => {
            expect_args::<0, _>(function, args)?;
            let md: ContractMetadata = contract.metadata();
            serde_json::to_vec(&md).map_err(|e| DispatchError::Metadata(e.to_string()))
        }
        other => Err(DispatchError::UnknownFunction(other.to_string())),
    }
}

fn expect_args<'a, const N: usize, A: AsRef<str>>(function: &str, args: &'a [A]) -> Result<[&'a str; N]> {
    if args.len() != N {
        return Err(DispatchError::ArgumentCount {
            function: function.to_string(),
            expected: N,
            got: args.len(),
        });
    }
    Ok(std::array::from_fn(|i| args[i].as_ref()))
}

fn parse_int(name: &'static str, raw: &str) -> Result<i32> {
    raw.parse().map_err(|_| DispatchError::InvalidArgument {
        name,
        value: raw.to_string(),
    })
}
