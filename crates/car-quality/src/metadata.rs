use serde::{Deserialize, Serialize};

pub const CONTRACT_NAME: &str = "CarQualityAssuranceContract";

pub const TX_EXISTS: &str = "carQualityExists";
pub const TX_CREATE: &str = "createCarQuality";
pub const TX_READ: &str = "readCarQuality";
pub const TX_UPDATE: &str = "updateCarQuality";
pub const TX_DELETE: &str = "deleteCarQuality";

/// Self-description a ledger peer serves for the contract
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractMetadata {
    pub name: String,
    pub info: ContractInfo,
    /// Whether calls without a contract prefix route here
    pub default: bool,
    pub transactions: Vec<TransactionInfo>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContractInfo {
    pub title: String,
    pub version: String,
    pub contact: Contact,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInfo {
    pub name: String,
    pub parameters: Vec<ParameterInfo>,
    pub returns: Option<String>,
    pub read_only: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ContractMetadata {
    pub fn car_quality() -> Self {
        Self {
            name: CONTRACT_NAME.into(),
            info: ContractInfo {
                title: "Car Quality Assurance Contract".into(),
                version: "0.0.1".into(),
                contact: Contact {
                    url: "https://mikiisz.github.io/#75711f".into(),
                },
            },
            default: true,
            transactions: vec![
                tx(TX_EXISTS, &[("carId", "string")], Some("boolean"), true),
                tx(TX_CREATE, &[("carId", "string"), ("value", "integer")], None, false),
                tx(TX_READ, &[("carId", "string")], Some("CarQuality"), true),
                tx(TX_UPDATE, &[("carId", "string"), ("newValue", "integer")], None, false),
                tx(TX_DELETE, &[("carId", "string")], None, false),
            ],
        }
    }

    pub fn transaction(&self, name: &str) -> Option<&TransactionInfo> {
        self.transactions.iter().find(|t| t.name == name)
    }
}

fn tx(name: &str, params: &[(&str, &str)], returns: Option<&str>, read_only: bool) -> TransactionInfo {
    TransactionInfo {
        name: name.into(),
        parameters: params
            .iter()
            .map(|(name, kind)| ParameterInfo {
                name: (*name).into(),
                kind: (*kind).into(),
            })
            .collect(),
        returns: returns.map(Into::into),
        read_only,
    }
}
