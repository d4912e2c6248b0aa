use std::path::PathBuf;

use anyhow::Result;

const DEFAULT_STATE_PATH: &str = "carquality_state.json";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub state_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let state_path = std::env::var("CARQ_STATE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_PATH));

        Ok(Self { state_path })
    }
}
