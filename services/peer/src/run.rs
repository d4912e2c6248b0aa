use anyhow::{Context, Result};
use car_quality::{invoke, CarQualityContract};
use ledger::{FileBackedStorage, Ledger};
use tracing::info;

use crate::cli::{Args, Cmd};
use crate::config::AppConfig;

/// Execute one command against the state file and return the payload to print.
///
/// Any error makes `main` return `Err`, which exits non-zero.
pub fn run(args: Args, cfg: &AppConfig) -> Result<Vec<u8>> {
    let state_path = args.state.unwrap_or_else(|| cfg.state_path.clone());

    let storage = FileBackedStorage::open(&state_path)
        .with_context(|| format!("Failed to open state file {}", state_path.display()))?;
    let mut ledger = Ledger::new(storage);
    let contract = CarQualityContract::new();

    let payload = match args.command {
        Cmd::Invoke { function, args } => {
            let (payload, receipt) = ledger
                .submit(&function, |ctx| invoke(&contract, ctx, &function, args.as_slice()))
                .with_context(|| format!("Transaction {function} failed"))?;
            info!(
                state = %ledger.storage().path().display(),
                height = receipt.height,
                tx_id = %hex::encode(receipt.tx_id),
                prev_tx_id = %hex::encode(receipt.prev_tx_id),
                "state saved"
            );
            payload
        }
        Cmd::Query { function, args } => ledger
            .evaluate(|ctx| invoke(&contract, ctx, &function, args.as_slice()))
            .with_context(|| format!("Query {function} failed"))?,
        Cmd::Metadata => serde_json::to_vec_pretty(&contract.metadata())
            .context("Failed to encode contract metadata")?,
    };

    Ok(payload)
}
