mod cli;
mod config;
mod run;

use std::io::Write;

use anyhow::Result;
use clap::Parser;

use crate::cli::Args;
use crate::config::AppConfig;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // stdout carries the payload only
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let cfg = AppConfig::from_env()?;

    let payload = run::run(args, &cfg)?;

    if !payload.is_empty() {
        let mut out = std::io::stdout().lock();
        out.write_all(&payload)?;
        out.write_all(b"\n")?;
    }

    Ok(())
}
