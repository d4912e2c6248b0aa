use std::path::PathBuf;

use clap::{Parser, ValueHint};

#[derive(Parser)]
#[clap(name = "carquality-peer", about = "Run car quality contract transactions against a local ledger")]
pub struct Args {
    /// State file to use instead of CARQ_STATE_PATH
    #[clap(long, global = true, value_hint = ValueHint::FilePath)]
    pub state: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    pub command: Cmd,
}

#[derive(Parser)]
pub enum Cmd {
    /// Submit a transaction and commit its writes
    Invoke {
        /// Transaction function, e.g. createCarQuality
        function: String,

        /// Transaction arguments, passed as strings
        #[clap(allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Evaluate a transaction without committing anything
    Query {
        /// Transaction function, e.g. readCarQuality
        function: String,

        /// Transaction arguments, passed as strings
        #[clap(allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Print the contract metadata
    Metadata,
}
