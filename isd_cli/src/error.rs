//! Error taxonomy for the command-line front end (spec §7). CLI misuse
//! (wrong argument count/type) is diagnosed by `clap` itself before any of
//! our own code runs, so it has no variant here; IO/parse failure,
//! allocation failure, entropy unavailable, and internal overrun each map to
//! a distinct, diagnosable variant instead of one opaque `anyhow::Error`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("could not read input file {0}")]
    InputUnreadable(PathBuf, #[source] std::io::Error),
    #[error("malformed input in {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
    #[error(transparent)]
    Engine(#[from] isd_core::EngineError),
}
