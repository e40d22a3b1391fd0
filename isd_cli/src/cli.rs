//! Argument parsing (spec §6 `PROG N_THREADS TYPE INPUT_FILE`), grounded on
//! the teacher's `bike_trials::settings` `Args`/`Settings` split: `Args` is
//! the raw `clap::Parser` surface, `RunConfig` is the validated shape the
//! rest of the program consumes.

use std::path::PathBuf;

use clap::Parser;
use getset::{CopyGetters, Getters};
use isd_core::Variant;

use crate::error::CliError;

#[derive(Clone, Debug, Parser)]
#[command(author, version, about = "Information-set-decoding attack engine", long_about = None)]
pub struct Args {
    #[arg(help = "Number of worker threads")]
    n_threads: usize,
    #[arg(help = "Problem variant: SD, QC, GO or LW")]
    r#type: Variant,
    #[arg(help = "Path to the input file describing the instance")]
    input_file: PathBuf,
}

/// Validated run configuration (spec §6). `n_threads == 0` is accepted and
/// means "let the pool decide", mirroring how `rayon::ThreadPoolBuilder`
/// treats `num_threads(0)`.
#[derive(Clone, Debug, CopyGetters, Getters)]
pub struct RunConfig {
    #[getset(get_copy = "pub")]
    threads: usize,
    #[getset(get_copy = "pub")]
    variant: Variant,
    #[getset(get = "pub")]
    input_file: PathBuf,
}

impl RunConfig {
    pub fn from_args(args: Args) -> Result<Self, CliError> {
        Ok(Self { threads: args.n_threads, variant: args.r#type, input_file: args.input_file })
    }
}
