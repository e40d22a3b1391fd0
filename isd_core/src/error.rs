use thiserror::Error;

/// Error taxonomy for the engine (spec §7). Rank deficiency after Gaussian
/// elimination is *not* represented here: it is a retry signal handled
/// internally by `driver`, never surfaced to callers.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("allocation failure: {0}")]
    Allocation(String),

    #[error("entropy source unavailable")]
    EntropyUnavailable,

    #[error("internal overrun: {0}")]
    InternalOverrun(String),

    #[error("invalid problem parameters: {0}")]
    InvalidParameters(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
