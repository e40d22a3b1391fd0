//! Information-set-decoding attack engine for binary linear codes over
//! GF(2): Dumer's variant with birthday collision search, Chase-sequence
//! incremental XOR updates, radix-sorted lookups, and method-of-four-Russians
//! Gaussian elimination, parallelized across worker threads. Supports
//! standard syndrome decoding (SD), quasi-cyclic (QC, with optional DOOM
//! batching), Goppa-style dense (GO), and low-weight-codeword (LW) search.
//!
//! No module here contains a raw `unsafe` block: the AVX2 XOR kernels in
//! [`bitops`] go through `safe_arch`'s checked wrappers, gated by a runtime
//! `is_x86_feature_detected!` check with a scalar fallback.

#![forbid(unsafe_code)]

pub mod binsearch;
pub mod bitmatrix;
pub mod bitops;
pub mod chase;
pub mod collision;
pub mod driver;
pub mod error;
pub mod gauss;
pub mod graycode;
pub mod listbuilder;
pub mod params;
pub mod problem;
pub mod radixsort;
pub mod random;
pub mod variant;
pub mod worker;

pub use driver::IterationResult;
pub use error::{EngineError, Result};
pub use problem::Problem;
pub use random::Seed;
pub use variant::Variant;
pub use worker::{run as run_pool, run_benchmark, PoolOutcome, ProgressUpdate, WorkerReport};
