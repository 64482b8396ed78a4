// error.rs - Error taxonomy for the sampler and its I/O

use thiserror::Error;

use crate::symmetry::MAX_DIM;

/// Errors surfaced by the sampler, the base-case generator and walk persistence.
///
/// Pivot rejections and failed merges are not errors; they are ordinary
/// outcomes of the Monte Carlo loop.
#[derive(Debug, Error)]
pub enum SawError {
    /// Lattice dimension 0.
    #[error("invalid lattice dimension {dim}: a lattice needs at least one axis")]
    InvalidDimension { dim: usize },

    /// A valid dimension above `MAX_DIM`, whose symmetry group (`d! 2^d`
    /// elements) is too large to enumerate and cache.
    #[error(
        "lattice dimension {dim} exceeds the resource limit d <= {}: its symmetry group is too large to enumerate",
        MAX_DIM
    )]
    UnsupportedDimension { dim: usize },

    /// The base-case generator gave up.
    #[error("no self-avoiding walk of length {n} in d={dim} after {attempts} attempts")]
    ExhaustedBase { n: usize, dim: usize, attempts: usize },

    /// A caller-imposed retry budget ran out while joining two halves.
    #[error("dimerization of length {n} failed {retries} times in a row")]
    RetriesExhausted { n: usize, retries: usize },

    #[error("invalid walk: {0}")]
    InvalidWalk(String),

    #[error("invalid symmetry transform: {0}")]
    InvalidTransform(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("cannot parse coordinate: {0}")]
    Parse(#[from] std::num::ParseIntError),
}

pub type Result<T> = std::result::Result<T, SawError>;
