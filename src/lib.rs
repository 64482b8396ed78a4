//! Self-avoiding walks on Z^d by pivot dimerization.
//!
//! `dimer` is the entry point; `pivot` and `merge` hold the hash-based
//! collision searches it is built on.

pub mod error;
pub mod lattice;
pub mod symmetry;
pub mod pivot;
pub mod merge;
pub mod base;
pub mod dimer;
pub mod observables;
pub mod io;
pub mod chain;
pub mod utils;

pub use dimer::{generate, DimerConfig, DimerStats, Dimerizer};
pub use error::{Result, SawError};
pub use lattice::Walk;
