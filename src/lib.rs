//! ChebPE estimates an unknown probability `p` from a biased coin whose bias is `T_n(√p)²`,
//! adaptively raising the Chebyshev degree `n` to reach a target accuracy at low query cost.
//!
//! This crate provides the command line driver, running the estimator of [`chebpe_core`]
//! against simulated oracles, possibly over many independent runs in parallel.

mod cli;
mod report;

pub use chebpe_core;
pub use cli::Cli;
pub use report::{RunOutcome, Summary};
