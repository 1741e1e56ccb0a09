//! Adaptive estimation of an unknown probability `p` from a biased-coin oracle
//! whose success rate is the squared Chebyshev polynomial `T_n(√p)²`.
//!
//! The [`estimator`] drives the loop: it picks an operating degree through [`degree`],
//! queries an [`Oracle`], turns the observed tally into a Clopper-Pearson interval with [`confidence`]
//! and maps that interval back onto the probability axis with [`inversion`].
//! The [`root`] module provides the bracketed root-finder used by the numerical utilities.
//!
//! ```
//! # use chebpe_core::{ChebPeConfig, SimulatedOracle, estimate};
//! # use rand::{SeedableRng, rngs::SmallRng};
//! let config = ChebPeConfig {
//!     eps: 0.02,
//!     ..Default::default()
//! };
//! let mut oracle = SimulatedOracle::new(0.3, SmallRng::seed_from_u64(7));
//! let result = estimate(&config, &mut oracle).expect("estimation terminates");
//! assert!(result.ci_width <= config.eps);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chebyshev;
pub mod confidence;
pub mod degree;
pub mod estimator;
pub mod inversion;
mod oracle;
pub mod root;

pub use confidence::{ConfidenceError, clopper_pearson, worst_case_half_width};
pub use degree::next_degree;
pub use estimator::{
    ChebPeConfig, EstimationError, EstimationResult, INTERVAL_SLACK, IterationRecord, estimate,
    iteration_budget,
};
pub use inversion::invert;
pub use oracle::{Oracle, SimulatedOracle};
pub use root::{RootError, find_root};
