//! Exact confidence intervals for binomial proportions.
//!
//! The Clopper-Pearson interval[^1] inverts the binomial test through quantiles of Beta distributions,
//! and its coverage is guaranteed to be at least the nominal confidence level for every true rate.
//!
//! [^1]: Clopper, C. J., & Pearson, E. S. (1934). The use of confidence or fiducial limits illustrated in the case of the binomial.
//! *Biometrika*, 26(4), 404–413.

use crate::root::{RootError, find_root};
use log::trace;
use statrs::distribution::{Beta, BetaError, ContinuousCDF};
use thiserror::Error;

/// Tolerance on Beta quantiles.
const QUANTILE_TOLERANCE: f64 = 1e-12;

/// The error type for confidence interval computations.
#[derive(Debug, Error)]
pub enum ConfidenceError {
    /// Zero trials, or more successes than trials.
    #[error("invalid binomial counts: {successes} successes out of {trials} trials")]
    InvalidInput {
        /// Number of successes.
        successes: u64,
        /// Number of trials.
        trials: u64,
    },
    /// The failure probability is not in `(0, 1)`.
    #[error("failure probability {0} outside of (0, 1)")]
    InvalidAlpha(f64),
    /// The Beta distribution could not be built.
    #[error("bad Beta distribution parameters")]
    Beta(#[from] BetaError),
    /// The Beta quantile could not be computed.
    #[error("failed to compute Beta quantile")]
    Quantile(#[from] RootError),
}

fn beta_quantile(a: f64, b: f64, q: f64) -> Result<f64, ConfidenceError> {
    let beta = Beta::new(a, b)?;
    let x = find_root(|x| beta.cdf(x), q, 0.0, 1.0, QUANTILE_TOLERANCE)?;
    Ok(x)
}

/// Computes the two-sided Clopper-Pearson interval for `successes` out of `trials`,
/// with coverage at least `1 - alpha`.
///
/// ```
/// # use chebpe_core::clopper_pearson;
/// let (lower, upper) = clopper_pearson(30, 100, 0.05).expect("valid counts");
/// assert!(lower < 0.3 && 0.3 < upper);
/// ```
pub fn clopper_pearson(
    successes: u64,
    trials: u64,
    alpha: f64,
) -> Result<(f64, f64), ConfidenceError> {
    if trials == 0 || successes > trials {
        return Err(ConfidenceError::InvalidInput { successes, trials });
    }
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(ConfidenceError::InvalidAlpha(alpha));
    }
    let s = successes as f64;
    let t = trials as f64;
    let lower = if successes == 0 {
        0.0
    } else {
        beta_quantile(s, t - s + 1.0, alpha / 2.0)?
    };
    let upper = if successes == trials {
        1.0
    } else {
        beta_quantile(s + 1.0, t - s, 1.0 - alpha / 2.0)?
    };
    trace!("{successes}/{trials} at alpha={alpha}: [{lower}, {upper}]");
    Ok((lower, upper))
}

/// Largest half-width of the Clopper-Pearson interval over every possible outcome of `trials` trials.
///
/// This bounds the width of any realized interval a priori,
/// before knowing anything about the true rate.
pub fn worst_case_half_width(alpha: f64, trials: u64) -> Result<f64, ConfidenceError> {
    if trials == 0 {
        return Err(ConfidenceError::InvalidInput {
            successes: 0,
            trials,
        });
    }
    (0..=trials).try_fold(0f64, |max, successes| {
        let (lower, upper) = clopper_pearson(successes, trials, alpha)?;
        Ok(max.max((upper - lower) / 2.0))
    })
}
