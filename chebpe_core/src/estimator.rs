//! The adaptive estimation loop (ChebPE).
//!
//! Starting from the whole unit interval, each iteration:
//!
//! 1. raises the degree to the largest one whose statistic is monotonic on the current interval,
//!    if it grew by at least a factor `r` (resetting the tally);
//! 2. decides whether the run is _early_ (take a batch of shots) or _late_ (take a single shot);
//! 3. queries the oracle;
//! 4. computes a Clopper-Pearson interval for the statistic from the tally at the current degree;
//! 5. maps it back onto the probability axis;
//! 6. intersects it with the current interval.
//!
//! The loop stops once the interval is at most `2·eps` wide.
//! The failure probability `alpha` is split evenly between the degree stages
//! allowed by [`iteration_budget`], so the final interval contains the true value with probability at least `1 - alpha`.
//! `T` bounds the number of degree increases, not the number of iterations,
//! since one degree is usually queried over several iterations:
//! a degree is only chosen on an interval wider than `2·eps`, which caps `k` below `π/(8·eps)`,
//! and each increase multiplies `k` by more than `r`.

use crate::{
    Oracle,
    chebyshev::{odd_order, statistic},
    confidence::{ConfidenceError, clopper_pearson, worst_case_half_width},
    degree::next_degree,
    inversion::invert,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Slack applied to inverted intervals,
/// so that round-off cannot make an intersection empty.
pub const INTERVAL_SLACK: f64 = 1e-15;

/// Parameters of an estimation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChebPeConfig {
    /// Target half-width of the final interval.
    pub eps: f64,
    /// Failure probability.
    pub alpha: f64,
    /// Lateness caution: larger values switch to single shots sooner.
    pub nu: f64,
    /// Minimum growth ratio of the degree.
    pub r: f64,
    /// Shots taken per iteration while early.
    pub shots_per_batch: u64,
    /// Stop with an error rather than exceed this number of oracle calls.
    pub max_oracle_calls: Option<u64>,
    /// Record every iteration in [`EstimationResult::history`].
    pub record_history: bool,
}

impl Default for ChebPeConfig {
    fn default() -> Self {
        Self {
            eps: 0.01,
            alpha: 0.05,
            nu: 8.0,
            r: 2.0,
            shots_per_batch: 100,
            max_oracle_calls: None,
            record_history: false,
        }
    }
}

impl ChebPeConfig {
    /// Checks that all parameters are within their domain.
    pub fn validate(&self) -> Result<(), EstimationError> {
        if !(self.eps > 0.0 && self.eps.is_finite()) {
            Err(EstimationError::InvalidConfig(format!(
                "eps = {} has to be finite and positive",
                self.eps
            )))
        } else if !(self.alpha > 0.0 && self.alpha < 1.0) {
            Err(EstimationError::InvalidConfig(format!(
                "alpha = {} outside of (0, 1)",
                self.alpha
            )))
        } else if !(self.nu > 0.0) {
            Err(EstimationError::InvalidConfig(format!(
                "nu = {} is not positive",
                self.nu
            )))
        } else if !(self.r > 1.0) || !self.r.is_finite() {
            Err(EstimationError::InvalidConfig(format!(
                "r = {} has to be finite and larger than 1",
                self.r
            )))
        } else if self.shots_per_batch == 0 {
            Err(EstimationError::InvalidConfig(
                "shots_per_batch has to be at least 1".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

/// Maximum number of degree increases `T = ⌈log(1/(2·eps)) / log(r)⌉` (at least 1).
pub fn iteration_budget(eps: f64, r: f64) -> u64 {
    ((1.0 / (2.0 * eps)).ln() / r.ln()).ceil().max(1.0) as u64
}

/// The error type for [`estimate`].
#[derive(Debug, Error)]
pub enum EstimationError {
    /// A configuration parameter is out of its domain.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Continuing would exceed [`ChebPeConfig::max_oracle_calls`].
    #[error("budget of {limit} oracle calls exhausted after {calls} calls, with interval [{p_min}, {p_max}]")]
    BudgetExhausted {
        /// The configured ceiling.
        limit: u64,
        /// Oracle calls performed.
        calls: u64,
        /// Lower end of the interval reached.
        p_min: f64,
        /// Upper end of the interval reached.
        p_max: f64,
    },
    /// The confidence interval could not be computed.
    #[error("confidence interval computation failed")]
    Confidence(#[from] ConfidenceError),
}

/// State of the run after one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    /// Polynomial order `n = 2k+1` used.
    pub order: u64,
    /// Shots taken.
    pub shots: u64,
    /// Whether the iteration was late (single shot).
    pub late: bool,
    /// Lower end of the interval after the iteration.
    pub p_min: f64,
    /// Upper end of the interval after the iteration.
    pub p_max: f64,
}

/// Outcome of an estimation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationResult {
    /// Midpoint of the final interval.
    pub estimate: f64,
    /// Half-width of the final interval.
    pub ci_width: f64,
    /// Lower end of the final interval.
    pub p_min: f64,
    /// Upper end of the final interval.
    pub p_max: f64,
    /// Total oracle calls.
    pub num_oracle_calls: u64,
    /// Iterations of the loop.
    pub iterations: u64,
    /// Degree increases `T` the failure probability was split over.
    pub budget: u64,
    /// Configuration of the run.
    pub config: ChebPeConfig,
    /// Per-iteration record, if requested.
    pub history: Vec<IterationRecord>,
}

impl EstimationResult {
    /// Absolute error with respect to the true value, when it is known.
    pub fn exact_error(&self, truth: f64) -> f64 {
        (truth - self.estimate).abs()
    }
}

#[derive(Debug)]
struct Run {
    p_min: f64,
    p_max: f64,
    k: u64,
    flips: u64,
    heads: u64,
    queries: u64,
}

impl Run {
    fn new() -> Self {
        Self {
            p_min: 0.0,
            p_max: 1.0,
            k: 0,
            flips: 0,
            heads: 0,
            queries: 0,
        }
    }

    fn width(&self) -> f64 {
        self.p_max - self.p_min
    }

    fn midpoint(&self) -> f64 {
        (self.p_min + self.p_max) / 2.0
    }

    fn raise_degree(&mut self, r: f64) {
        if let Some(k) = next_degree(self.p_min, self.p_max, r * self.k as f64) {
            info!(
                "degree {} -> {k} on [{}, {}] after {} calls",
                self.k, self.p_min, self.p_max, self.queries
            );
            self.k = k;
            self.flips = 0;
            self.heads = 0;
        }
    }

    fn intersect(&mut self, lower: f64, upper: f64) {
        self.p_min = self.p_min.max(lower);
        self.p_max = self.p_max.min(upper);
        if self.p_min > self.p_max {
            // The new interval misses the current one: some earlier interval did not cover the true value.
            warn!(
                "empty intersection [{}, {}], collapsing to its midpoint",
                self.p_min, self.p_max
            );
            let mid = self.midpoint();
            self.p_min = mid;
            self.p_max = mid;
        }
    }
}

/// Estimates the probability hidden behind `oracle` up to `config.eps`,
/// with failure probability at most `config.alpha`.
pub fn estimate<O>(
    config: &ChebPeConfig,
    oracle: &mut O,
) -> Result<EstimationResult, EstimationError>
where
    O: Oracle + ?Sized,
{
    config.validate()?;
    let budget = iteration_budget(config.eps, config.r);
    let alpha_t = config.alpha / budget as f64;
    let err_max = worst_case_half_width(alpha_t, config.shots_per_batch)?;
    info!(
        "estimating to ±{} with failure probability {} split over {budget} degree stages (err_max = {err_max})",
        config.eps, config.alpha
    );

    let mut run = Run::new();
    let mut history = Vec::new();
    let mut iterations = 0;
    while run.width() > 2.0 * config.eps {
        run.raise_degree(config.r);
        let n = odd_order(run.k);

        let gap = (statistic(n, run.p_max) - statistic(n, run.p_min)).abs();
        let late = gap <= f64::EPSILON || err_max * run.width() / gap < config.nu * config.eps;
        let shots = if late { 1 } else { config.shots_per_batch };

        let cost = shots.saturating_mul(n);
        if let Some(limit) = config.max_oracle_calls {
            if run.queries.saturating_add(cost) > limit {
                warn!("stopping before exceeding {limit} oracle calls");
                return Err(EstimationError::BudgetExhausted {
                    limit,
                    calls: run.queries,
                    p_min: run.p_min,
                    p_max: run.p_max,
                });
            }
        }
        let heads = oracle.sample(n, shots).min(shots);
        run.heads += heads;
        run.flips += shots;
        run.queries = run.queries.saturating_add(cost);

        let (stat_min, stat_max) = clopper_pearson(run.heads, run.flips, alpha_t)?;
        let p_mid = run.midpoint();
        let a = invert(stat_min, n, p_mid);
        let b = invert(stat_max, n, p_mid);
        let (lower, upper) = if a <= b { (a, b) } else { (b, a) };
        run.intersect(lower - INTERVAL_SLACK, upper + INTERVAL_SLACK);

        iterations += 1;
        debug!(
            "iteration {iterations}: order {n}, {shots} shots ({}), {}/{} heads, interval [{}, {}]",
            if late { "late" } else { "early" },
            run.heads,
            run.flips,
            run.p_min,
            run.p_max
        );
        if config.record_history {
            history.push(IterationRecord {
                order: n,
                shots,
                late,
                p_min: run.p_min,
                p_max: run.p_max,
            });
        }
    }

    let result = EstimationResult {
        estimate: run.midpoint(),
        ci_width: run.width() / 2.0,
        p_min: run.p_min,
        p_max: run.p_max,
        num_oracle_calls: run.queries,
        iterations,
        budget,
        config: *config,
        history,
    };
    info!(
        "estimate {} ± {} after {iterations} iterations and {} oracle calls",
        result.estimate, result.ci_width, result.num_oracle_calls
    );
    Ok(result)
}
