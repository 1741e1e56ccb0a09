use chebpe_core::EstimationResult;
use serde::Serialize;

/// Outcome of one run against a simulated oracle, whose true value is known.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub seed: u64,
    pub truth: f64,
    pub exact_error: f64,
    /// Whether the final interval contains the true value.
    pub covered: bool,
    #[serde(flatten)]
    pub result: EstimationResult,
}

impl RunOutcome {
    pub fn new(seed: u64, truth: f64, result: EstimationResult) -> Self {
        Self {
            seed,
            truth,
            exact_error: result.exact_error(truth),
            covered: result.p_min <= truth && truth <= result.p_max,
            result,
        }
    }

    pub fn print(&self, precision: usize) {
        let EstimationResult {
            estimate,
            ci_width,
            num_oracle_calls,
            iterations,
            ..
        } = self.result;
        println!("Estimate {estimate:.precision$} ± {ci_width:.precision$}");
        println!("Oracle calls: {num_oracle_calls} over {iterations} iterations");
        println!(
            "True value {:.precision$}, error {:.2e}",
            self.truth, self.exact_error
        );
    }
}

/// Aggregate statistics over independent runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub runs: usize,
    pub failures: usize,
    pub mean_error: f64,
    pub max_error: f64,
    pub mean_calls: f64,
    pub max_calls: u64,
}

impl Summary {
    pub fn new(outcomes: &[RunOutcome]) -> Self {
        let runs = outcomes.len();
        let failures = outcomes.iter().filter(|outcome| !outcome.covered).count();
        let max_error = outcomes
            .iter()
            .map(|outcome| outcome.exact_error)
            .fold(0f64, f64::max);
        let max_calls = outcomes
            .iter()
            .map(|outcome| outcome.result.num_oracle_calls)
            .max()
            .unwrap_or(0);
        let (mean_error, mean_calls) = if runs == 0 {
            (0.0, 0.0)
        } else {
            (
                outcomes.iter().map(|o| o.exact_error).sum::<f64>() / runs as f64,
                outcomes
                    .iter()
                    .map(|o| o.result.num_oracle_calls as f64)
                    .sum::<f64>()
                    / runs as f64,
            )
        };
        Self {
            runs,
            failures,
            mean_error,
            max_error,
            mean_calls,
            max_calls,
        }
    }

    pub fn print(&self) {
        println!(
            "{} runs, {} not covering the true value",
            self.runs, self.failures
        );
        println!(
            "Error: mean {:.3e}, max {:.3e}",
            self.mean_error, self.max_error
        );
        println!(
            "Oracle calls: mean {:.1}, max {}",
            self.mean_calls, self.max_calls
        );
    }
}
