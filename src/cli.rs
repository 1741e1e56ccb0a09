use crate::{RunOutcome, Summary};
use anyhow::{Context, bail};
use chebpe_core::{ChebPeConfig, SimulatedOracle, estimate};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rand::{SeedableRng, rngs::SmallRng};
use rayon::prelude::*;
use std::{fs::File, path::PathBuf};

/// Adaptive estimation of a probability through Chebyshev-amplified coin tosses
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Probability hidden behind the simulated oracle
    target: f64,
    /// Load configuration from JSON file (other options override it)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    config: Option<PathBuf>,
    /// Precision or half-width parameter [default: 0.01]
    #[arg(short, long)]
    eps: Option<f64>,
    /// Failure probability [default: 0.05]
    #[arg(short, long)]
    alpha: Option<f64>,
    /// Lateness caution [default: 8]
    #[arg(long)]
    nu: Option<f64>,
    /// Minimum degree growth ratio [default: 2]
    #[arg(short, long)]
    ratio: Option<f64>,
    /// Shots per batch while early [default: 100]
    #[arg(long)]
    shots: Option<u64>,
    /// Give up before exceeding this number of oracle calls
    #[arg(long)]
    max_calls: Option<u64>,
    /// Seed of the first run (run `i` uses `seed + i`)
    #[arg(long, default_value = "0")]
    seed: u64,
    /// Number of independent runs
    #[arg(long, default_value = "1")]
    runs: usize,
    /// Print results as JSON
    #[arg(long, default_value = "false")]
    json: bool,
}

impl Cli {
    /// Builds the estimation configuration from the config file (if any) and the command line options.
    pub fn config(&self) -> anyhow::Result<ChebPeConfig> {
        let mut config = if let Some(path) = &self.config {
            info!("loading configuration from '{}'", path.display());
            let reader = File::open(path)
                .with_context(|| format!("failed to open config file '{}'", path.display()))?;
            serde_json::from_reader(reader)
                .with_context(|| format!("failed to parse config file '{}'", path.display()))?
        } else {
            ChebPeConfig::default()
        };
        if let Some(eps) = self.eps {
            config.eps = eps;
        }
        if let Some(alpha) = self.alpha {
            config.alpha = alpha;
        }
        if let Some(nu) = self.nu {
            config.nu = nu;
        }
        if let Some(r) = self.ratio {
            config.r = r;
        }
        if let Some(shots) = self.shots {
            config.shots_per_batch = shots;
        }
        if self.max_calls.is_some() {
            config.max_oracle_calls = self.max_calls;
        }
        config.validate()?;
        Ok(config)
    }

    /// Runs the estimations and returns their outcomes, in seed order.
    pub fn outcomes(&self) -> anyhow::Result<Vec<RunOutcome>> {
        if !(0.0..=1.0).contains(&self.target) {
            bail!("target probability {} outside of [0, 1]", self.target);
        }
        if self.runs == 0 {
            bail!("at least one run is required");
        }
        let config = self.config()?;
        let bar = if self.runs > 1 && !self.json {
            let style = ProgressStyle::with_template(
                "[{elapsed_precise}] {percent:>2}% {wide_bar} {pos}/{len} runs ETA: {eta:<5}",
            )?;
            ProgressBar::new(self.runs as u64).with_style(style)
        } else {
            ProgressBar::hidden()
        };
        let outcomes = (0..self.runs as u64)
            .into_par_iter()
            .map(|i| -> anyhow::Result<RunOutcome> {
                let seed = self.seed.wrapping_add(i);
                let mut oracle = SimulatedOracle::new(self.target, SmallRng::seed_from_u64(seed));
                let result = estimate(&config, &mut oracle)
                    .with_context(|| format!("estimation with seed {seed} failed"))?;
                bar.inc(1);
                Ok(RunOutcome::new(seed, oracle.truth(), result))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        bar.finish_and_clear();
        Ok(outcomes)
    }

    pub fn run(&self) -> anyhow::Result<()> {
        if !self.json {
            println!(
                "Estimating p = {} over {} run(s) starting from seed {}",
                self.target, self.runs, self.seed
            );
        }
        let outcomes = self.outcomes()?;
        let precision = outcomes
            .first()
            .map(|outcome| (-outcome.result.config.eps.log10().floor()) as usize + 1)
            .unwrap_or(2);
        match outcomes.as_slice() {
            [outcome] if self.json => println!("{}", serde_json::to_string_pretty(outcome)?),
            [outcome] => outcome.print(precision),
            outcomes if self.json => println!("{}", serde_json::to_string_pretty(outcomes)?),
            outcomes => Summary::new(outcomes).print(),
        }
        Ok(())
    }
}
