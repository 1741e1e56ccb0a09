use crate::chebyshev::statistic;
use rand::Rng;

/// A biased coin whose success probability is `g_n(p)` for an unknown `p`.
///
/// Each shot at order `n` costs `n` oracle calls;
/// the caller is responsible for accounting for it.
pub trait Oracle {
    /// Tosses the coin `shots` times at order `n` and returns the number of successes.
    fn sample(&mut self, n: u64, shots: u64) -> u64;
}

/// An [`Oracle`] simulated by sampling Bernoulli trials from a random generator.
#[derive(Debug, Clone)]
pub struct SimulatedOracle<R: Rng> {
    p: f64,
    rng: R,
}

impl<R: Rng> SimulatedOracle<R> {
    /// Creates a simulated oracle for the probability `p` (clamped to `[0, 1]`).
    pub fn new(p: f64, rng: R) -> Self {
        Self {
            p: p.clamp(0.0, 1.0),
            rng,
        }
    }

    /// The probability hidden behind the oracle.
    pub fn truth(&self) -> f64 {
        self.p
    }
}

impl<R: Rng> Oracle for SimulatedOracle<R> {
    fn sample(&mut self, n: u64, shots: u64) -> u64 {
        let rate = statistic(n, self.p).clamp(0.0, 1.0);
        (0..shots).filter(|_| self.rng.random_bool(rate)).count() as u64
    }
}
