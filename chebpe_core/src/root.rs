//! Bracketed scalar root finding.
//!
//! [`find_root`] implements Brent's hybrid method[^1]:
//! it tries inverse quadratic interpolation or the secant step,
//! and falls back to bisection whenever the interpolated point would not shrink the bracket fast enough.
//! Convergence is therefore never slower than bisection,
//! and superlinear on well-behaved functions.
//!
//! ```
//! # use chebpe_core::find_root;
//! // Solve x³ = 8 on [0, 5].
//! let root = find_root(|x| x.powi(3), 8.0, 0.0, 5.0, 1e-10).expect("root is bracketed");
//! assert!((root - 2.0).abs() < 1e-9);
//! ```
//!
//! [^1]: Brent, R. P. (1973). *Algorithms for Minimization without Derivatives*. Prentice-Hall.

use log::trace;
use thiserror::Error;

/// Maximum number of refinement steps performed by [`find_root`].
pub const MAX_ITERATIONS: usize = 200;

/// The error type for [`find_root`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RootError {
    /// The function takes values with the same sign at both ends of the bracket.
    #[error("f({a}) and f({b}) do not have opposite signs")]
    InvalidBracket {
        /// Left end of the bracket.
        a: f64,
        /// Right end of the bracket.
        b: f64,
    },
    /// The bracket did not shrink below tolerance within the iteration limit.
    #[error("no convergence after {iterations} iterations (last estimate {last})")]
    DidNotConverge {
        /// Best estimate at the time of giving up.
        last: f64,
        /// Iterations performed.
        iterations: usize,
    },
    /// The function is not finite at the given point.
    #[error("function is not finite at {0}")]
    NotFinite(f64),
}

// Trial points of Brent's method.
// `b` is the current best estimate, `a` the contrapoint (so that f changes sign over `[a, b]`),
// `c` and `d` the previous two values of `b`.
#[derive(Debug, Clone, Copy)]
struct Bracket {
    a: f64,
    fa: f64,
    b: f64,
    fb: f64,
    c: f64,
    fc: f64,
    d: f64,
    // Whether last step was a bisection.
    mflag: bool,
}

impl Bracket {
    fn new(a: f64, fa: f64, b: f64, fb: f64) -> Self {
        let mut bracket = Self {
            a,
            fa,
            b,
            fb,
            c: a,
            fc: fa,
            d: a,
            mflag: true,
        };
        bracket.order();
        // The previous best estimate starts at the contrapoint.
        bracket.c = bracket.a;
        bracket.fc = bracket.fa;
        bracket.d = bracket.a;
        bracket
    }

    // Keep `b` as the best estimate.
    fn order(&mut self) {
        if self.fa.abs() < self.fb.abs() {
            std::mem::swap(&mut self.a, &mut self.b);
            std::mem::swap(&mut self.fa, &mut self.fb);
        }
    }

    fn converged(&self, tolerance: f64) -> bool {
        self.fb == 0.0 || (self.b - self.a).abs() <= tolerance
    }

    fn candidate(&mut self, tolerance: f64) -> f64 {
        let Self {
            a,
            fa,
            b,
            fb,
            c,
            fc,
            d,
            mflag,
        } = *self;
        let s = if fa != fc && fb != fc {
            // Inverse quadratic interpolation.
            a * fb * fc / ((fa - fb) * (fa - fc))
                + b * fa * fc / ((fb - fa) * (fb - fc))
                + c * fa * fb / ((fc - fa) * (fc - fb))
        } else {
            // Secant.
            b - fb * (b - a) / (fb - fa)
        };
        let quarter = (3.0 * a + b) / 4.0;
        let inside = (quarter < s && s < b) || (b < s && s < quarter);
        let slow = if mflag {
            (s - b).abs() >= (b - c).abs() / 2.0 || (b - c).abs() < tolerance
        } else {
            (s - b).abs() >= (c - d).abs() / 2.0 || (c - d).abs() < tolerance
        };
        if inside && !slow {
            self.mflag = false;
            s
        } else {
            self.mflag = true;
            (a + b) / 2.0
        }
    }

    fn update(&mut self, s: f64, fs: f64) {
        self.d = self.c;
        self.c = self.b;
        self.fc = self.fb;
        if fs == 0.0 || fs.signum() != self.fa.signum() {
            self.b = s;
            self.fb = fs;
        } else {
            self.a = s;
            self.fa = fs;
        }
        self.order();
    }
}

/// Finds `x` in `[a, b]` such that `f(x) = target`, up to `tolerance` on `x`.
///
/// `f(a) - target` and `f(b) - target` must have opposite signs,
/// unless one of them is already zero, in which case that endpoint is returned.
pub fn find_root<F>(mut f: F, target: f64, a: f64, b: f64, tolerance: f64) -> Result<f64, RootError>
where
    F: FnMut(f64) -> f64,
{
    let mut eval = |x: f64| {
        let y = f(x) - target;
        if y.is_finite() {
            Ok(y)
        } else {
            Err(RootError::NotFinite(x))
        }
    };
    let fa = eval(a)?;
    if fa == 0.0 {
        return Ok(a);
    }
    let fb = eval(b)?;
    if fb == 0.0 {
        return Ok(b);
    }
    if fa.signum() == fb.signum() {
        return Err(RootError::InvalidBracket { a, b });
    }

    let mut bracket = Bracket::new(a, fa, b, fb);
    let mut iterations = 0;
    while !bracket.converged(tolerance) {
        if iterations == MAX_ITERATIONS {
            return Err(RootError::DidNotConverge {
                last: bracket.b,
                iterations,
            });
        }
        let s = bracket.candidate(tolerance);
        let fs = eval(s)?;
        bracket.update(s, fs);
        iterations += 1;
    }
    trace!("root {} found in {iterations} iterations", bracket.b);
    Ok(bracket.b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn quadratic() {
        let tolerance = 2e-8;
        let root = find_root(|x| (x + 4.0) * (x + 1.0), 0.0, -5.0, -3.0, tolerance)
            .expect("bracket contains -4");
        assert!((root + 4.0).abs() <= tolerance);
    }

    #[test]
    fn sine() {
        let tolerance = 2e-8;
        let root = find_root(f64::sin, 0.0, 3.0 * PI / 4.0, 5.0 * PI / 4.0, tolerance)
            .expect("bracket contains pi");
        assert!((root - PI).abs() <= tolerance);
    }

    #[test]
    fn target_value() {
        let root = find_root(f64::exp, 2.0, 0.0, 1.0, 1e-12).expect("bracket contains ln 2");
        assert!((root - 2f64.ln()).abs() <= 1e-12);
    }

    #[test]
    fn reversed_bracket() {
        let root = find_root(|x| x * x - 2.0, 0.0, 2.0, 0.0, 1e-12).expect("bracket contains sqrt 2");
        assert!((root - 2f64.sqrt()).abs() <= 1e-12);
    }

    #[test]
    fn first_step_after_swap() {
        // |f(0)| < |f(1)|: endpoints are swapped so that b = 0.
        let mut bracket = Bracket::new(0.0, -0.1, 1.0, 2.0);
        assert_eq!((bracket.a, bracket.b), (1.0, 0.0));
        assert_eq!((bracket.c, bracket.fc), (bracket.a, bracket.fa));
        // The secant step is accepted rather than falling back to bisection.
        let s = bracket.candidate(1e-9);
        assert!(!bracket.mflag);
        assert!((s - 0.1 / 2.1).abs() < 1e-12);
    }

    #[test]
    fn exact_endpoint() {
        assert_eq!(find_root(|x| x - 1.0, 0.0, 1.0, 3.0, 1e-9), Ok(1.0));
    }

    #[test]
    fn invalid_bracket() {
        assert_eq!(
            find_root(|x| x * x + 1.0, 0.0, -1.0, 1.0, 1e-9),
            Err(RootError::InvalidBracket { a: -1.0, b: 1.0 })
        );
    }

    #[test]
    fn pole() {
        assert_eq!(
            find_root(|x| 1.0 / x, 0.0, -1.0, 1.0, 1e-9),
            Err(RootError::NotFinite(0.0))
        );
    }

    #[test]
    fn zero_tolerance() {
        // sqrt(2) is not representable, so the bracket stalls at one ulp.
        let result = find_root(|x| x * x - 2.0, 0.0, 1.0, 2.0, 0.0);
        assert!(matches!(result, Err(RootError::DidNotConverge { .. })));
    }
}
