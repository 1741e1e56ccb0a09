//! Inversion of the statistic `g_n(p) = T_n(√p)²`.
//!
//! Every value in `[0, 1]` has one pre-image per lobe of `g_n`.
//! A hint point selects the lobe, so the result is only meaningful
//! when the hint and the true pre-image lie in the same lobe.

use crate::chebyshev::lobe;
use std::f64::consts::{FRAC_PI_2, PI};

/// Returns the `p` such that `g_n(p) = value`, taken in the lobe of `g_n` that contains `p_hint`.
///
/// Values slightly outside `[0, 1]` because of round-off are clamped.
///
/// ```
/// # use chebpe_core::{chebyshev::statistic, invert};
/// let p = 0.37;
/// assert!((invert(statistic(5, p), 5, 0.36) - p).abs() < 1e-12);
/// ```
pub fn invert(value: f64, n: u64, p_hint: f64) -> f64 {
    let order = n as f64;
    let half_lobe = FRAC_PI_2 / order;
    let t = lobe(n, p_hint);
    let offset = (2.0 * value.clamp(0.0, 1.0) - 1.0).clamp(-1.0, 1.0).acos() / (2.0 * order);
    let mut theta = if t % 2 == 0 {
        offset
    } else {
        2.0 * half_lobe - offset
    };
    theta += PI * (t / 2) as f64 / order;
    theta.cos().powi(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chebyshev::statistic;

    #[test]
    fn round_trip() {
        for n in [1, 3, 5, 11, 51, 201] {
            for i in 1..100 {
                let p = i as f64 / 100.0;
                let recovered = invert(statistic(n, p), n, p);
                assert!((recovered - p).abs() < 1e-9, "n={n}, p={p}, got {recovered}");
            }
        }
    }

    #[test]
    fn hint_near_lobe_boundary() {
        let n = 7;
        // Boundary between lobes 2 and 3.
        let boundary = 3.0 * PI / (2.0 * n as f64);
        for (theta, hint) in [
            (boundary - 0.05, boundary - 1e-9),
            (boundary + 0.05, boundary + 1e-9),
            (boundary - 1e-6, boundary - 0.1),
            (boundary + 1e-6, boundary + 0.1),
        ] {
            let p = theta.cos().powi(2);
            let p_hint = hint.cos().powi(2);
            assert_eq!(lobe(n, p), lobe(n, p_hint));
            let recovered = invert(statistic(n, p), n, p_hint);
            assert!((recovered - p).abs() < 1e-9, "p={p}, got {recovered}");
        }
    }

    #[test]
    fn hint_in_other_lobe() {
        let n = 5;
        let p = 0.3;
        let value = statistic(n, p);
        let other = invert(value, n, 0.9);
        assert_ne!(lobe(n, other), lobe(n, p));
        assert!((other - p).abs() > 0.01);
        assert!((statistic(n, other) - value).abs() < 1e-9);
    }

    #[test]
    fn clamped_value() {
        let n = 3;
        let p = 0.8;
        let top = invert(1.0 + 1e-12, n, p);
        let bottom = invert(-1e-12, n, p);
        assert!((statistic(n, top) - 1.0).abs() < 1e-12);
        assert!(statistic(n, bottom).abs() < 1e-12);
        // On the first lobe the statistic increases with p, from its minimum at cos²(π/6).
        assert!((top - 1.0).abs() < 1e-12);
        assert!((bottom - 0.75).abs() < 1e-12);
    }
}
