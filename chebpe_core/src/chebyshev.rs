//! The oscillatory statistic `g_n(p) = T_n(√p)²` observed by the oracle.
//!
//! Writing `θ = arccos(√p)`, the statistic is `cos²(nθ)`.
//! It is monotonic on each _lobe_, i.e., on each interval where `⌊2nθ/π⌋` is constant.

use std::f64::consts::FRAC_PI_2;

/// Effective odd polynomial order `n = 2k+1` for degree `k`.
pub const fn odd_order(k: u64) -> u64 {
    2 * k + 1
}

/// Angle `θ = arccos(√p)`, with `p` clamped to `[0, 1]`.
pub fn angle(p: f64) -> f64 {
    p.clamp(0.0, 1.0).sqrt().acos()
}

/// Evaluates `g_n(p) = T_n(√p)²`.
pub fn statistic(n: u64, p: f64) -> f64 {
    (n as f64 * angle(p)).cos().powi(2)
}

/// Index of the monotonic lobe of `g_n` that contains `p`.
///
/// Lobes are counted by increasing angle, hence by _decreasing_ `p`.
pub fn lobe(n: u64, p: f64) -> u64 {
    angle_lobe(n, angle(p))
}

/// Index of the monotonic lobe of `g_n` that contains the angle `theta`.
pub fn angle_lobe(n: u64, theta: f64) -> u64 {
    (n as f64 * theta / FRAC_PI_2).floor() as u64
}
