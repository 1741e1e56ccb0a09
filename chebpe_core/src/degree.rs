//! Selection of the operating degree.
//!
//! A degree `k` is usable on an interval `[p_min, p_max]`
//! when `g_{2k+1}` has no extremum inside it,
//! i.e., when both endpoints fall in the same lobe.
//! Then the statistic is invertible on the interval.

use crate::chebyshev::{angle, angle_lobe};
use log::trace;
use std::f64::consts::FRAC_PI_2;

// Upper limit on the polynomial order considered.
const MAX_ORDER: u64 = u32::MAX as u64;

/// Finds the largest degree `k > min_k` such that `g_{2k+1}` has no extremum on `[p_min, p_max]`.
///
/// Returns `None` when no degree improves on `min_k`:
/// the caller is expected to keep its current degree.
///
/// ```
/// # use chebpe_core::next_degree;
/// // Order 1 is the identity and covers the whole unit interval, but it is no improvement.
/// assert_eq!(next_degree(0.0, 1.0, 0.0), None);
/// assert!(next_degree(0.40, 0.41, 0.0).is_some());
/// ```
pub fn next_degree(p_min: f64, p_max: f64, min_k: f64) -> Option<u64> {
    // The angle is decreasing in p.
    let theta_lo = angle(p_max);
    let theta_hi = angle(p_min);
    let width = theta_hi - theta_lo;
    if width.is_nan() || width <= 0.0 {
        return None;
    }
    let floor = 2.0 * min_k.max(0.0) + 1.0;
    // A lobe spans an angle of π/(2n), which has to be at least the width of the interval.
    let bound = (FRAC_PI_2 / width).min(MAX_ORDER as f64);
    if bound <= floor {
        return None;
    }
    let mut n = bound.floor() as u64;
    if n % 2 == 0 {
        n -= 1;
    }
    while n as f64 > floor {
        if angle_lobe(n, theta_lo) == angle_lobe(n, theta_hi) {
            trace!("order {n} is monotonic on [{p_min}, {p_max}]");
            return Some((n - 1) / 2);
        }
        n -= 2;
    }
    None
}
