//! Deterministic float ordering.
//!
//! Distances, prices and hit-test scores are sorted with these helpers so the
//! same input always produces the same order, NaNs included.

use core::cmp::Ordering;

/// Canonicalize a floating-point value for deterministic ordering.
///
/// - `-0.0` becomes `0.0`
/// - all NaNs become a single canonical NaN
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

/// Total ordering for floats after canonicalization.
pub fn stable_total_cmp_f64(a: f64, b: f64) -> Ordering {
    canonical_f64(a).total_cmp(&canonical_f64(b))
}
