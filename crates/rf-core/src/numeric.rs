//! Scalar helpers shared by the property and hydraulic crates.

use crate::{RfError, RfResult};

/// Floating point type used throughout the workspace.
pub type Real = f64;

/// Absolute + relative tolerance pair for scalar comparisons.
///
/// The defaults suit table round-trip checks; interpolation-key matching
/// builds its own looser pair.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

/// True when `a` and `b` agree within `tol`, absolute first, relative to the
/// larger magnitude otherwise.
pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    diff <= tol.abs || diff <= tol.rel * a.abs().max(b.abs())
}

/// Pass `v` through, or fail with `RfError::NonFinite` naming `what`.
pub fn ensure_finite(v: Real, what: &'static str) -> RfResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(RfError::NonFinite { what, value: v })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_respects_both_tolerances() {
        let tol = Tolerances::default();
        assert!(nearly_equal(0.0, 5e-13, tol));
        assert!(nearly_equal(1e6, 1e6 * (1.0 + 1e-10), tol));
        assert!(!nearly_equal(1.0, 1.0001, tol));

        let loose = Tolerances { abs: 0.01, rel: 0.0 };
        assert!(nearly_equal(263.15, 263.155, loose));
        assert!(!nearly_equal(263.15, 263.2, loose));
    }

    #[test]
    fn ensure_finite_rejects_nan_and_infinity() {
        assert_eq!(ensure_finite(4.34, "pressure").unwrap(), 4.34);
        assert!(matches!(
            ensure_finite(Real::NAN, "pressure"),
            Err(RfError::NonFinite { what: "pressure", .. })
        ));
        assert!(ensure_finite(Real::INFINITY, "pressure").is_err());
    }
}
