//! Polynomial evaluation for empirical correlations.
//!
//! Refrigerant-specific correction curves (oil-return corrections, velocity
//! weighting, oil density) are all low-degree polynomials fitted to
//! manufacturer data. Storing them as coefficient slices keeps the whole set
//! auditable in one table and evaluated by one function.

use crate::numeric::Real;

/// A polynomial with coefficients in descending degree order.
///
/// `Poly::new(&[a, b, c])` represents `a·x² + b·x + c`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Poly {
    coeffs: &'static [Real],
}

impl Poly {
    pub const fn new(coeffs: &'static [Real]) -> Self {
        Self { coeffs }
    }

    /// Evaluate at `x` using Horner's method.
    pub fn eval(&self, x: Real) -> Real {
        self.coeffs.iter().fold(0.0, |acc, &c| acc * x + c)
    }

    /// Evaluate with the argument clamped from below.
    ///
    /// Several correction curves are only fitted down to a refrigerant-specific
    /// liquid temperature; below that the fit turns over and the tabulated
    /// minimum is used instead.
    pub fn eval_clamped_below(&self, x: Real, min_x: Real) -> Real {
        self.eval(x.max(min_x))
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }
}
