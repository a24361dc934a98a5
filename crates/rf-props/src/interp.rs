//! Interpolation primitives.
//!
//! All 1D lookups clamp at the table edges: a query at or beyond the first or
//! last knot returns the boundary value unchanged. That clamping is a
//! deliberate, silent policy; callers needing strict bounds check the table
//! range before querying.
//!
//! The 2D lookups are composed as two sequential 1D passes: first along the
//! column axis within each row, then across the row keys.

use crate::error::{PropsError, PropsResult};

/// Linear interpolation over a strictly increasing `xs` axis, edge-clamped.
pub fn interp(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[xs.len() - 1] {
        return ys[ys.len() - 1];
    }
    let i = bracket(xs, x);
    let t = (x - xs[i]) / (xs[i + 1] - xs[i]);
    ys[i] + t * (ys[i + 1] - ys[i])
}

/// Log-linear interpolation: linear in `ln(y)` against `x`, edge-clamped.
///
/// Used where the modeled quantity varies multiplicatively with temperature
/// (saturation pressure, vapor density, enthalpy).
pub fn interp_log(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[xs.len() - 1] {
        return ys[ys.len() - 1];
    }
    let i = bracket(xs, x);
    let t = (x - xs[i]) / (xs[i + 1] - xs[i]);
    let log_y = ys[i].ln() + t * (ys[i + 1].ln() - ys[i].ln());
    log_y.exp()
}

/// Index `i` such that `xs[i] <= x < xs[i + 1]`, for interior `x`.
fn bracket(xs: &[f64], x: f64) -> usize {
    match xs.partition_point(|&v| v <= x) {
        0 => 0,
        p => (p - 1).min(xs.len() - 2),
    }
}

/// Two-pass 2D lookup with linear axes and log-transformed values.
///
/// `values[i]` holds the row for `row_keys[i]` over `col_axis`. Every cell
/// must be strictly positive. The underlying 1D passes clamp at the table
/// edges, so out-of-range queries return edge rows/columns.
pub fn interp2_loglin(
    col_axis: &[f64],
    row_keys: &[f64],
    values: &[Vec<f64>],
    col: f64,
    row: f64,
    what: &'static str,
) -> PropsResult<f64> {
    validate_grid(col_axis, row_keys, values, what)?;
    let mut log_per_row = Vec::with_capacity(values.len());
    for row_values in values {
        let log_row: Vec<f64> = row_values.iter().map(|v| v.ln()).collect();
        log_per_row.push(interp(col_axis, &log_row, col));
    }
    Ok(interp(row_keys, &log_per_row, row).exp())
}

/// Two-pass 2D lookup with both axes and values in log space.
///
/// Fails if any table value, axis value, or query value is non-positive.
pub fn interp2_loglog(
    col_axis: &[f64],
    row_keys: &[f64],
    values: &[Vec<f64>],
    col: f64,
    row: f64,
    what: &'static str,
) -> PropsResult<f64> {
    validate_grid(col_axis, row_keys, values, what)?;
    if col <= 0.0 || row <= 0.0 {
        return Err(PropsError::OutOfRange { what });
    }
    if col_axis.iter().chain(row_keys.iter()).any(|&v| v <= 0.0) {
        return Err(PropsError::NonPositiveTable { what });
    }
    let log_cols: Vec<f64> = col_axis.iter().map(|v| v.ln()).collect();
    let log_rows: Vec<f64> = row_keys.iter().map(|v| v.ln()).collect();
    let mut log_per_row = Vec::with_capacity(values.len());
    for row_values in values {
        let log_row: Vec<f64> = row_values.iter().map(|v| v.ln()).collect();
        log_per_row.push(interp(&log_cols, &log_row, col.ln()));
    }
    Ok(interp(&log_rows, &log_per_row, row.ln()).exp())
}

fn validate_grid(
    col_axis: &[f64],
    row_keys: &[f64],
    values: &[Vec<f64>],
    what: &'static str,
) -> PropsResult<()> {
    if values.len() != row_keys.len() || values.iter().any(|r| r.len() != col_axis.len()) {
        return Err(PropsError::InvalidTable { what });
    }
    if values.iter().flatten().any(|&v| v <= 0.0) {
        return Err(PropsError::NonPositiveTable { what });
    }
    Ok(())
}

/// Natural cubic spline over strictly increasing knots, edge-clamped.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivatives at the knots (zero at both ends).
    y2: Vec<f64>,
}

impl CubicSpline {
    pub fn fit(xs: &[f64], ys: &[f64]) -> PropsResult<Self> {
        if xs.len() < 2 || xs.len() != ys.len() {
            return Err(PropsError::InvalidTable {
                what: "spline needs >= 2 equal-length knots",
            });
        }
        if xs.windows(2).any(|w| w[1] <= w[0]) {
            return Err(PropsError::InvalidTable {
                what: "spline knots must be strictly increasing",
            });
        }

        // Tridiagonal solve for the natural spline second derivatives.
        let n = xs.len();
        let mut y2 = vec![0.0; n];
        let mut u = vec![0.0; n];
        for i in 1..n - 1 {
            let sig = (xs[i] - xs[i - 1]) / (xs[i + 1] - xs[i - 1]);
            let p = sig * y2[i - 1] + 2.0;
            y2[i] = (sig - 1.0) / p;
            let slope_hi = (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i]);
            let slope_lo = (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
            u[i] = (6.0 * (slope_hi - slope_lo) / (xs[i + 1] - xs[i - 1]) - sig * u[i - 1]) / p;
        }
        y2[n - 1] = 0.0;
        for i in (0..n - 1).rev() {
            y2[i] = y2[i] * y2[i + 1] + u[i];
        }

        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            y2,
        })
    }

    pub fn eval(&self, x: f64) -> f64 {
        if x <= self.xs[0] {
            return self.ys[0];
        }
        if x >= self.xs[self.xs.len() - 1] {
            return self.ys[self.ys.len() - 1];
        }
        let i = bracket(&self.xs, x);
        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = (x - self.xs[i]) / h;
        a * self.ys[i]
            + b * self.ys[i + 1]
            + ((a.powi(3) - a) * self.y2[i] + (b.powi(3) - b) * self.y2[i + 1]) * h * h / 6.0
    }
}
