//! Saturation pressure <-> temperature conversion.
//!
//! Saturation pressure is close to exponential in temperature over the table
//! span, so both directions interpolate temperature against `ln(pressure)`.
//! The penalty conversions linearize the same relation: for a small drop,
//! `d(lnP) ~= slope * dT` with the slope taken from the local table interval.

use crate::error::PropsResult;
use crate::interp;
use crate::refrigerant::Refrigerant;
use crate::store::PropertyStore;

/// Slopes flatter than this give no meaningful temperature equivalent.
const MIN_SLOPE: f64 = 1e-12;

impl PropertyStore {
    /// Saturation pressure (bar absolute) at `t_c` (°C), edge-clamped.
    pub fn temperature_to_pressure(
        &self,
        refrigerant: Refrigerant,
        t_c: f64,
    ) -> PropsResult<f64> {
        let (temps, pressures) = self.saturation_axes(refrigerant)?;
        Ok(interp::interp_log(temps, pressures, t_c))
    }

    /// Saturation temperature (°C) at `pressure_bar`, edge-clamped.
    ///
    /// Inverse of `temperature_to_pressure`: temperature is linear in
    /// `ln(pressure)` within each table interval.
    pub fn pressure_to_temperature(
        &self,
        refrigerant: Refrigerant,
        pressure_bar: f64,
    ) -> PropsResult<f64> {
        let (temps, pressures) = self.saturation_axes(refrigerant)?;
        if pressure_bar <= pressures[0] {
            return Ok(temps[0]);
        }
        if pressure_bar >= pressures[pressures.len() - 1] {
            return Ok(temps[temps.len() - 1]);
        }
        let log_pressures: Vec<f64> = pressures.iter().map(|p| p.ln()).collect();
        Ok(interp::interp(&log_pressures, temps, pressure_bar.ln()))
    }

    /// Temperature penalty (K) equivalent to a small saturation pressure drop
    /// (bar) at `t_c`.
    ///
    /// Returns 0 when `t_c` is outside the table span or the local
    /// `d(lnP)/dT` slope is numerically flat.
    pub fn pressure_drop_to_temp_penalty(
        &self,
        refrigerant: Refrigerant,
        t_c: f64,
        drop_bar: f64,
    ) -> PropsResult<f64> {
        let slope = self.local_log_slope(refrigerant, t_c)?;
        if slope.abs() < MIN_SLOPE {
            return Ok(0.0);
        }
        let pressure = self.temperature_to_pressure(refrigerant, t_c)?;
        // d(lnP) for the drop, linearized at the operating pressure.
        Ok(drop_bar / pressure / slope)
    }

    /// Saturation pressure drop (bar) equivalent to a temperature penalty (K)
    /// at `t_c`. Inverse of `pressure_drop_to_temp_penalty`, with the same
    /// out-of-range and flat-slope zeroes.
    pub fn temp_penalty_to_pressure_drop(
        &self,
        refrigerant: Refrigerant,
        t_c: f64,
        penalty_k: f64,
    ) -> PropsResult<f64> {
        let slope = self.local_log_slope(refrigerant, t_c)?;
        if slope.abs() < MIN_SLOPE {
            return Ok(0.0);
        }
        let pressure = self.temperature_to_pressure(refrigerant, t_c)?;
        Ok(penalty_k * slope * pressure)
    }

    /// `d(lnP)/dT` at `t_c`: per-interval finite differences, interpolated at
    /// the query temperature. Zero outside the table span.
    fn local_log_slope(&self, refrigerant: Refrigerant, t_c: f64) -> PropsResult<f64> {
        let (temps, pressures) = self.saturation_axes(refrigerant)?;
        let n = temps.len();
        if t_c < temps[0] || t_c > temps[n - 1] {
            return Ok(0.0);
        }
        let mut midpoints = Vec::with_capacity(n - 1);
        let mut slopes = Vec::with_capacity(n - 1);
        for i in 0..n - 1 {
            midpoints.push(0.5 * (temps[i] + temps[i + 1]));
            slopes.push((pressures[i + 1].ln() - pressures[i].ln()) / (temps[i + 1] - temps[i]));
        }
        Ok(interp::interp(&midpoints, &slopes, t_c))
    }
}
