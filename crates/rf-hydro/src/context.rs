//! Immutable per-request sizing configuration.

use rf_props::Refrigerant;
use serde::{Deserialize, Serialize};

use crate::error::{HydroError, HydroResult};
use crate::geometry::PipeMaterial;

/// Branch routing geometry: straight length plus fitting and valve counts.
///
/// Counts are `f64` so a caller can express fractional equivalents (half a
/// bend from a swept offset, for example) the way catalog sheets do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchGeometry {
    /// Straight pipe length, metres.
    pub length_m: f64,
    /// Short-radius 90° bends.
    pub srb: f64,
    /// Long-radius 90° bends.
    pub lrb: f64,
    /// 45° bends.
    pub bend45: f64,
    /// Main assembly connections.
    pub mac: f64,
    /// P-traps.
    pub ptrap: f64,
    /// U-bends.
    pub ubend: f64,
    /// Ball valves.
    pub ball: f64,
    /// Globe valves.
    pub globe: f64,
    /// Flat miscellaneous pressure-loss factor, in dynamic heads.
    pub plf: f64,
}

impl BranchGeometry {
    /// Straight pipe only.
    pub fn straight(length_m: f64) -> Self {
        Self {
            length_m,
            ..Self::default()
        }
    }

    /// Short-radius-equivalent bend count: 45° bends count half, U-bends
    /// double, P-traps triple.
    pub fn srb_equivalent(&self) -> f64 {
        self.srb + 0.5 * self.bend45 + 2.0 * self.ubend + 3.0 * self.ptrap
    }

    /// Long-radius-equivalent bend count.
    pub fn lrb_equivalent(&self) -> f64 {
        self.lrb + self.mac
    }
}

impl Default for BranchGeometry {
    fn default() -> Self {
        Self {
            length_m: 0.0,
            srb: 0.0,
            lrb: 0.0,
            bend45: 0.0,
            mac: 0.0,
            ptrap: 0.0,
            ubend: 0.0,
            ball: 0.0,
            globe: 0.0,
            plf: 0.0,
        }
    }
}

/// Configuration bundle for one sizing run. Built once per request and
/// read-only downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiserContext {
    pub refrigerant: Refrigerant,
    /// Evaporating temperature, °C.
    pub evap_temp_c: f64,
    /// Condensing / maximum liquid temperature, °C.
    pub max_liquid_temp_c: f64,
    /// Minimum liquid temperature, °C.
    pub min_liquid_temp_c: f64,
    /// Evaporator superheat, K.
    pub superheat_k: f64,
    /// Maximum allowed saturated-suction temperature penalty, K.
    pub max_penalty_k: f64,
    pub geometry: BranchGeometry,
    pub material: PipeMaterial,
    /// Gas-cooler outlet pressure at maximum liquid temperature, bar
    /// absolute. Transcritical CO2 only.
    pub gc_max_pressure_bar: Option<f64>,
    /// Gas-cooler outlet pressure at minimum liquid temperature, bar
    /// absolute. Transcritical CO2 only.
    pub gc_min_pressure_bar: Option<f64>,
}

impl RiserContext {
    /// Gas-cooler pressures, required when the refrigerant is transcritical.
    pub fn gc_pressures(&self) -> HydroResult<(f64, f64)> {
        match (self.gc_max_pressure_bar, self.gc_min_pressure_bar) {
            (Some(max), Some(min)) => Ok((max, min)),
            _ => Err(HydroError::MissingGcPressure),
        }
    }

    /// Superheat clamped to the `[5, 30]` K band the correlations were
    /// fitted over.
    pub fn clamped_superheat_k(&self) -> f64 {
        self.superheat_k.clamp(5.0, 30.0)
    }

    /// Evaporating temperature in Kelvin.
    pub fn evap_temp_k(&self) -> f64 {
        self.evap_temp_c + rf_core::units::constants::CELSIUS_TO_KELVIN
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn r404a_context() -> RiserContext {
        RiserContext {
            refrigerant: Refrigerant::R404A,
            evap_temp_c: -10.0,
            max_liquid_temp_c: 40.0,
            min_liquid_temp_c: 35.0,
            superheat_k: 5.0,
            max_penalty_k: 1.0,
            geometry: BranchGeometry::straight(15.0),
            material: PipeMaterial::SteelSch40,
            gc_max_pressure_bar: None,
            gc_min_pressure_bar: None,
        }
    }

    #[test]
    fn equivalent_bend_counts() {
        let geometry = BranchGeometry {
            length_m: 10.0,
            srb: 2.0,
            lrb: 1.0,
            bend45: 2.0,
            mac: 1.0,
            ptrap: 1.0,
            ubend: 1.0,
            ..BranchGeometry::default()
        };
        assert!((geometry.srb_equivalent() - 8.0).abs() < 1e-12);
        assert!((geometry.lrb_equivalent() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn superheat_clamps_to_fitted_band() {
        let mut ctx = r404a_context();
        ctx.superheat_k = 2.0;
        assert_eq!(ctx.clamped_superheat_k(), 5.0);
        ctx.superheat_k = 50.0;
        assert_eq!(ctx.clamped_superheat_k(), 30.0);
        ctx.superheat_k = 12.0;
        assert_eq!(ctx.clamped_superheat_k(), 12.0);
    }

    #[test]
    fn gc_pressures_required_together() {
        let mut ctx = r404a_context();
        assert!(ctx.gc_pressures().is_err());
        ctx.gc_max_pressure_bar = Some(90.0);
        assert!(ctx.gc_pressures().is_err());
        ctx.gc_min_pressure_bar = Some(70.0);
        assert_eq!(ctx.gc_pressures().unwrap(), (90.0, 70.0));
    }
}
