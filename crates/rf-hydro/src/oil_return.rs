//! Minimum-oil-return (MOR) adequacy.
//!
//! The entrainment criterion is Wallis-style: the minimum vapor mass flux
//! able to carry oil up the riser scales with `jg½²` and the square root of
//! the buoyancy term between the oil mixture and the vapor. The ratio of
//! that minimum to the actual for-oil mass flow, in percent, is the MOR;
//! values over 100 mean the branch cannot reliably return oil.

use rf_core::units::constants::G_MPS2;
use serde::{Deserialize, Serialize};

use crate::context::RiserContext;
use crate::correlations;

/// MOR ratios (%) at the two liquid-temperature extremes.
///
/// `None` means the evaporating temperature is outside the fitted validity
/// window: no statement about oil return can be made, which is different
/// from a ratio of zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OilReturn {
    pub maxliq: Option<f64>,
    pub minliq: Option<f64>,
}

impl OilReturn {
    pub fn undefined() -> Self {
        Self::default()
    }

    fn finite_values(&self) -> impl Iterator<Item = f64> {
        [self.maxliq, self.minliq]
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite())
    }

    /// Lowest defined, finite MOR across both liquid extremes.
    pub fn worst(&self) -> Option<f64> {
        self.finite_values().reduce(f64::min)
    }

    /// Highest defined, finite MOR across both liquid extremes.
    pub fn best(&self) -> Option<f64> {
        self.finite_values().reduce(f64::max)
    }
}

/// Scalars the branch evaluation hands over for the oil-return computation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OilInputs {
    pub diameter_m: f64,
    pub area_m2: f64,
    /// Blend of superheated and saturated vapor density, kg/m³.
    pub vapor_density_kgpm3: f64,
    /// For-oil mass flow at max-liquid conditions, kg/s.
    pub mass_flow_kgps: f64,
    /// For-oil mass flow at min-liquid conditions, kg/s.
    pub mass_flow_min_kgps: f64,
    /// Duty-side inlet enthalpy at max liquid (transcritical correction input).
    pub inlet_enthalpy: f64,
    /// Duty-side inlet enthalpy at min liquid.
    pub inlet_enthalpy_min: f64,
}

pub(crate) fn evaluate(ctx: &RiserContext, inputs: &OilInputs) -> OilReturn {
    let refrigerant = ctx.refrigerant;
    if !correlations::mor_defined(refrigerant, ctx.evap_temp_c) {
        return OilReturn::undefined();
    }

    let oil_sat = correlations::oil_density_kgpm3(refrigerant, ctx.evap_temp_c);
    let oil_super = correlations::oil_density_kgpm3(
        refrigerant,
        ctx.evap_temp_c + ctx.clamped_superheat_k(),
    );
    let oil_density = 0.5 * (oil_sat + oil_super);

    let jg_half = correlations::jg_half(refrigerant);
    let buoyancy = inputs.vapor_density_kgpm3
        * G_MPS2
        * inputs.diameter_m
        * (oil_density - inputs.vapor_density_kgpm3);
    let min_mass_flux = jg_half * jg_half * buoyancy.sqrt();
    let min_mass_flow = min_mass_flux * inputs.area_m2;

    let ratio = |flow_kgps: f64| {
        if flow_kgps > 0.0 {
            min_mass_flow / flow_kgps * 100.0
        } else {
            f64::INFINITY
        }
    };
    let pre = ratio(inputs.mass_flow_kgps);
    let pre_min = ratio(inputs.mass_flow_min_kgps);

    let corr = correlations::mor_liquid_correction(
        refrigerant,
        correlations::adjusted_liquid_temp(refrigerant, ctx.max_liquid_temp_c),
        inputs.inlet_enthalpy,
    );
    let corr_min = correlations::mor_liquid_correction(
        refrigerant,
        correlations::adjusted_liquid_temp(refrigerant, ctx.min_liquid_temp_c),
        inputs.inlet_enthalpy_min,
    );
    let corr_evap = correlations::mor_evap_correction(
        refrigerant,
        correlations::adjusted_evap_temp(refrigerant, ctx.evap_temp_c),
    );

    OilReturn {
        maxliq: Some((1.0 - corr) * (1.0 - corr_evap) * pre),
        minliq: Some((1.0 - corr_min) * (1.0 - corr_evap) * pre_min),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::r404a_context;

    fn inputs() -> OilInputs {
        OilInputs {
            diameter_m: 0.032,
            area_m2: std::f64::consts::PI * 0.016 * 0.016,
            vapor_density_kgpm3: 22.0,
            mass_flow_kgps: 0.35,
            mass_flow_min_kgps: 0.33,
            inlet_enthalpy: 0.0,
            inlet_enthalpy_min: 0.0,
        }
    }

    #[test]
    fn defined_inside_window() {
        let ctx = r404a_context();
        let oil = evaluate(&ctx, &inputs());
        let maxliq = oil.maxliq.expect("inside validity window");
        let minliq = oil.minliq.expect("inside validity window");
        assert!(maxliq.is_finite() && maxliq > 0.0);
        assert!(minliq.is_finite() && minliq > 0.0);
        assert!(oil.worst().unwrap() <= oil.best().unwrap());
    }

    #[test]
    fn undefined_outside_window() {
        let mut ctx = r404a_context();
        ctx.evap_temp_c = 10.0;
        let oil = evaluate(&ctx, &inputs());
        assert_eq!(oil, OilReturn::undefined());
        assert_eq!(oil.worst(), None);
        assert_eq!(oil.best(), None);
    }

    #[test]
    fn zero_flow_gives_infinite_ratio() {
        let ctx = r404a_context();
        let mut ins = inputs();
        ins.mass_flow_kgps = 0.0;
        let oil = evaluate(&ctx, &ins);
        assert!(oil.maxliq.unwrap().is_infinite());
        // Worst/best ignore the non-finite leg.
        assert_eq!(oil.worst(), oil.best());
        assert!(oil.worst().unwrap().is_finite());
    }

    #[test]
    fn smaller_flow_raises_the_ratio() {
        let ctx = r404a_context();
        let mut lean = inputs();
        lean.mass_flow_kgps = 0.1;
        lean.mass_flow_min_kgps = 0.1;
        let rich = evaluate(&ctx, &inputs());
        let starved = evaluate(&ctx, &lean);
        assert!(starved.maxliq.unwrap() > rich.maxliq.unwrap());
    }

    #[test]
    fn worst_and_best_order() {
        let oil = OilReturn {
            maxliq: Some(80.0),
            minliq: Some(65.0),
        };
        assert_eq!(oil.worst(), Some(65.0));
        assert_eq!(oil.best(), Some(80.0));
    }
}
