//! Single-branch hydraulic evaluation.
//!
//! `evaluate_branch` is the workhorse behind both single-riser sweeps and
//! the double-riser balancing loop: given a nominal pipe size, a branch mass
//! flow, and a `RiserContext`, it produces velocity, Reynolds number, the
//! decomposed pressure drop, the downstream saturation state, and the
//! oil-return ratios.
//!
//! Failure policy: property-domain problems (unknown refrigerant, the
//! transcritical CO2 pressure band) are hard errors; a defective catalog row
//! degrades the result to NaN so a sweep over many sizes can keep going.

use rf_core::units::{self, DynVisc, Length, MassRate, Pressure, TempInterval, Temperature, Velocity};
use rf_props::PropertyService;
use serde::Serialize;

use crate::context::RiserContext;
use crate::correlations;
use crate::error::{HydroError, HydroResult};
use crate::friction::darcy_friction_factor;
use crate::geometry::PipeCatalog;
use crate::oil_return::{self, OilInputs, OilReturn};

/// Mass-flow floor substituted when an enthalpy difference degenerates.
const MIN_FLOW_KGPS: f64 = 0.01;

/// Pressure drop split by cause, all in kPa.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PressureDropBreakdown {
    pub pipe_kpa: f64,
    pub fittings_kpa: f64,
    pub valves_kpa: f64,
    pub misc_kpa: f64,
}

impl PressureDropBreakdown {
    pub fn total_kpa(&self) -> f64 {
        self.pipe_kpa + self.fittings_kpa + self.valves_kpa + self.misc_kpa
    }

    fn undefined() -> Self {
        Self {
            pipe_kpa: f64::NAN,
            fittings_kpa: f64::NAN,
            valves_kpa: f64::NAN,
            misc_kpa: f64::NAN,
        }
    }
}

/// Outcome of one branch evaluation at one pipe size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchResult {
    pub nominal_size: String,
    /// Branch mass flow actually used, kg/s.
    pub mass_flow_kgps: f64,
    pub velocity_mps: f64,
    pub density_kgpm3: f64,
    pub viscosity_upas: f64,
    pub reynolds: f64,
    pub friction_factor: f64,
    pub pressure_drop: PressureDropBreakdown,
    /// Downstream saturated suction temperature, °C.
    pub post_temp_c: f64,
    /// Downstream saturation pressure, bar absolute.
    pub post_pressure_bar: f64,
    /// Saturated-suction temperature penalty, K.
    pub dt_k: f64,
    pub diameter_m: f64,
    pub area_m2: f64,
    pub oil_return: OilReturn,
}

impl BranchResult {
    /// Total pressure drop across the branch, kPa.
    pub fn dp_total_kpa(&self) -> f64 {
        self.pressure_drop.total_kpa()
    }

    pub fn mass_flow(&self) -> MassRate {
        units::kgps(self.mass_flow_kgps)
    }

    pub fn velocity(&self) -> Velocity {
        units::mps(self.velocity_mps)
    }

    pub fn total_pressure_drop(&self) -> Pressure {
        units::kpa(self.dp_total_kpa())
    }

    pub fn viscosity(&self) -> DynVisc {
        units::upas(self.viscosity_upas)
    }

    pub fn diameter(&self) -> Length {
        units::m(self.diameter_m)
    }

    pub fn post_temperature(&self) -> Temperature {
        units::celsius(self.post_temp_c)
    }

    pub fn post_pressure(&self) -> Pressure {
        units::bar(self.post_pressure_bar)
    }

    pub fn dt(&self) -> TempInterval {
        units::kelvin_interval(self.dt_k)
    }

    /// Catalog row could not be resolved; everything except the requested
    /// flow is undefined.
    fn undefined(size: &str, mass_flow_kgps: f64) -> Self {
        Self {
            nominal_size: size.to_string(),
            mass_flow_kgps,
            velocity_mps: f64::NAN,
            density_kgpm3: f64::NAN,
            viscosity_upas: f64::NAN,
            reynolds: f64::NAN,
            friction_factor: f64::NAN,
            pressure_drop: PressureDropBreakdown::undefined(),
            post_temp_c: f64::NAN,
            post_pressure_bar: f64::NAN,
            dt_k: f64::NAN,
            diameter_m: f64::NAN,
            area_m2: f64::NAN,
            oil_return: OilReturn::undefined(),
        }
    }
}

/// Bounding-state enthalpies, all kJ/kg.
struct Enthalpies {
    /// Duty-side inlet at max liquid (bubble-point basis).
    h_in: f64,
    /// Duty-side inlet at min liquid.
    h_in_min: f64,
    /// Oil-side inlet at max liquid.
    h_inlet: f64,
    /// Oil-side inlet at min liquid.
    h_inlet_min: f64,
    /// Saturated vapor at the evaporator.
    h_evap: f64,
    /// 10 K superheat reference.
    h_10k: f64,
}

fn enthalpies(props: &PropertyService, ctx: &RiserContext) -> HydroResult<Enthalpies> {
    let refrigerant = ctx.refrigerant;
    if refrigerant.is_transcritical() {
        let (gc_max, gc_min) = ctx.gc_pressures()?;
        let h_in = props.co2_inlet_enthalpy(gc_max, ctx.max_liquid_temp_c)?;
        let h_in_min = props.co2_inlet_enthalpy(gc_min, ctx.min_liquid_temp_c)?;
        let evap = props.saturation_props(refrigerant, ctx.evap_temp_c)?;
        Ok(Enthalpies {
            h_in,
            h_in_min,
            h_inlet: h_in,
            h_inlet_min: h_in_min,
            h_evap: evap.enthalpy_vapor,
            h_10k: evap.enthalpy_super,
        })
    } else {
        let cond = props.saturation_props(refrigerant, ctx.max_liquid_temp_c)?;
        let min_liquid = props.saturation_props(refrigerant, ctx.min_liquid_temp_c)?;
        let evap = props.saturation_props(refrigerant, ctx.evap_temp_c)?;
        Ok(Enthalpies {
            h_in: cond.enthalpy_liquid2,
            h_in_min: min_liquid.enthalpy_liquid2,
            h_inlet: cond.enthalpy_liquid,
            h_inlet_min: min_liquid.enthalpy_liquid,
            h_evap: evap.enthalpy_vapor,
            h_10k: evap.enthalpy_super,
        })
    }
}

/// Evaluate one riser branch at `size` carrying `branch_mass_flow_kgps`.
pub fn evaluate_branch(
    props: &PropertyService,
    catalog: &dyn PipeCatalog,
    size: &str,
    branch_mass_flow_kgps: f64,
    ctx: &RiserContext,
) -> HydroResult<BranchResult> {
    if !branch_mass_flow_kgps.is_finite() || branch_mass_flow_kgps < 0.0 {
        return Err(HydroError::InvalidMassFlow {
            value: branch_mass_flow_kgps,
        });
    }

    let Some(row) = catalog.row_for_size(size, ctx.material.gauge()) else {
        return Ok(BranchResult::undefined(size, branch_mass_flow_kgps));
    };
    if !row.id_mm.is_finite() || row.id_mm <= 0.0 {
        return Ok(BranchResult::undefined(size, branch_mass_flow_kgps));
    }
    let diameter_m = row.internal_diameter_m();
    let area_m2 = row.flow_area_m2();

    let refrigerant = ctx.refrigerant;
    let h = enthalpies(props, ctx)?;

    // Working superheated state: scale the 10 K reference difference by the
    // clamped superheat, then take the midpoint for the oil-carrying state.
    let h_super = h.h_evap + (h.h_10k - h.h_evap) * ctx.clamped_superheat_k() / 10.0;
    let h_foroil = 0.5 * (h.h_evap + h_super);

    let delta_h = h.h_evap - h.h_in;
    let delta_h_min = h.h_evap - h.h_in_min;
    let delta_h_foroil = h_foroil - h.h_inlet;
    let delta_h_foroil_min = h_foroil - h.h_inlet_min;

    // Duty implied by the branch flow at max-liquid conditions, re-divided
    // for the other bounding states.
    let (duty_kw, mass_flow_kgps) = if delta_h <= 0.0 {
        (0.0, branch_mass_flow_kgps.max(MIN_FLOW_KGPS))
    } else {
        (branch_mass_flow_kgps * delta_h, branch_mass_flow_kgps)
    };
    let flow_at = |dh: f64| if dh > 0.0 { duty_kw / dh } else { MIN_FLOW_KGPS };
    let mass_flow_min_kgps = flow_at(delta_h_min);
    let mass_flow_foroil_kgps = flow_at(delta_h_foroil);
    let mass_flow_foroil_min_kgps = flow_at(delta_h_foroil_min);

    // Vapor densities at the bounding superheats. The deep-superheat term is
    // evaluated at the worst-case suction temperature (evap minus the
    // allowed penalty).
    let evap_k = ctx.evap_temp_k();
    let penalized_k = evap_k - ctx.max_penalty_k;
    let half_superheat = 0.5 * (ctx.superheat_k + 5.0);
    let density_super = props.vapor_density(refrigerant, penalized_k, ctx.superheat_k)?;
    let density_mid_a = props.vapor_density(refrigerant, evap_k, half_superheat)?;
    let density_mid_b = props.vapor_density(refrigerant, penalized_k, half_superheat)?;
    let density_super2 = 0.5 * (density_mid_a + density_mid_b);
    let density_foroil_super =
        props.vapor_density(refrigerant, evap_k, ctx.clamped_superheat_k())?;
    let density_sat = props
        .saturation_props(refrigerant, ctx.evap_temp_c)?
        .density_vapor;
    let density_5k = props.vapor_density(refrigerant, evap_k, 5.0)?;

    let density = 0.5 * (density_super + density_5k);
    let density_foroil = 0.5 * (density_foroil_super + density_sat);

    let velocity_term = |flow: f64, rho: f64| if rho > 0.0 { flow / (area_m2 * rho) } else { 0.0 };
    let v1 = velocity_term(mass_flow_kgps, density);
    let v1_min = velocity_term(mass_flow_min_kgps, density);
    let v2 = velocity_term(mass_flow_kgps, density_super2);
    let v2_min = velocity_term(mass_flow_min_kgps, density_super2);

    let weight = correlations::velocity1_weight(refrigerant, ctx.superheat_k);
    let velocity_mps = v1 * weight + v2 * (1.0 - weight);
    let velocity_min_mps = v1_min * weight + v2_min * (1.0 - weight);
    // Size for the worse of the two bounding states.
    let velocity_final_mps = velocity_mps.max(velocity_min_mps);

    let oil_return = oil_return::evaluate(
        ctx,
        &OilInputs {
            diameter_m,
            area_m2,
            vapor_density_kgpm3: density_foroil,
            mass_flow_kgps: mass_flow_foroil_kgps,
            mass_flow_min_kgps: mass_flow_foroil_min_kgps,
            inlet_enthalpy: h.h_in,
            inlet_enthalpy_min: h.h_in_min,
        },
    );

    // Density consistent with the max-liquid velocity, for Reynolds and the
    // dynamic pressure.
    let density_recalc = if velocity_mps > 0.0 {
        mass_flow_kgps / (velocity_mps * area_m2)
    } else {
        density
    };

    let viscosity_super = props.vapor_viscosity(refrigerant, penalized_k, ctx.superheat_k)?;
    let viscosity_mid_a = props.vapor_viscosity(refrigerant, evap_k, half_superheat)?;
    let viscosity_mid_b = props.vapor_viscosity(refrigerant, penalized_k, half_superheat)?;
    let viscosity_super2 = 0.5 * (viscosity_mid_a + viscosity_mid_b);
    let viscosity_5k = props.vapor_viscosity(refrigerant, evap_k, 5.0)?;
    let viscosity = 0.5 * (viscosity_super + viscosity_5k);
    let viscosity_upas = viscosity * weight + viscosity_super2 * (1.0 - weight);

    let reynolds = if viscosity_upas > 0.0 {
        density_recalc * velocity_final_mps * diameter_m / (viscosity_upas / 1.0e6)
    } else {
        0.0
    };

    let friction_factor =
        darcy_friction_factor(reynolds, ctx.material.roughness_m(), diameter_m);

    let Some((k_srb, k_lrb, k_ball, k_globe)) = row.k_factors() else {
        // Bore resolved but loss coefficients missing: report what was
        // computed and leave the pressure side undefined.
        return Ok(BranchResult {
            velocity_mps: velocity_final_mps,
            density_kgpm3: density_recalc,
            viscosity_upas,
            reynolds,
            friction_factor,
            mass_flow_kgps,
            diameter_m,
            area_m2,
            ..BranchResult::undefined(size, mass_flow_kgps)
        });
    };

    let q_kpa = 0.5 * density_recalc * velocity_final_mps * velocity_final_mps / 1000.0;
    let geometry = &ctx.geometry;
    let pressure_drop = PressureDropBreakdown {
        pipe_kpa: friction_factor * (geometry.length_m / diameter_m) * q_kpa,
        fittings_kpa: q_kpa
            * (k_srb * geometry.srb_equivalent() + k_lrb * geometry.lrb_equivalent()),
        valves_kpa: q_kpa * (k_ball * geometry.ball + k_globe * geometry.globe),
        misc_kpa: q_kpa * geometry.plf,
    };
    let dp_total_kpa = pressure_drop.total_kpa();

    let evap_pressure_bar = props.temperature_to_pressure(refrigerant, ctx.evap_temp_c)?;
    let post_pressure_bar = evap_pressure_bar - dp_total_kpa / 100.0;
    let post_temp_c = props.pressure_to_temperature(refrigerant, post_pressure_bar)?;
    let dt_k = ctx.evap_temp_c - post_temp_c;

    Ok(BranchResult {
        nominal_size: size.to_string(),
        mass_flow_kgps,
        velocity_mps: velocity_final_mps,
        density_kgpm3: density_recalc,
        viscosity_upas,
        reynolds,
        friction_factor,
        pressure_drop,
        post_temp_c,
        post_pressure_bar,
        dt_k,
        diameter_m,
        area_m2,
        oil_return,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::context::tests::r404a_context;
    use crate::geometry::{PipeGeometryRow, StaticCatalog};
    use rf_props::{PropertyStore, SaturationTable, SuperheatGrid};
    use std::sync::Arc;

    pub(crate) fn r404a_store() -> PropertyStore {
        let mut store = PropertyStore::new();
        store
            .insert_saturation(
                "R404A",
                SaturationTable {
                    temperature_c: vec![-40.0, -30.0, -20.0, -10.0, 0.0, 10.0, 20.0, 30.0, 40.0, 50.0],
                    bubblepoint_c: vec![
                        -40.7, -30.7, -20.7, -10.7, -0.7, 9.3, 19.4, 29.4, 39.5, 49.6,
                    ],
                    pressure_bar: vec![
                        1.33, 2.05, 3.03, 4.34, 6.04, 8.20, 10.91, 14.25, 18.31, 23.23,
                    ],
                    density_liquid: vec![
                        1278.0, 1244.0, 1210.0, 1173.0, 1151.0, 1103.0, 1062.0, 1017.0, 966.0,
                        905.0,
                    ],
                    density_vapor: vec![
                        6.9, 10.2, 14.6, 20.4, 27.8, 37.4, 49.7, 65.5, 86.2, 114.3,
                    ],
                    enthalpy_liquid: vec![
                        148.0, 160.5, 173.3, 186.4, 200.0, 214.9, 229.8, 245.6, 262.4, 281.0,
                    ],
                    enthalpy_liquid2: Some(vec![
                        147.0, 159.5, 172.3, 185.4, 199.0, 213.9, 228.8, 244.6, 261.4, 280.0,
                    ]),
                    enthalpy_vapor: vec![
                        342.0, 347.2, 352.0, 356.3, 360.0, 363.0, 365.1, 366.0, 365.4, 362.5,
                    ],
                    enthalpy_super: vec![
                        350.1, 355.6, 360.8, 365.5, 369.7, 373.0, 375.5, 376.8, 376.5, 373.9,
                    ],
                    viscosity_liquid: vec![
                        320.0, 280.0, 250.0, 220.0, 195.0, 175.0, 157.0, 140.0, 124.0, 108.0,
                    ],
                },
            )
            .unwrap();

        let superheat = vec![0.0, 5.0, 10.0, 20.0, 30.0];
        let density_rows = vec![
            (243.15, vec![10.2, 9.9, 9.6, 9.1, 8.7]),
            (253.15, vec![14.6, 14.1, 13.7, 13.0, 12.4]),
            (263.15, vec![20.4, 19.7, 19.1, 18.1, 17.2]),
            (273.15, vec![27.8, 26.9, 26.0, 24.6, 23.4]),
        ];
        store.insert_density_grid(
            "R404A",
            SuperheatGrid::from_rows(superheat.clone(), density_rows).unwrap(),
        );
        let viscosity_rows = vec![
            (243.15, vec![10.3, 10.5, 10.7, 11.1, 11.5]),
            (253.15, vec![10.7, 10.9, 11.1, 11.5, 11.9]),
            (263.15, vec![11.1, 11.3, 11.5, 11.9, 12.3]),
            (273.15, vec![11.5, 11.7, 11.9, 12.3, 12.7]),
        ];
        store.insert_viscosity_grid(
            "R404A",
            SuperheatGrid::from_rows(superheat, viscosity_rows).unwrap(),
        );
        store
    }

    pub(crate) fn catalog() -> StaticCatalog {
        StaticCatalog::new(vec![
            PipeGeometryRow {
                nominal_size: "1-3/8".to_string(),
                id_mm: 32.0,
                k_srb: Some(0.5),
                k_lrb: Some(0.3),
                k_ball: Some(0.05),
                k_globe: Some(6.0),
            },
            PipeGeometryRow {
                nominal_size: "2-1/8".to_string(),
                id_mm: 50.0,
                k_srb: Some(0.45),
                k_lrb: Some(0.27),
                k_ball: Some(0.05),
                k_globe: Some(5.5),
            },
            PipeGeometryRow {
                nominal_size: "no-k".to_string(),
                id_mm: 32.0,
                k_srb: None,
                k_lrb: None,
                k_ball: None,
                k_globe: None,
            },
        ])
    }

    fn service() -> PropertyService {
        PropertyService::cached(Arc::new(r404a_store()))
    }

    #[test]
    fn nominal_evaluation_is_physical() {
        let props = service();
        let ctx = r404a_context();
        let result = evaluate_branch(&props, &catalog(), "1-3/8", 0.25, &ctx).unwrap();

        assert_eq!(result.mass_flow_kgps, 0.25);
        assert!(result.velocity_mps > 0.0);
        assert!(result.reynolds > 2000.0, "expected turbulent flow");
        assert!(result.dp_total_kpa() > 0.0);
        assert!(result.post_pressure_bar < 4.34 + 1e-9);
        assert!(result.dt_k >= 0.0);
        assert!(result.oil_return.maxliq.is_some());
        assert!(result.oil_return.worst() <= result.oil_return.best());
    }

    #[test]
    fn larger_pipe_drops_less_pressure() {
        let props = service();
        let ctx = r404a_context();
        let small = evaluate_branch(&props, &catalog(), "1-3/8", 0.25, &ctx).unwrap();
        let large = evaluate_branch(&props, &catalog(), "2-1/8", 0.25, &ctx).unwrap();
        assert!(large.dp_total_kpa() < small.dp_total_kpa());
        assert!(large.velocity_mps < small.velocity_mps);
    }

    #[test]
    fn pressure_drop_decomposition_sums() {
        let props = service();
        let mut ctx = r404a_context();
        ctx.geometry.srb = 4.0;
        ctx.geometry.ball = 1.0;
        ctx.geometry.plf = 0.5;
        let result = evaluate_branch(&props, &catalog(), "1-3/8", 0.25, &ctx).unwrap();
        let sum = result.pressure_drop.pipe_kpa
            + result.pressure_drop.fittings_kpa
            + result.pressure_drop.valves_kpa
            + result.pressure_drop.misc_kpa;
        assert!((sum - result.dp_total_kpa()).abs() < 1e-12);
        assert!(result.pressure_drop.fittings_kpa > 0.0);
        assert!(result.pressure_drop.valves_kpa > 0.0);
        assert!(result.pressure_drop.misc_kpa > 0.0);
    }

    #[test]
    fn unknown_size_degrades_to_nan() {
        let props = service();
        let ctx = r404a_context();
        let result = evaluate_branch(&props, &catalog(), "7/8", 0.25, &ctx).unwrap();
        assert!(result.velocity_mps.is_nan());
        assert!(result.dp_total_kpa().is_nan());
        assert_eq!(result.oil_return, OilReturn::undefined());
        assert_eq!(result.mass_flow_kgps, 0.25);
    }

    #[test]
    fn missing_k_factors_keep_flow_quantities() {
        let props = service();
        let ctx = r404a_context();
        let result = evaluate_branch(&props, &catalog(), "no-k", 0.25, &ctx).unwrap();
        assert!(result.velocity_mps > 0.0);
        assert!(result.reynolds > 0.0);
        assert!(result.dp_total_kpa().is_nan());
        assert!(result.post_temp_c.is_nan());
    }

    #[test]
    fn negative_mass_flow_is_rejected() {
        let props = service();
        let ctx = r404a_context();
        let err = evaluate_branch(&props, &catalog(), "1-3/8", -0.1, &ctx);
        assert!(matches!(err, Err(HydroError::InvalidMassFlow { .. })));
        let err = evaluate_branch(&props, &catalog(), "1-3/8", f64::NAN, &ctx);
        assert!(matches!(err, Err(HydroError::InvalidMassFlow { .. })));
    }

    #[test]
    fn more_flow_means_more_velocity_and_drop() {
        let props = service();
        let ctx = r404a_context();
        let lean = evaluate_branch(&props, &catalog(), "1-3/8", 0.15, &ctx).unwrap();
        let rich = evaluate_branch(&props, &catalog(), "1-3/8", 0.35, &ctx).unwrap();
        assert!(rich.velocity_mps > lean.velocity_mps);
        assert!(rich.dp_total_kpa() > lean.dp_total_kpa());
    }

    #[test]
    fn worst_case_velocity_covers_min_liquid() {
        // Warmer min-liquid inlet shrinks the enthalpy difference, so the
        // min-liquid flow (and velocity) exceeds the max-liquid one; the
        // reported velocity must be the larger of the two.
        let props = service();
        let mut ctx = r404a_context();
        ctx.min_liquid_temp_c = 20.0;
        let cool = evaluate_branch(&props, &catalog(), "1-3/8", 0.25, &ctx).unwrap();
        ctx.min_liquid_temp_c = 39.0;
        let warm = evaluate_branch(&props, &catalog(), "1-3/8", 0.25, &ctx).unwrap();
        assert!(warm.velocity_mps >= cool.velocity_mps);
    }

    #[test]
    fn uom_accessors_carry_si_values() {
        let props = service();
        let ctx = r404a_context();
        let result = evaluate_branch(&props, &catalog(), "1-3/8", 0.25, &ctx).unwrap();
        let v = result.velocity();
        assert!((v.get::<uom::si::velocity::meter_per_second>() - result.velocity_mps).abs() < 1e-12);
        let dp = result.total_pressure_drop();
        assert!(
            (dp.get::<uom::si::pressure::kilopascal>() - result.dp_total_kpa()).abs() < 1e-9
        );
        let d = result.diameter();
        assert!((d.get::<uom::si::length::millimeter>() - 32.0).abs() < 1e-9);
        let mu = result.viscosity();
        assert!(
            (mu.get::<uom::si::dynamic_viscosity::micropascal_second>() - result.viscosity_upas)
                .abs()
                < 1e-9
        );
        let post_t = result.post_temperature();
        assert!(
            (post_t.get::<uom::si::thermodynamic_temperature::degree_celsius>()
                - result.post_temp_c)
                .abs()
                < 1e-9
        );
        let post_p = result.post_pressure();
        assert!((post_p.get::<uom::si::pressure::bar>() - result.post_pressure_bar).abs() < 1e-12);
        let dt = result.dt();
        assert!((dt.get::<uom::si::temperature_interval::kelvin>() - result.dt_k).abs() < 1e-12);
    }
}
