//! Double-riser balancing against the shipped property data.

use std::path::Path;
use std::sync::{Arc, OnceLock};

use proptest::prelude::*;
use rf_hydro::{
    BranchGeometry, HydroError, PipeGeometryRow, PipeMaterial, RiserContext, StaticCatalog,
};
use rf_props::{PropertyService, PropertyStore, PropsError, Refrigerant};
use rf_solver::{BalanceConfig, SolverError, balance_double_riser, oil_return_metrics};

fn store() -> Arc<PropertyStore> {
    static STORE: OnceLock<Arc<PropertyStore>> = OnceLock::new();
    Arc::clone(STORE.get_or_init(|| {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data");
        Arc::new(PropertyStore::load_dir(&dir).expect("data directory should load"))
    }))
}

fn catalog() -> StaticCatalog {
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
    ])
}

fn r404a_context() -> RiserContext {
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
fn r404a_reference_scenario_balances() {
    let props = PropertyService::cached(store());
    let ctx = r404a_context();
    let result = balance_double_riser(
        &props,
        &catalog(),
        "1-3/8",
        "2-1/8",
        0.5,
        &ctx,
        &BalanceConfig::default(),
    )
    .unwrap();

    assert!(result.converged, "should balance within 60 iterations");
    assert!(result.iterations <= 60);
    let imbalance = (result.small.dp_total_kpa() - result.large.dp_total_kpa()).abs();
    assert!(imbalance <= 0.01, "imbalance = {imbalance} kPa");

    // The large pipe drops less pressure per unit flow, so it carries more.
    assert!(result.mass_flow_small_kgps < result.mass_flow_large_kgps);
    let total = result.mass_flow_small_kgps + result.mass_flow_large_kgps;
    assert!((total - 0.5).abs() <= f64::EPSILON * 4.0);

    assert!(result.dp_kpa > 0.0);
    assert!(result.dt_k >= 0.0);
    assert!(result.mor_system_worst.unwrap() <= result.mor_system_best.unwrap());

    let metrics = oil_return_metrics(&result).expect("inside MOR validity window");
    assert!((metrics.large_flow_fraction - result.mass_flow_large_kgps / 0.5).abs() < 1e-12);
    assert!(metrics.large_flow_fraction > 0.5);
    assert!(metrics.downstream_temp_c <= ctx.evap_temp_c);
}

#[test]
fn non_positive_total_flow_fails() {
    let props = PropertyService::cached(store());
    let ctx = r404a_context();
    for flow in [0.0, -0.5, f64::NAN] {
        let err = balance_double_riser(
            &props,
            &catalog(),
            "1-3/8",
            "2-1/8",
            flow,
            &ctx,
            &BalanceConfig::default(),
        );
        assert!(matches!(err, Err(SolverError::NonPositiveTotalFlow { .. })));
    }
}

#[test]
fn exhausted_budget_returns_best_effort() {
    let props = PropertyService::cached(store());
    let ctx = r404a_context();
    let config = BalanceConfig {
        tol_kpa: 1e-12,
        max_iter: 3,
    };
    let result = balance_double_riser(&props, &catalog(), "1-3/8", "2-1/8", 0.5, &ctx, &config)
        .unwrap();
    assert!(!result.converged);
    assert_eq!(result.iterations, 3);
    assert!(result.dp_kpa.is_finite());
}

#[test]
fn zero_iteration_budget_is_a_failure() {
    let props = PropertyService::cached(store());
    let ctx = r404a_context();
    let config = BalanceConfig {
        tol_kpa: 0.01,
        max_iter: 0,
    };
    let err = balance_double_riser(&props, &catalog(), "1-3/8", "2-1/8", 0.5, &ctx, &config);
    assert!(matches!(err, Err(SolverError::NoBranchEvaluation)));
}

#[test]
fn transcritical_co2_band_is_a_domain_error() {
    let props = PropertyService::cached(store());
    let mut ctx = r404a_context();
    ctx.refrigerant = Refrigerant::R744Tc;
    ctx.evap_temp_c = -10.0;
    ctx.gc_max_pressure_bar = Some(90.0);
    ctx.gc_min_pressure_bar = Some(73.0);
    let err = balance_double_riser(
        &props,
        &catalog(),
        "1-3/8",
        "2-1/8",
        0.5,
        &ctx,
        &BalanceConfig::default(),
    );
    assert!(matches!(
        err,
        Err(SolverError::Hydro(HydroError::Props(
            PropsError::DisallowedCo2Band { .. }
        )))
    ));
}

#[test]
fn transcritical_co2_balances_outside_the_band() {
    let props = PropertyService::cached(store());
    let mut ctx = r404a_context();
    ctx.refrigerant = Refrigerant::R744Tc;
    ctx.max_liquid_temp_c = 35.0;
    ctx.min_liquid_temp_c = 30.0;
    ctx.gc_max_pressure_bar = Some(90.0);
    ctx.gc_min_pressure_bar = Some(80.0);
    let result = balance_double_riser(
        &props,
        &catalog(),
        "1-3/8",
        "2-1/8",
        0.5,
        &ctx,
        &BalanceConfig::default(),
    )
    .unwrap();
    assert!(result.converged);
    assert!(result.dp_kpa.is_finite() && result.dp_kpa > 0.0);
    assert!(result.mor_system_worst.is_some());
}

#[test]
fn mor_is_undefined_outside_the_validity_window() {
    let props = PropertyService::cached(store());
    let mut ctx = r404a_context();
    ctx.evap_temp_c = 10.0;
    let result = balance_double_riser(
        &props,
        &catalog(),
        "1-3/8",
        "2-1/8",
        0.5,
        &ctx,
        &BalanceConfig::default(),
    )
    .unwrap();
    assert_eq!(result.mor_system_worst, None);
    assert_eq!(result.mor_system_best, None);
    assert!(oil_return_metrics(&result).is_none());
}

proptest! {
    // Flow conservation holds whatever the convergence quality.
    #[test]
    fn split_conserves_total_flow(total in 0.05f64..1.5) {
        let props = PropertyService::uncached(store());
        let ctx = r404a_context();
        let result = balance_double_riser(
            &props,
            &catalog(),
            "1-3/8",
            "2-1/8",
            total,
            &ctx,
            &BalanceConfig::default(),
        ).unwrap();
        let sum = result.mass_flow_small_kgps + result.mass_flow_large_kgps;
        prop_assert!((sum - total).abs() <= f64::EPSILON * total * 4.0);
        prop_assert!(result.mass_flow_small_kgps > 0.0);
        prop_assert!(result.mass_flow_large_kgps > 0.0);
        if result.converged {
            let imbalance = (result.small.dp_total_kpa() - result.large.dp_total_kpa()).abs();
            prop_assert!(imbalance <= 0.01);
        }
    }
}
