//! Double-riser flow-split balancing.
//!
//! A double riser splits the suction flow between a small and a large pipe;
//! in steady state both branches see the same pressure drop. The solver
//! bisects the small-branch mass flow until the two drops agree within
//! tolerance. Pressure drop increases monotonically with mass flow in the
//! friction-dominated regime this models, which is what makes plain
//! bisection sound; the flow-conservation and convergence properties are
//! pinned by tests rather than assumed.

use rf_hydro::{BranchResult, PipeCatalog, RiserContext, evaluate_branch};
use rf_props::PropertyService;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{SolverError, SolverResult};

/// Relative margin keeping both branches strictly away from zero flow.
const SPLIT_EPSILON: f64 = 1e-6;

/// Bisection settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceConfig {
    /// Acceptable pressure-drop imbalance between the branches, kPa.
    pub tol_kpa: f64,
    pub max_iter: u32,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            tol_kpa: 0.01,
            max_iter: 60,
        }
    }
}

/// Balanced double-riser outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoubleRiserResult {
    pub size_small: String,
    pub size_large: String,
    pub total_mass_flow_kgps: f64,
    pub mass_flow_small_kgps: f64,
    pub mass_flow_large_kgps: f64,
    /// Averaged branch pressure drop, kPa. The branches agree within
    /// tolerance when `converged` is set.
    pub dp_kpa: f64,
    /// Saturated-suction temperature penalty, K (small branch; both branches
    /// nominally share it once balanced).
    pub dt_k: f64,
    pub iterations: u32,
    pub converged: bool,
    /// Lowest finite MOR across both branches and both liquid extremes.
    pub mor_system_worst: Option<f64>,
    /// Highest finite MOR across both branches and both liquid extremes.
    pub mor_system_best: Option<f64>,
    pub small: BranchResult,
    pub large: BranchResult,
}

impl DoubleRiserResult {
    /// Share of the total flow carried by the large branch.
    pub fn large_flow_fraction(&self) -> f64 {
        self.mass_flow_large_kgps / self.total_mass_flow_kgps
    }
}

/// Headline oil-return numbers for a balanced double riser.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OilReturnMetrics {
    /// Worst MOR (%) anywhere in the system at full flow.
    pub mor_system_worst: f64,
    /// Worst MOR (%) of the large branch alone.
    pub mor_large_worst: f64,
    /// Downstream saturated suction temperature, °C.
    pub downstream_temp_c: f64,
    /// Share of the total flow carried by the large branch.
    pub large_flow_fraction: f64,
}

/// Oil-return summary, or `None` when the evaporating temperature is outside
/// the MOR validity window (no finite MOR anywhere).
pub fn oil_return_metrics(result: &DoubleRiserResult) -> Option<OilReturnMetrics> {
    Some(OilReturnMetrics {
        mor_system_worst: result.mor_system_worst?,
        mor_large_worst: result.large.oil_return.worst()?,
        downstream_temp_c: result.small.post_temp_c,
        large_flow_fraction: result.large_flow_fraction(),
    })
}

/// Find the mass-flow split where both branch pressure drops agree.
///
/// Fails only when no branch evaluation ever completes (bad total flow, a
/// property-domain error, or a zero iteration budget). Exhausting the
/// iteration budget returns the best split found with `converged = false`.
pub fn balance_double_riser(
    props: &PropertyService,
    catalog: &dyn PipeCatalog,
    size_small: &str,
    size_large: &str,
    total_mass_flow_kgps: f64,
    ctx: &RiserContext,
    config: &BalanceConfig,
) -> SolverResult<DoubleRiserResult> {
    if !total_mass_flow_kgps.is_finite() || total_mass_flow_kgps <= 0.0 {
        return Err(SolverError::NonPositiveTotalFlow {
            value: total_mass_flow_kgps,
        });
    }

    let mut lo = SPLIT_EPSILON * total_mass_flow_kgps;
    let mut hi = (1.0 - SPLIT_EPSILON) * total_mass_flow_kgps;

    let mut last: Option<(BranchResult, BranchResult)> = None;
    let mut iterations = 0;
    let mut converged = false;

    for iter in 0..config.max_iter {
        let m_small = 0.5 * (lo + hi);
        let m_large = total_mass_flow_kgps - m_small;

        let small = evaluate_branch(props, catalog, size_small, m_small, ctx)?;
        let large = evaluate_branch(props, catalog, size_large, m_large, ctx)?;
        iterations = iter + 1;

        let diff_kpa = small.dp_total_kpa() - large.dp_total_kpa();
        debug!(
            iter,
            m_small,
            m_large,
            dp_small = small.dp_total_kpa(),
            dp_large = large.dp_total_kpa(),
            diff_kpa,
            "double-riser bisection step"
        );
        last = Some((small, large));

        if diff_kpa.abs() <= config.tol_kpa {
            converged = true;
            break;
        }
        if diff_kpa > 0.0 {
            // Small branch drops more pressure: shift flow to the large one.
            hi = m_small;
        } else {
            lo = m_small;
        }
    }

    let Some((small, large)) = last else {
        return Err(SolverError::NoBranchEvaluation);
    };

    if !converged {
        warn!(
            size_small,
            size_large,
            iterations,
            tol_kpa = config.tol_kpa,
            "double-riser balancing exhausted its iteration budget"
        );
    }

    let mor_values: Vec<f64> = [
        small.oil_return.maxliq,
        small.oil_return.minliq,
        large.oil_return.maxliq,
        large.oil_return.minliq,
    ]
    .into_iter()
    .flatten()
    .filter(|v| v.is_finite())
    .collect();
    let mor_system_worst = mor_values.iter().copied().reduce(f64::min);
    let mor_system_best = mor_values.iter().copied().reduce(f64::max);

    Ok(DoubleRiserResult {
        size_small: size_small.to_string(),
        size_large: size_large.to_string(),
        total_mass_flow_kgps,
        mass_flow_small_kgps: small.mass_flow_kgps,
        mass_flow_large_kgps: total_mass_flow_kgps - small.mass_flow_kgps,
        dp_kpa: 0.5 * (small.dp_total_kpa() + large.dp_total_kpa()),
        dt_k: small.dt_k,
        iterations,
        converged,
        mor_system_worst,
        mor_system_best,
        small,
        large,
    })
}
