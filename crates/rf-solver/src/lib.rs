//! rf-solver: double-riser flow-split balancing and result aggregation.
//!
//! Bisects the small-branch mass flow of a double suction riser until both
//! branches drop the same pressure, then aggregates the per-branch results
//! into one `DoubleRiserResult` with system-level oil-return metrics.
//! Iteration progress is emitted as `tracing` debug events; exhaustion of
//! the iteration budget is a warning, not an error.

pub mod double_riser;
pub mod error;

pub use double_riser::{
    BalanceConfig, DoubleRiserResult, OilReturnMetrics, balance_double_riser, oil_return_metrics,
};
pub use error::{SolverError, SolverResult};
