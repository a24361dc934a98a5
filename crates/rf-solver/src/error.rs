//! Solver errors.

use rf_core::RfError;
use rf_hydro::HydroError;
use thiserror::Error;

/// Result type for solver operations.
pub type SolverResult<T> = Result<T, SolverError>;

#[derive(Error, Debug)]
pub enum SolverError {
    /// Branch evaluation failed before any split could be assessed.
    #[error(transparent)]
    Hydro(#[from] HydroError),

    /// Balancing needs a strictly positive total mass flow.
    #[error("Total mass flow must be > 0, got {value} kg/s")]
    NonPositiveTotalFlow { value: f64 },

    /// The iteration budget allowed no branch evaluation at all.
    #[error("No branch evaluation completed")]
    NoBranchEvaluation,
}

impl From<SolverError> for RfError {
    fn from(err: SolverError) -> Self {
        match err {
            SolverError::Hydro(e) => e.into(),
            SolverError::NonPositiveTotalFlow { value } => RfError::NonFinite {
                what: "total mass flow",
                value,
            },
            SolverError::NoBranchEvaluation => RfError::Invariant {
                what: "no branch evaluation completed",
            },
        }
    }
}
