//! rf-hydro: pipe-branch hydraulics and oil-return adequacy.
//!
//! One branch evaluation resolves a nominal pipe size against an external
//! catalog, infers the thermodynamic duty implied by the branch mass flow,
//! and produces velocity, Reynolds number, a decomposed pressure drop, the
//! downstream saturation state, and the minimum-oil-return (MOR) ratios at
//! the max- and min-liquid extremes.
//!
//! Everything physical and refrigerant-specific lives in `correlations` as
//! data-driven tables; `branch` is the orchestration.

pub mod branch;
pub mod context;
pub mod correlations;
pub mod error;
pub mod friction;
pub mod geometry;
pub mod oil_return;

pub use branch::{BranchResult, PressureDropBreakdown, evaluate_branch};
pub use context::{BranchGeometry, RiserContext};
pub use error::{HydroError, HydroResult};
pub use geometry::{PipeCatalog, PipeGeometryRow, PipeMaterial, StaticCatalog};
pub use oil_return::OilReturn;
