//! rf-core: stable foundation for riserflow.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - poly (generic polynomial evaluation for empirical correlations)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod poly;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{RfError, RfResult};
pub use numeric::*;
pub use poly::Poly;
pub use units::*;
