//! rf-props: refrigerant property engine for riserflow.
//!
//! Provides:
//! - Refrigerant identity (R404A, R744, R744 TC, ...)
//! - Interpolation primitives (linear, log-linear, natural cubic spline,
//!   two-pass 2D grids)
//! - Tabulated saturation properties, superheated-vapor grids, and the
//!   transcritical CO2 pressure x temperature grids
//! - Saturation pressure <-> temperature conversion and the pressure-drop
//!   <-> temperature-penalty mapping
//! - `PropertyService`: the dependency-injected lookup facade with a
//!   bounded, concurrency-safe memoization cache
//!
//! # Architecture
//!
//! `PropertyStore` owns the immutable tables loaded once at startup;
//! everything downstream queries through `PropertyService`, so cached vs
//! uncached evaluation is a construction choice rather than two code paths.

pub mod convert;
pub mod error;
pub mod interp;
pub mod refrigerant;
pub mod service;
pub mod store;

// Re-exports for ergonomics
pub use error::{PropsError, PropsResult};
pub use interp::CubicSpline;
pub use refrigerant::Refrigerant;
pub use service::PropertyService;
pub use store::{
    CO2_BAND_HIGH_BAR, CO2_BAND_LOW_BAR, Co2Property, Co2Tables, PropertyStore, SaturationProps,
    SaturationTable, SuperheatGrid,
};
