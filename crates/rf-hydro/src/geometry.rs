//! Pipe catalog interface.
//!
//! The catalog itself (CSV, database, whatever) lives with the host
//! application; the core only consumes resolved rows through the
//! `PipeCatalog` trait.

use rf_core::units::{self, Length};
use serde::{Deserialize, Serialize};

/// Pipe wall material and schedule, which fixes the absolute roughness used
/// by the friction correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipeMaterial {
    SteelSch40,
    SteelSch80,
    Copper,
}

impl PipeMaterial {
    /// Absolute roughness in metres.
    pub fn roughness_m(&self) -> f64 {
        match self {
            PipeMaterial::SteelSch40 | PipeMaterial::SteelSch80 => 0.000_045_72,
            PipeMaterial::Copper => 0.000_001_524,
        }
    }

    /// Catalog gauge qualifier, where the material implies one.
    pub fn gauge(&self) -> Option<&'static str> {
        match self {
            PipeMaterial::SteelSch40 => Some("SCH40"),
            PipeMaterial::SteelSch80 => Some("SCH80"),
            PipeMaterial::Copper => None,
        }
    }
}

/// One catalog entry for a nominal pipe size.
///
/// The K-factors are optional: a catalog row missing them still resolves a
/// bore, and the branch evaluation degrades the affected outputs to
/// undefined instead of failing the whole sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeGeometryRow {
    pub nominal_size: String,
    pub id_mm: f64,
    pub k_srb: Option<f64>,
    pub k_lrb: Option<f64>,
    pub k_ball: Option<f64>,
    pub k_globe: Option<f64>,
}

impl PipeGeometryRow {
    pub fn internal_diameter(&self) -> Length {
        units::mm(self.id_mm)
    }

    pub fn internal_diameter_m(&self) -> f64 {
        self.id_mm / 1000.0
    }

    pub fn flow_area_m2(&self) -> f64 {
        let r = self.internal_diameter_m() / 2.0;
        std::f64::consts::PI * r * r
    }

    /// All four K-factors, if the row carries them.
    pub fn k_factors(&self) -> Option<(f64, f64, f64, f64)> {
        Some((self.k_srb?, self.k_lrb?, self.k_ball?, self.k_globe?))
    }
}

/// External pipe-size resolver. `gauge` narrows the lookup for materials
/// that come in multiple schedules.
pub trait PipeCatalog {
    fn row_for_size(&self, size: &str, gauge: Option<&str>) -> Option<PipeGeometryRow>;
}

/// In-memory catalog, mainly for tests and embedded defaults.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    rows: Vec<PipeGeometryRow>,
}

impl StaticCatalog {
    pub fn new(rows: Vec<PipeGeometryRow>) -> Self {
        Self { rows }
    }
}

impl PipeCatalog for StaticCatalog {
    fn row_for_size(&self, size: &str, _gauge: Option<&str>) -> Option<PipeGeometryRow> {
        self.rows.iter().find(|r| r.nominal_size == size).cloned()
    }
}
