//! Tabulated refrigerant property data.
//!
//! Three families of tables, all immutable after load:
//! - saturation tables: parallel columns over a strictly increasing
//!   temperature axis, one per refrigerant;
//! - superheated-vapor grids: density and viscosity keyed by evaporating
//!   temperature (Kelvin) x superheat (K);
//! - transcritical CO2 grids: one temperature x pressure grid per property.
//!
//! The JSON shapes match the data files consumed at startup; see
//! `PropertyStore::load_dir`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use rf_core::{ensure_finite, nearly_equal, Tolerances};
use serde::Deserialize;

use crate::error::{PropsError, PropsResult};
use crate::interp::{self, CubicSpline};
use crate::refrigerant::Refrigerant;

/// Tolerance for matching stringified floating-point grid keys.
const KEY_TOLERANCE: f64 = 0.001;

/// Gas-cooler pressures in this open band (bar absolute) sit too close to the
/// R744 critical point for the tables to resolve; queries there are rejected.
pub const CO2_BAND_LOW_BAR: f64 = 72.13;
pub const CO2_BAND_HIGH_BAR: f64 = 73.8;

/// Raw saturation table for one refrigerant, as found in the data file.
#[derive(Debug, Clone, Deserialize)]
pub struct SaturationTable {
    #[serde(rename = "temperature_C")]
    pub temperature_c: Vec<f64>,
    #[serde(rename = "bubblepoint_C")]
    pub bubblepoint_c: Vec<f64>,
    pub pressure_bar: Vec<f64>,
    pub density_liquid: Vec<f64>,
    pub density_vapor: Vec<f64>,
    pub enthalpy_liquid: Vec<f64>,
    /// Bubble-point liquid enthalpy; feeds the thermal-duty inference.
    /// Falls back to `enthalpy_liquid` when a data set does not carry it.
    #[serde(default)]
    pub enthalpy_liquid2: Option<Vec<f64>>,
    pub enthalpy_vapor: Vec<f64>,
    pub enthalpy_super: Vec<f64>,
    pub viscosity_liquid: Vec<f64>,
}

impl SaturationTable {
    fn validate(&self) -> PropsResult<()> {
        let n = self.temperature_c.len();
        if n < 2 {
            return Err(PropsError::InvalidTable {
                what: "saturation table needs >= 2 points",
            });
        }
        let columns = [
            &self.bubblepoint_c,
            &self.pressure_bar,
            &self.density_liquid,
            &self.density_vapor,
            &self.enthalpy_liquid,
            &self.enthalpy_vapor,
            &self.enthalpy_super,
            &self.viscosity_liquid,
        ];
        if columns.iter().any(|c| c.len() != n)
            || self
                .enthalpy_liquid2
                .as_ref()
                .is_some_and(|c| c.len() != n)
        {
            return Err(PropsError::InvalidTable {
                what: "saturation table columns differ in length",
            });
        }
        if self.temperature_c.windows(2).any(|w| w[1] <= w[0]) {
            return Err(PropsError::InvalidTable {
                what: "saturation temperature axis must be strictly increasing",
            });
        }
        // A NaN or infinity anywhere would propagate silently through the
        // interpolators; reject it at load.
        for &v in self.temperature_c.iter().chain(columns.iter().copied().flatten()) {
            ensure_finite(v, "saturation table cell")?;
        }
        if let Some(liquid2) = &self.enthalpy_liquid2 {
            for &v in liquid2 {
                ensure_finite(v, "enthalpy_liquid2")?;
            }
        }
        // Columns interpolated in log space must stay positive.
        let log_columns: [(&str, &Vec<f64>); 6] = [
            ("pressure_bar", &self.pressure_bar),
            ("density_liquid", &self.density_liquid),
            ("density_vapor", &self.density_vapor),
            ("enthalpy_liquid", &self.enthalpy_liquid),
            ("enthalpy_vapor", &self.enthalpy_vapor),
            ("enthalpy_super", &self.enthalpy_super),
        ];
        for (name, column) in log_columns {
            if column.iter().any(|&v| v <= 0.0) {
                return Err(PropsError::NonPositiveTable { what: name });
            }
        }
        Ok(())
    }

    fn liquid2(&self) -> &[f64] {
        self.enthalpy_liquid2
            .as_deref()
            .unwrap_or(&self.enthalpy_liquid)
    }
}

/// Saturation-state properties at one temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturationProps {
    pub pressure_bar: f64,
    pub bubblepoint_c: f64,
    pub density_liquid: f64,
    pub density_vapor: f64,
    pub enthalpy_liquid: f64,
    pub enthalpy_liquid2: f64,
    pub enthalpy_vapor: f64,
    pub enthalpy_super: f64,
    pub viscosity_liquid: f64,
}

/// Saturation table plus the splines prepared at load.
#[derive(Debug, Clone)]
struct SaturationEntry {
    table: SaturationTable,
    // Non-multiplicative columns use the cubic spline; the rest interpolate
    // linearly in log space.
    bubblepoint: CubicSpline,
    viscosity: CubicSpline,
}

impl SaturationEntry {
    fn new(table: SaturationTable) -> PropsResult<Self> {
        table.validate()?;
        let bubblepoint = CubicSpline::fit(&table.temperature_c, &table.bubblepoint_c)?;
        let viscosity = CubicSpline::fit(&table.temperature_c, &table.viscosity_liquid)?;
        Ok(Self {
            table,
            bubblepoint,
            viscosity,
        })
    }

    fn props_at(&self, t_c: f64) -> SaturationProps {
        let t = &self.table.temperature_c;
        SaturationProps {
            pressure_bar: interp::interp_log(t, &self.table.pressure_bar, t_c),
            bubblepoint_c: self.bubblepoint.eval(t_c),
            density_liquid: interp::interp_log(t, &self.table.density_liquid, t_c),
            density_vapor: interp::interp_log(t, &self.table.density_vapor, t_c),
            enthalpy_liquid: interp::interp_log(t, &self.table.enthalpy_liquid, t_c),
            enthalpy_liquid2: interp::interp_log(t, self.table.liquid2(), t_c),
            enthalpy_vapor: interp::interp_log(t, &self.table.enthalpy_vapor, t_c),
            enthalpy_super: interp::interp_log(t, &self.table.enthalpy_super, t_c),
            viscosity_liquid: self.viscosity.eval(t_c),
        }
    }
}

/// 2D grid keyed by evaporating temperature (Kelvin, rows) x superheat (K).
#[derive(Debug, Clone)]
pub struct SuperheatGrid {
    superheat: Vec<f64>,
    evap_temps_k: Vec<f64>,
    values: Vec<Vec<f64>>,
}

impl SuperheatGrid {
    /// Build from the raw JSON object: a `superheat` axis plus one row per
    /// stringified-Kelvin temperature key.
    pub fn from_raw(raw: HashMap<String, Vec<f64>>) -> PropsResult<Self> {
        let superheat = raw
            .get("superheat")
            .cloned()
            .ok_or(PropsError::InvalidTable {
                what: "superheat grid missing 'superheat' axis",
            })?;
        if superheat.len() < 2 {
            return Err(PropsError::InvalidTable {
                what: "superheat axis needs >= 2 points",
            });
        }

        let mut rows: Vec<(f64, Vec<f64>)> = Vec::new();
        for (key, row) in raw {
            if key == "superheat" {
                continue;
            }
            let temp_k: f64 = key.parse().map_err(|_| PropsError::InvalidTable {
                what: "superheat grid key is not a temperature",
            })?;
            // Keys are floating values; treat near-identical ones as duplicates.
            let key_tol = Tolerances {
                abs: KEY_TOLERANCE,
                rel: 0.0,
            };
            if rows.iter().any(|(t, _)| nearly_equal(*t, temp_k, key_tol)) {
                return Err(PropsError::InvalidTable {
                    what: "duplicate temperature key in superheat grid",
                });
            }
            rows.push((temp_k, row));
        }
        if rows.is_empty() {
            return Err(PropsError::InvalidTable {
                what: "superheat grid has no temperature rows",
            });
        }
        rows.sort_by(|a, b| a.0.total_cmp(&b.0));

        let grid = Self {
            superheat,
            evap_temps_k: rows.iter().map(|(t, _)| *t).collect(),
            values: rows.into_iter().map(|(_, v)| v).collect(),
        };
        if grid.values.iter().any(|r| r.len() != grid.superheat.len()) {
            return Err(PropsError::InvalidTable {
                what: "superheat grid rows differ from superheat axis length",
            });
        }
        Ok(grid)
    }

    pub fn from_rows(superheat: Vec<f64>, rows: Vec<(f64, Vec<f64>)>) -> PropsResult<Self> {
        let mut raw: HashMap<String, Vec<f64>> = HashMap::new();
        raw.insert("superheat".to_string(), superheat);
        for (t, row) in rows {
            raw.insert(format!("{t}"), row);
        }
        Self::from_raw(raw)
    }

    fn lookup(&self, evap_temp_k: f64, superheat_k: f64, what: &'static str) -> PropsResult<f64> {
        interp::interp2_loglin(
            &self.superheat,
            &self.evap_temps_k,
            &self.values,
            superheat_k,
            evap_temp_k,
            what,
        )
    }
}

/// Property names carried by the transcritical CO2 data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Co2Property {
    Density,
    Enthalpy,
    Viscosity,
    Entropy,
}

impl Co2Property {
    pub fn as_str(&self) -> &'static str {
        match self {
            Co2Property::Density => "density",
            Co2Property::Enthalpy => "enthalpy",
            Co2Property::Viscosity => "viscosity",
            Co2Property::Entropy => "entropy",
        }
    }
}

/// One supercritical-CO2 grid: temperature (°C, columns) x pressure
/// (bar absolute, rows).
#[derive(Debug, Clone)]
pub struct Co2Grid {
    temperature_c: Vec<f64>,
    pressures_bar: Vec<f64>,
    values: Vec<Vec<f64>>,
}

impl Co2Grid {
    pub fn from_raw(raw: HashMap<String, Vec<f64>>) -> PropsResult<Self> {
        let temperature_c = raw
            .get("temperature")
            .cloned()
            .ok_or(PropsError::InvalidTable {
                what: "CO2 grid missing 'temperature' axis",
            })?;
        let mut rows: Vec<(f64, Vec<f64>)> = Vec::new();
        for (key, row) in raw {
            if key == "temperature" {
                continue;
            }
            let pressure: f64 = key.parse().map_err(|_| PropsError::InvalidTable {
                what: "CO2 grid key is not a pressure",
            })?;
            rows.push((pressure, row));
        }
        if rows.is_empty() {
            return Err(PropsError::InvalidTable {
                what: "CO2 grid has no pressure rows",
            });
        }
        rows.sort_by(|a, b| a.0.total_cmp(&b.0));
        let grid = Self {
            temperature_c,
            pressures_bar: rows.iter().map(|(p, _)| *p).collect(),
            values: rows.into_iter().map(|(_, v)| v).collect(),
        };
        if grid
            .values
            .iter()
            .any(|r| r.len() != grid.temperature_c.len())
        {
            return Err(PropsError::InvalidTable {
                what: "CO2 grid rows differ from temperature axis length",
            });
        }
        // Every cell is log-transformed on lookup; reject bad data at load.
        if grid.values.iter().flatten().any(|&v| v <= 0.0) {
            return Err(PropsError::NonPositiveTable { what: "CO2 grid" });
        }
        Ok(grid)
    }

    fn lookup(&self, pressure_bar: f64, temp_c: f64, what: &'static str) -> PropsResult<f64> {
        interp::interp2_loglin(
            &self.temperature_c,
            &self.pressures_bar,
            &self.values,
            temp_c,
            pressure_bar,
            what,
        )
    }
}

/// Transcritical CO2 grids, one per property.
#[derive(Debug, Clone)]
pub struct Co2Tables {
    pub density: Co2Grid,
    pub enthalpy: Co2Grid,
    pub viscosity: Co2Grid,
    pub entropy: Co2Grid,
}

/// Owns every property table; immutable after load, lifetime = process.
#[derive(Debug, Clone, Default)]
pub struct PropertyStore {
    saturation: HashMap<String, SaturationEntry>,
    density_grids: HashMap<String, SuperheatGrid>,
    viscosity_grids: HashMap<String, SuperheatGrid>,
    co2: Option<Co2Tables>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the data directory consumed at startup:
    /// `refrigerant_tables.json`, `refrigerant_densities.json`,
    /// `refrigerant_viscosities.json`, and `supercompliq_co2.json`.
    pub fn load_dir(dir: &Path) -> PropsResult<Self> {
        let mut store = Self::new();

        let tables: HashMap<String, SaturationTable> =
            serde_json::from_str(&fs::read_to_string(dir.join("refrigerant_tables.json"))?)?;
        for (name, table) in tables {
            store.insert_saturation(&name, table)?;
        }

        let densities: HashMap<String, HashMap<String, Vec<f64>>> =
            serde_json::from_str(&fs::read_to_string(dir.join("refrigerant_densities.json"))?)?;
        for (name, raw) in densities {
            store.insert_density_grid(&name, SuperheatGrid::from_raw(raw)?);
        }

        let viscosities: HashMap<String, HashMap<String, Vec<f64>>> = serde_json::from_str(
            &fs::read_to_string(dir.join("refrigerant_viscosities.json"))?,
        )?;
        for (name, raw) in viscosities {
            store.insert_viscosity_grid(&name, SuperheatGrid::from_raw(raw)?);
        }

        let co2_path = dir.join("supercompliq_co2.json");
        if co2_path.exists() {
            let raw: HashMap<String, HashMap<String, Vec<f64>>> =
                serde_json::from_str(&fs::read_to_string(co2_path)?)?;
            store.set_co2_tables(Co2Tables {
                density: Self::co2_grid(&raw, "density")?,
                enthalpy: Self::co2_grid(&raw, "enthalpy")?,
                viscosity: Self::co2_grid(&raw, "viscosity")?,
                entropy: Self::co2_grid(&raw, "entropy")?,
            });
        }

        Ok(store)
    }

    fn co2_grid(
        raw: &HashMap<String, HashMap<String, Vec<f64>>>,
        prop: &'static str,
    ) -> PropsResult<Co2Grid> {
        let table = raw
            .get(prop)
            .ok_or(PropsError::MissingCo2Property { what: prop })?;
        Co2Grid::from_raw(table.clone())
    }

    pub fn insert_saturation(&mut self, name: &str, table: SaturationTable) -> PropsResult<()> {
        self.saturation
            .insert(name.to_string(), SaturationEntry::new(table)?);
        Ok(())
    }

    pub fn insert_density_grid(&mut self, name: &str, grid: SuperheatGrid) {
        self.density_grids.insert(name.to_string(), grid);
    }

    pub fn insert_viscosity_grid(&mut self, name: &str, grid: SuperheatGrid) {
        self.viscosity_grids.insert(name.to_string(), grid);
    }

    pub fn set_co2_tables(&mut self, tables: Co2Tables) {
        self.co2 = Some(tables);
    }

    fn entry(&self, refrigerant: Refrigerant) -> PropsResult<&SaturationEntry> {
        self.saturation.get(refrigerant.table_key()).ok_or_else(|| {
            PropsError::UnknownRefrigerant {
                name: refrigerant.table_key().to_string(),
                table: "saturation",
            }
        })
    }

    /// Saturation-state properties at `t_c` (°C), edge-clamped.
    pub fn saturation_props(
        &self,
        refrigerant: Refrigerant,
        t_c: f64,
    ) -> PropsResult<SaturationProps> {
        Ok(self.entry(refrigerant)?.props_at(t_c))
    }

    /// Temperature axis of the saturation table (°C), for range checks.
    pub fn saturation_temperature_range(
        &self,
        refrigerant: Refrigerant,
    ) -> PropsResult<(f64, f64)> {
        let t = &self.entry(refrigerant)?.table.temperature_c;
        Ok((t[0], t[t.len() - 1]))
    }

    pub(crate) fn saturation_axes(
        &self,
        refrigerant: Refrigerant,
    ) -> PropsResult<(&[f64], &[f64])> {
        let entry = self.entry(refrigerant)?;
        Ok((&entry.table.temperature_c, &entry.table.pressure_bar))
    }

    /// Superheated vapor density (kg/m³) at evaporating temperature (Kelvin)
    /// and superheat (K).
    pub fn vapor_density(
        &self,
        refrigerant: Refrigerant,
        evap_temp_k: f64,
        superheat_k: f64,
    ) -> PropsResult<f64> {
        self.density_grids
            .get(refrigerant.table_key())
            .ok_or_else(|| PropsError::UnknownRefrigerant {
                name: refrigerant.table_key().to_string(),
                table: "densities",
            })?
            .lookup(evap_temp_k, superheat_k, "vapor density")
    }

    /// Superheated vapor viscosity (µPa·s) at evaporating temperature
    /// (Kelvin) and superheat (K).
    pub fn vapor_viscosity(
        &self,
        refrigerant: Refrigerant,
        evap_temp_k: f64,
        superheat_k: f64,
    ) -> PropsResult<f64> {
        self.viscosity_grids
            .get(refrigerant.table_key())
            .ok_or_else(|| PropsError::UnknownRefrigerant {
                name: refrigerant.table_key().to_string(),
                table: "viscosities",
            })?
            .lookup(evap_temp_k, superheat_k, "vapor viscosity")
    }

    /// Supercritical/transcritical CO2 property at pressure (bar absolute)
    /// and temperature (°C).
    pub fn co2_property(
        &self,
        prop: Co2Property,
        pressure_bar: f64,
        temp_c: f64,
    ) -> PropsResult<f64> {
        let tables = self.co2.as_ref().ok_or(PropsError::MissingCo2Property {
            what: "supercritical tables not loaded",
        })?;
        let grid = match prop {
            Co2Property::Density => &tables.density,
            Co2Property::Enthalpy => &tables.enthalpy,
            Co2Property::Viscosity => &tables.viscosity,
            Co2Property::Entropy => &tables.entropy,
        };
        grid.lookup(pressure_bar, temp_c, prop.as_str())
    }

    /// Liquid-inlet enthalpy for transcritical CO2 at the gas-cooler exit.
    ///
    /// Above the band the supercritical enthalpy grid applies at the outlet
    /// pressure and liquid temperature; below it the system is running
    /// subcritically and the R744 saturation curve applies at the liquid
    /// temperature. Inside the band the tables cannot resolve the state and
    /// the query is rejected.
    pub fn co2_inlet_enthalpy(&self, pressure_bar: f64, temp_c: f64) -> PropsResult<f64> {
        if pressure_bar > CO2_BAND_LOW_BAR && pressure_bar < CO2_BAND_HIGH_BAR {
            return Err(PropsError::DisallowedCo2Band { pressure_bar });
        }
        if pressure_bar >= CO2_BAND_HIGH_BAR {
            return self.co2_property(Co2Property::Enthalpy, pressure_bar, temp_c);
        }
        Ok(self.saturation_props(Refrigerant::R744, temp_c)?.enthalpy_liquid2)
    }
}
