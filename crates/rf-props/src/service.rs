//! `PropertyService`: the lookup facade injected into the hydraulic and
//! solver layers.
//!
//! Callers never touch `PropertyStore` directly; they hold a
//! `PropertyService` and get memoized or pass-through evaluation depending
//! on how the service was constructed. The cache is a bounded
//! least-recently-used map behind a `Mutex`, keyed by refrigerant, query
//! kind, and the raw bit patterns of the inputs. Errors are never cached.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::PropsResult;
use crate::refrigerant::Refrigerant;
use crate::store::{Co2Property, PropertyStore, SaturationProps};

/// Default cache capacity, in entries.
pub const DEFAULT_CACHE_CAPACITY: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum QueryKind {
    Saturation,
    VaporDensity,
    VaporViscosity,
    Co2(Co2Property),
    Co2InletEnthalpy,
    TempToPressure,
    PressureToTemp,
    DropToPenalty,
    PenaltyToDrop,
}

/// (refrigerant, kind, input bits); f64 inputs are compared bitwise so that
/// e.g. -0.0 and 0.0 occupy distinct slots rather than colliding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    refrigerant: Option<Refrigerant>,
    kind: QueryKind,
    bits: [u64; 2],
}

impl CacheKey {
    fn new(refrigerant: Option<Refrigerant>, kind: QueryKind, a: f64, b: f64) -> Self {
        Self {
            refrigerant,
            kind,
            bits: [a.to_bits(), b.to_bits()],
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum CacheValue {
    Scalar(f64),
    Saturation(SaturationProps),
}

#[derive(Debug)]
struct BoundedCache {
    map: HashMap<CacheKey, (u64, CacheValue)>,
    capacity: usize,
    tick: u64,
}

impl BoundedCache {
    fn new(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity.min(1024)),
            capacity,
            tick: 0,
        }
    }

    fn get(&mut self, key: &CacheKey) -> Option<CacheValue> {
        self.tick += 1;
        let tick = self.tick;
        self.map.get_mut(key).map(|entry| {
            entry.0 = tick;
            entry.1
        })
    }

    fn insert(&mut self, key: CacheKey, value: CacheValue) {
        if self.capacity == 0 {
            return;
        }
        self.tick += 1;
        if self.map.len() >= self.capacity && !self.map.contains_key(&key) {
            // Evict the least recently touched entry. Linear scan; the
            // capacity is small and inserts are rare once the cache warms.
            if let Some(oldest) = self
                .map
                .iter()
                .min_by_key(|(_, (tick, _))| *tick)
                .map(|(k, _)| *k)
            {
                self.map.remove(&oldest);
            }
        }
        self.map.insert(key, (self.tick, value));
    }
}

/// Property lookup facade with optional memoization. `Send + Sync`, so one
/// service can serve concurrent sizing requests.
#[derive(Debug)]
pub struct PropertyService {
    store: Arc<PropertyStore>,
    cache: Option<Mutex<BoundedCache>>,
}

impl PropertyService {
    /// Memoizing service with the default capacity.
    pub fn cached(store: Arc<PropertyStore>) -> Self {
        Self::with_capacity(store, DEFAULT_CACHE_CAPACITY)
    }

    /// Memoizing service with an explicit entry capacity.
    pub fn with_capacity(store: Arc<PropertyStore>, capacity: usize) -> Self {
        Self {
            store,
            cache: Some(Mutex::new(BoundedCache::new(capacity))),
        }
    }

    /// Pass-through service; every query hits the tables.
    pub fn uncached(store: Arc<PropertyStore>) -> Self {
        Self { store, cache: None }
    }

    pub fn store(&self) -> &PropertyStore {
        &self.store
    }

    fn scalar(
        &self,
        key: CacheKey,
        compute: impl FnOnce(&PropertyStore) -> PropsResult<f64>,
    ) -> PropsResult<f64> {
        if let Some(cache) = &self.cache {
            if let Ok(mut guard) = cache.lock() {
                if let Some(CacheValue::Scalar(v)) = guard.get(&key) {
                    return Ok(v);
                }
            }
        }
        let value = compute(&self.store)?;
        if let Some(cache) = &self.cache {
            if let Ok(mut guard) = cache.lock() {
                guard.insert(key, CacheValue::Scalar(value));
            }
        }
        Ok(value)
    }

    /// Saturation-state properties at `t_c` (°C).
    pub fn saturation_props(
        &self,
        refrigerant: Refrigerant,
        t_c: f64,
    ) -> PropsResult<SaturationProps> {
        let key = CacheKey::new(Some(refrigerant), QueryKind::Saturation, t_c, 0.0);
        if let Some(cache) = &self.cache {
            if let Ok(mut guard) = cache.lock() {
                if let Some(CacheValue::Saturation(p)) = guard.get(&key) {
                    return Ok(p);
                }
            }
        }
        let props = self.store.saturation_props(refrigerant, t_c)?;
        if let Some(cache) = &self.cache {
            if let Ok(mut guard) = cache.lock() {
                guard.insert(key, CacheValue::Saturation(props));
            }
        }
        Ok(props)
    }

    /// Superheated vapor density (kg/m³).
    pub fn vapor_density(
        &self,
        refrigerant: Refrigerant,
        evap_temp_k: f64,
        superheat_k: f64,
    ) -> PropsResult<f64> {
        let key = CacheKey::new(
            Some(refrigerant),
            QueryKind::VaporDensity,
            evap_temp_k,
            superheat_k,
        );
        self.scalar(key, |s| s.vapor_density(refrigerant, evap_temp_k, superheat_k))
    }

    /// Superheated vapor viscosity (µPa·s).
    pub fn vapor_viscosity(
        &self,
        refrigerant: Refrigerant,
        evap_temp_k: f64,
        superheat_k: f64,
    ) -> PropsResult<f64> {
        let key = CacheKey::new(
            Some(refrigerant),
            QueryKind::VaporViscosity,
            evap_temp_k,
            superheat_k,
        );
        self.scalar(key, |s| s.vapor_viscosity(refrigerant, evap_temp_k, superheat_k))
    }

    /// Supercritical CO2 property at (bar absolute, °C).
    pub fn co2_property(
        &self,
        prop: Co2Property,
        pressure_bar: f64,
        temp_c: f64,
    ) -> PropsResult<f64> {
        let key = CacheKey::new(None, QueryKind::Co2(prop), pressure_bar, temp_c);
        self.scalar(key, |s| s.co2_property(prop, pressure_bar, temp_c))
    }

    /// Gas-cooler-exit liquid enthalpy for transcritical CO2, with the
    /// near-critical band rejection.
    pub fn co2_inlet_enthalpy(&self, pressure_bar: f64, temp_c: f64) -> PropsResult<f64> {
        let key = CacheKey::new(None, QueryKind::Co2InletEnthalpy, pressure_bar, temp_c);
        self.scalar(key, |s| s.co2_inlet_enthalpy(pressure_bar, temp_c))
    }

    /// Saturation pressure (bar absolute) at `t_c`.
    pub fn temperature_to_pressure(
        &self,
        refrigerant: Refrigerant,
        t_c: f64,
    ) -> PropsResult<f64> {
        let key = CacheKey::new(Some(refrigerant), QueryKind::TempToPressure, t_c, 0.0);
        self.scalar(key, |s| s.temperature_to_pressure(refrigerant, t_c))
    }

    /// Saturation temperature (°C) at `pressure_bar`.
    pub fn pressure_to_temperature(
        &self,
        refrigerant: Refrigerant,
        pressure_bar: f64,
    ) -> PropsResult<f64> {
        let key = CacheKey::new(
            Some(refrigerant),
            QueryKind::PressureToTemp,
            pressure_bar,
            0.0,
        );
        self.scalar(key, |s| s.pressure_to_temperature(refrigerant, pressure_bar))
    }

    /// Temperature penalty (K) for a saturation pressure drop (bar) at `t_c`.
    pub fn pressure_drop_to_temp_penalty(
        &self,
        refrigerant: Refrigerant,
        t_c: f64,
        drop_bar: f64,
    ) -> PropsResult<f64> {
        let key = CacheKey::new(Some(refrigerant), QueryKind::DropToPenalty, t_c, drop_bar);
        self.scalar(key, |s| {
            s.pressure_drop_to_temp_penalty(refrigerant, t_c, drop_bar)
        })
    }

    /// Saturation pressure drop (bar) for a temperature penalty (K) at `t_c`.
    pub fn temp_penalty_to_pressure_drop(
        &self,
        refrigerant: Refrigerant,
        t_c: f64,
        penalty_k: f64,
    ) -> PropsResult<f64> {
        let key = CacheKey::new(Some(refrigerant), QueryKind::PenaltyToDrop, t_c, penalty_k);
        self.scalar(key, |s| {
            s.temp_penalty_to_pressure_drop(refrigerant, t_c, penalty_k)
        })
    }
}
