// rf-core/src/units.rs

use uom::si::f64::{
    DynamicViscosity as UomDynamicViscosity, Length as UomLength, MassRate as UomMassRate,
    Pressure as UomPressure, TemperatureInterval as UomTemperatureInterval,
    ThermodynamicTemperature as UomThermodynamicTemperature, Velocity as UomVelocity,
};

// Public canonical unit types (SI, f64)
pub type DynVisc = UomDynamicViscosity;
pub type Length = UomLength;
pub type MassRate = UomMassRate;
pub type Pressure = UomPressure;
pub type TempInterval = UomTemperatureInterval;
pub type Temperature = UomThermodynamicTemperature;
pub type Velocity = UomVelocity;

#[inline]
pub fn kpa(v: f64) -> Pressure {
    use uom::si::pressure::kilopascal;
    Pressure::new::<kilopascal>(v)
}

#[inline]
pub fn bar(v: f64) -> Pressure {
    use uom::si::pressure::bar;
    Pressure::new::<bar>(v)
}

#[inline]
pub fn celsius(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

#[inline]
pub fn kelvin_interval(v: f64) -> TempInterval {
    use uom::si::temperature_interval::kelvin;
    TempInterval::new::<kelvin>(v)
}

#[inline]
pub fn kgps(v: f64) -> MassRate {
    use uom::si::mass_rate::kilogram_per_second;
    MassRate::new::<kilogram_per_second>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn mm(v: f64) -> Length {
    use uom::si::length::millimeter;
    Length::new::<millimeter>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn upas(v: f64) -> DynVisc {
    use uom::si::dynamic_viscosity::micropascal_second;
    DynVisc::new::<micropascal_second>(v)
}

pub mod constants {
    /// Standard gravity, as used by the Wallis entrainment flux correlation.
    pub const G_MPS2: f64 = 9.81;

    /// Offset between the Celsius and Kelvin scales.
    pub const CELSIUS_TO_KELVIN: f64 = 273.15;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_kpa_consistency() {
        use uom::si::pressure::kilopascal;
        let p = bar(1.0);
        assert!((p.get::<kilopascal>() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn celsius_kelvin_offset() {
        use uom::si::thermodynamic_temperature::kelvin;
        let t = celsius(-10.0);
        assert!((t.get::<kelvin>() - 263.15).abs() < 1e-9);
        assert!((constants::CELSIUS_TO_KELVIN - 273.15).abs() == 0.0);
    }

    #[test]
    fn millimeter_meter_consistency() {
        use uom::si::length::meter;
        assert!((mm(34.9).get::<meter>() - 0.0349).abs() < 1e-12);
        assert!((m(0.0349).get::<meter>() - 0.0349).abs() < 1e-15);
    }
}
