//! Darcy friction factor.

/// Reynolds number below which the flow is treated as laminar.
const LAMINAR_LIMIT: f64 = 2000.0;

/// Darcy friction factor for fully developed pipe flow.
///
/// Laminar `64/Re` below Re = 2000; above, the Swamee–Jain explicit
/// approximation to the Colebrook equation. A non-positive Reynolds number
/// (stagnant branch) gives zero friction, which zeroes the straight-pipe
/// pressure-drop term downstream.
pub fn darcy_friction_factor(reynolds: f64, roughness_m: f64, diameter_m: f64) -> f64 {
    if reynolds <= 0.0 {
        return 0.0;
    }
    if reynolds < LAMINAR_LIMIT {
        return 64.0 / reynolds;
    }
    let relative = roughness_m / (3.7 * diameter_m);
    let term = relative + 5.74 / reynolds.powf(0.9);
    0.25 / term.log10().powi(2)
}
