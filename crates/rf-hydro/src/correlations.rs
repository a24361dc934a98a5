//! Refrigerant-specific empirical correlations.
//!
//! Every per-refrigerant constant lives here as a static table entry keyed by
//! `Refrigerant`, evaluated through one generic polynomial path. The fitted
//! coefficients are reproduced digit-for-digit from the validated sizing
//! model; do not round them.

use rf_core::poly::Poly;
use rf_props::Refrigerant;

/// Blending weight between the two velocity/viscosity estimation terms.
///
/// The weight multiplies the blend-density term; `1 - weight` multiplies the
/// intermediate-density term. CO2 always uses the first term; several blends
/// switch the first term in only above a superheat threshold.
#[derive(Debug, Clone, Copy)]
enum VelocityWeight {
    Constant(f64),
    /// `poly(superheat)` strictly above the threshold, `below` otherwise.
    Piecewise {
        threshold_k: f64,
        above: Poly,
        below: f64,
    },
}

impl VelocityWeight {
    fn at(&self, superheat_k: f64) -> f64 {
        match self {
            VelocityWeight::Constant(w) => *w,
            VelocityWeight::Piecewise {
                threshold_k,
                above,
                below,
            } => {
                if superheat_k > *threshold_k {
                    above.eval(superheat_k)
                } else {
                    *below
                }
            }
        }
    }
}

const VELOCITY1_DEFAULT: VelocityWeight = VelocityWeight::Piecewise {
    threshold_k: 30.0,
    above: Poly::new(&[
        0.0000406422632403154,
        -0.000541007136813307,
        0.748882946418884,
    ]),
    below: 0.769230769230769,
};

static VELOCITY1: &[(Refrigerant, VelocityWeight)] = &[
    (Refrigerant::R744, VelocityWeight::Constant(1.0)),
    (Refrigerant::R744Tc, VelocityWeight::Constant(1.0)),
    (
        Refrigerant::R404A,
        VelocityWeight::Piecewise {
            threshold_k: 45.0,
            above: Poly::new(&[0.0328330590542629, -1.47748765744183]),
            below: 0.0,
        },
    ),
    (
        Refrigerant::R134a,
        VelocityWeight::Piecewise {
            threshold_k: 30.0,
            above: Poly::new(&[
                -0.000566085879684639,
                0.075049554857083,
                -1.74200935399632,
            ]),
            below: 0.0,
        },
    ),
    (Refrigerant::R407F, VelocityWeight::Constant(1.0)),
    (Refrigerant::R407A, VelocityWeight::Constant(1.0)),
    (Refrigerant::R410A, VelocityWeight::Constant(1.0)),
    (Refrigerant::R22, VelocityWeight::Constant(1.0)),
    (Refrigerant::R502, VelocityWeight::Constant(1.0)),
    (Refrigerant::R507A, VelocityWeight::Constant(1.0)),
    (Refrigerant::R448A, VelocityWeight::Constant(1.0)),
    (Refrigerant::R449A, VelocityWeight::Constant(1.0)),
    (Refrigerant::R717, VelocityWeight::Constant(1.0)),
    (Refrigerant::R407C, VelocityWeight::Constant(0.0)),
];

/// Weight of the first velocity term for `refrigerant` at `superheat_k`.
pub fn velocity1_weight(refrigerant: Refrigerant, superheat_k: f64) -> f64 {
    VELOCITY1
        .iter()
        .find(|(r, _)| *r == refrigerant)
        .map(|(_, w)| *w)
        .unwrap_or(VELOCITY1_DEFAULT)
        .at(superheat_k)
}

const JG_HALF_DEFAULT: f64 = 0.865;

static JG_HALF: &[(Refrigerant, f64)] = &[
    (Refrigerant::R404A, 0.860772464072673),
    (Refrigerant::R134a, 0.869986729796935),
    (Refrigerant::R407F, 0.869042493641944),
    (Refrigerant::R744, 0.877950613678719),
    (Refrigerant::R744Tc, 0.877950613678719),
    (Refrigerant::R407A, 0.867374311574041),
    (Refrigerant::R410A, 0.8904423325365),
    (Refrigerant::R407C, 0.858592104849471),
    (Refrigerant::R22, 0.860563058394146),
    (Refrigerant::R502, 0.858236706656266),
    (Refrigerant::R507A, 0.887709710291009),
    (Refrigerant::R449A, 0.867980496631757),
    (Refrigerant::R448A, 0.86578818145833),
    (Refrigerant::R717, 0.854957410951708),
    (Refrigerant::R290, 0.844975139695726),
    (Refrigerant::R1270, 0.849089717732815),
    (Refrigerant::R600a, 0.84339338979887),
    (Refrigerant::R1234ze, 0.867821375349728),
    (Refrigerant::R1234yf, 0.860767472602571),
    (Refrigerant::R12, 0.8735441986466),
    (Refrigerant::R11, 0.864493203834913),
    (Refrigerant::R454B, 0.869102255850291),
    (Refrigerant::R450A, 0.865387140496035),
    (Refrigerant::R513A, 0.861251244627232),
    (Refrigerant::R454A, 0.868161104592492),
    (Refrigerant::R455A, 0.865687329727713),
    (Refrigerant::R454C, 0.866423016875524),
    (Refrigerant::R32, 0.875213309852597),
    (Refrigerant::R23, 0.865673418568001),
    (Refrigerant::R508B, 0.864305626845382),
];

/// Wallis `jg½` entrainment coefficient.
pub fn jg_half(refrigerant: Refrigerant) -> f64 {
    JG_HALF
        .iter()
        .find(|(r, _)| *r == refrigerant)
        .map(|(_, v)| *v)
        .unwrap_or(JG_HALF_DEFAULT)
}

// Oil-mixture density fits (kg/m³ against °C): a quadratic for the standard
// oil and a linear fit for the oil run with R23/R508B cascades.
const OIL_DENSITY_STANDARD: Poly = Poly::new(&[
    -0.00356060606060549,
    -0.957878787878808,
    963.595454545455,
]);
const OIL_DENSITY_ULT: Poly = Poly::new(&[-0.853841209044878, 999.190772536527]);

/// Oil-mixture density (kg/m³) at `temp_c`.
pub fn oil_density_kgpm3(refrigerant: Refrigerant, temp_c: f64) -> f64 {
    if refrigerant.is_ultra_low_temp() {
        OIL_DENSITY_ULT.eval(temp_c)
    } else {
        OIL_DENSITY_STANDARD.eval(temp_c)
    }
}

/// Temperature offsets that map the R23/R508B cascade temperatures onto the
/// oil-correlation axis.
const LIQUID_TEMP_OFFSET_ULT_K: f64 = 47.03;
const EVAP_TEMP_OFFSET_ULT_K: f64 = 46.14;

/// Liquid temperature as seen by the first MOR correction.
pub fn adjusted_liquid_temp(refrigerant: Refrigerant, liquid_temp_c: f64) -> f64 {
    if refrigerant.is_ultra_low_temp() {
        liquid_temp_c + LIQUID_TEMP_OFFSET_ULT_K
    } else {
        liquid_temp_c
    }
}

/// Evaporating temperature as seen by the second MOR correction.
pub fn adjusted_evap_temp(refrigerant: Refrigerant, evap_temp_c: f64) -> f64 {
    if refrigerant.is_ultra_low_temp() {
        evap_temp_c + EVAP_TEMP_OFFSET_ULT_K
    } else {
        evap_temp_c
    }
}

/// Argument the first MOR correction is fitted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CorrectionInput {
    LiquidTemp,
    /// Transcritical CO2 is fitted against the gas-cooler inlet enthalpy
    /// instead of a liquid temperature.
    InletEnthalpy,
}

#[derive(Debug, Clone, Copy)]
struct MorCorrection {
    input: CorrectionInput,
    poly: Poly,
    /// Lower clamp on the fitted argument, where the fit has one.
    min_x: Option<f64>,
}

impl MorCorrection {
    const fn temp(poly: Poly) -> Self {
        Self {
            input: CorrectionInput::LiquidTemp,
            poly,
            min_x: None,
        }
    }

    const fn temp_clamped(poly: Poly, min_x: f64) -> Self {
        Self {
            input: CorrectionInput::LiquidTemp,
            poly,
            min_x: Some(min_x),
        }
    }

    fn eval(&self, x: f64) -> f64 {
        match self.min_x {
            Some(min_x) => self.poly.eval_clamped_below(x, min_x),
            None => self.poly.eval(x),
        }
    }
}

const MOR_LIQUID_DEFAULT: MorCorrection = MorCorrection::temp_clamped(
    Poly::new(&[
        0.00000461020482461793,
        0.000217910548009675,
        -0.012074621594626,
    ]),
    -23.6334996273983,
);

const MOR_LIQUID_R407A_FAMILY: MorCorrection = MorCorrection::temp(Poly::new(&[
    0.00000414431651323856,
    0.000381908525139781,
    -0.0163450053041212,
]));

static MOR_LIQUID: &[(Refrigerant, MorCorrection)] = &[
    (
        Refrigerant::R744,
        MorCorrection::temp(Poly::new(&[0.000225755013421421, -0.00280879370374927])),
    ),
    (
        Refrigerant::R744Tc,
        MorCorrection {
            input: CorrectionInput::InletEnthalpy,
            poly: Poly::new(&[0.0000603336117708171, -0.0142318718120024]),
            min_x: None,
        },
    ),
    (Refrigerant::R407A, MOR_LIQUID_R407A_FAMILY),
    (Refrigerant::R449A, MOR_LIQUID_R407A_FAMILY),
    (Refrigerant::R448A, MOR_LIQUID_R407A_FAMILY),
    (Refrigerant::R502, MOR_LIQUID_R407A_FAMILY),
    (
        Refrigerant::R507A,
        MorCorrection::temp(Poly::new(&[0.000302619054048837, -0.00930188913363997])),
    ),
    (
        Refrigerant::R22,
        MorCorrection::temp(Poly::new(&[0.000108153843367715, -0.00329248681202757])),
    ),
    (
        Refrigerant::R407C,
        MorCorrection::temp_clamped(
            Poly::new(&[
                0.00000420322918839302,
                0.000269608915211859,
                -0.0134546663857195,
            ]),
            -32.0716410083429,
        ),
    ),
    (Refrigerant::R410A, MorCorrection::temp(Poly::new(&[0.0]))),
    (
        Refrigerant::R407F,
        MorCorrection::temp_clamped(
            Poly::new(&[
                0.00000347332380289385,
                0.000239205332540693,
                -0.0121545316131988,
            ]),
            -34.4346433150568,
        ),
    ),
    (
        Refrigerant::R134a,
        MorCorrection::temp(Poly::new(&[0.000195224660107459, -0.00591757011487048])),
    ),
    (
        Refrigerant::R404A,
        MorCorrection::temp_clamped(
            Poly::new(&[0.0000156507169104918, 0.000689621839324826, -0.0392]),
            -22.031637377024,
        ),
    ),
];

/// First MOR correction factor, fitted against the adjusted liquid
/// temperature (or, for transcritical CO2, the gas-cooler inlet enthalpy).
pub fn mor_liquid_correction(
    refrigerant: Refrigerant,
    adjusted_liquid_temp_c: f64,
    inlet_enthalpy: f64,
) -> f64 {
    let correction = MOR_LIQUID
        .iter()
        .find(|(r, _)| *r == refrigerant)
        .map(|(_, c)| *c)
        .unwrap_or(MOR_LIQUID_DEFAULT);
    let x = match correction.input {
        CorrectionInput::LiquidTemp => adjusted_liquid_temp_c,
        CorrectionInput::InletEnthalpy => inlet_enthalpy,
    };
    correction.eval(x)
}

const MOR_EVAP_DEFAULT: Poly = Poly::new(&[-0.000711441807827186, -0.0118194116436425]);

const MOR_EVAP_CO2: Poly = Poly::new(&[
    -0.0000176412848988908,
    -0.00164308248808803,
    -0.0184308798286039,
]);

static MOR_EVAP: &[(Refrigerant, Poly)] = &[
    (Refrigerant::R744, MOR_EVAP_CO2),
    (Refrigerant::R744Tc, MOR_EVAP_CO2),
    (
        Refrigerant::R407A,
        Poly::new(&[-0.000864076433837511, -0.0145018190416687]),
    ),
    (
        Refrigerant::R449A,
        Poly::new(&[-0.000835375233693285, -0.0138846063856621]),
    ),
    (
        Refrigerant::R448A,
        Poly::new(&[
            0.00000171366802431428,
            -0.000865528727278154,
            -0.0152961902042161,
        ]),
    ),
    (
        Refrigerant::R502,
        Poly::new(&[
            0.00000484734071020993,
            -0.000624822304716683,
            -0.0128725684240106,
        ]),
    ),
    (
        Refrigerant::R507A,
        Poly::new(&[-0.000701333343440148, -0.0114900933623056]),
    ),
    (
        Refrigerant::R22,
        Poly::new(&[
            0.00000636798209134899,
            -0.000157783204337396,
            -0.00575251626397381,
        ]),
    ),
    (
        Refrigerant::R407C,
        Poly::new(&[
            -0.00000665735727676349,
            -0.000894860288947537,
            -0.0116054361757929,
        ]),
    ),
    (
        Refrigerant::R410A,
        Poly::new(&[-0.000672268853990701, -0.0111802230098585]),
    ),
    (
        Refrigerant::R407F,
        Poly::new(&[
            0.00000263731418614519,
            -0.000683997257738699,
            -0.0126005968942147,
        ]),
    ),
    (
        Refrigerant::R134a,
        Poly::new(&[
            -0.00000823045532174214,
            -0.00108063672211041,
            -0.0217411206961643,
        ]),
    ),
    (
        Refrigerant::R404A,
        Poly::new(&[
            0.00000342378568620316,
            -0.000329572335134041,
            -0.00706087606597149,
        ]),
    ),
];

/// Second MOR correction factor, fitted against the adjusted evaporating
/// temperature.
pub fn mor_evap_correction(refrigerant: Refrigerant, adjusted_evap_temp_c: f64) -> f64 {
    MOR_EVAP
        .iter()
        .find(|(r, _)| *r == refrigerant)
        .map(|(_, p)| *p)
        .unwrap_or(MOR_EVAP_DEFAULT)
        .eval(adjusted_evap_temp_c)
}

/// Evaporating-temperature window (°C, inclusive) over which the MOR fits
/// are valid. Outside it the MOR is undefined, not zero.
pub fn mor_validity_window(refrigerant: Refrigerant) -> (f64, f64) {
    if refrigerant.is_ultra_low_temp() {
        (-86.0, -42.0)
    } else {
        (-40.0, 4.0)
    }
}

/// True when the MOR fits apply at `evap_temp_c`.
pub fn mor_defined(refrigerant: Refrigerant, evap_temp_c: f64) -> bool {
    let (lo, hi) = mor_validity_window(refrigerant);
    (lo..=hi).contains(&evap_temp_c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn co2_velocity_weight_is_unity() {
        assert_eq!(velocity1_weight(Refrigerant::R744, 5.0), 1.0);
        assert_eq!(velocity1_weight(Refrigerant::R744Tc, 50.0), 1.0);
    }

    #[test]
    fn r404a_weight_cuts_off_below_threshold() {
        assert_eq!(velocity1_weight(Refrigerant::R404A, 45.0), 0.0);
        let above = velocity1_weight(Refrigerant::R404A, 60.0);
        let expected = 0.0328330590542629 * 60.0 - 1.47748765744183;
        assert!((above - expected).abs() < 1e-15);
    }

    #[test]
    fn unlisted_refrigerant_uses_default_weight() {
        assert!((velocity1_weight(Refrigerant::R290, 10.0) - 0.769230769230769).abs() < 1e-15);
        let above = velocity1_weight(Refrigerant::R290, 40.0);
        let expected =
            0.0000406422632403154 * 1600.0 - 0.000541007136813307 * 40.0 + 0.748882946418884;
        assert!((above - expected).abs() < 1e-15);
    }

    #[test]
    fn jg_half_lookup_and_default() {
        assert!((jg_half(Refrigerant::R410A) - 0.8904423325365).abs() < 1e-15);
        // R450A is listed; every enum variant is, so the default only covers
        // future additions. Spot-check a mid-table entry.
        assert!((jg_half(Refrigerant::R717) - 0.854957410951708).abs() < 1e-15);
    }

    #[test]
    fn oil_density_classes_differ() {
        let standard = oil_density_kgpm3(Refrigerant::R404A, -10.0);
        let expected = -0.00356060606060549 * 100.0 + 0.957878787878808 * 10.0 + 963.595454545455;
        assert!((standard - expected).abs() < 1e-9);

        let ult = oil_density_kgpm3(Refrigerant::R23, -60.0);
        let expected = -0.853841209044878 * -60.0 + 999.190772536527;
        assert!((ult - expected).abs() < 1e-9);
    }

    #[test]
    fn liquid_correction_clamps_argument() {
        // R404A clamps at -22.03...; any colder liquid gives the same value.
        let at_clamp = mor_liquid_correction(Refrigerant::R404A, -22.031637377024, 0.0);
        let below = mor_liquid_correction(Refrigerant::R404A, -60.0, 0.0);
        assert_eq!(at_clamp, below);

        let warm = mor_liquid_correction(Refrigerant::R404A, 40.0, 0.0);
        let expected = 0.0000156507169104918 * 1600.0 + 0.000689621839324826 * 40.0 - 0.0392;
        assert!((warm - expected).abs() < 1e-15);
    }

    #[test]
    fn r410a_liquid_correction_is_zero() {
        assert_eq!(mor_liquid_correction(Refrigerant::R410A, 40.0, 0.0), 0.0);
    }

    #[test]
    fn transcritical_correction_uses_enthalpy() {
        let a = mor_liquid_correction(Refrigerant::R744Tc, 40.0, 280.0);
        let b = mor_liquid_correction(Refrigerant::R744Tc, -5.0, 280.0);
        assert_eq!(a, b);
        let expected = 0.0000603336117708171 * 280.0 - 0.0142318718120024;
        assert!((a - expected).abs() < 1e-15);
    }

    #[test]
    fn evap_correction_matches_fit() {
        let v = mor_evap_correction(Refrigerant::R134a, -10.0);
        let expected =
            -0.00000823045532174214 * 100.0 + 0.00108063672211041 * 10.0 - 0.0217411206961643;
        assert!((v - expected).abs() < 1e-15);
    }

    #[test]
    fn validity_windows() {
        assert!(mor_defined(Refrigerant::R404A, -40.0));
        assert!(mor_defined(Refrigerant::R404A, 4.0));
        assert!(!mor_defined(Refrigerant::R404A, 4.1));
        assert!(mor_defined(Refrigerant::R508B, -42.0));
        assert!(!mor_defined(Refrigerant::R508B, -41.0));
        assert!(mor_defined(Refrigerant::R23, -86.0));
    }

    #[test]
    fn ult_temperature_offsets() {
        assert!((adjusted_liquid_temp(Refrigerant::R23, -50.0) - -2.97).abs() < 1e-9);
        assert!((adjusted_evap_temp(Refrigerant::R508B, -60.0) - -13.86).abs() < 1e-9);
        assert_eq!(adjusted_liquid_temp(Refrigerant::R404A, 40.0), 40.0);
        assert_eq!(adjusted_evap_temp(Refrigerant::R404A, -10.0), -10.0);
    }
}
