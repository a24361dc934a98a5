//! Refrigerant identity.

use serde::{Deserialize, Serialize};

/// Refrigerants covered by the sizing tables.
///
/// `R744Tc` is CO2 operated transcritically on the high side; it shares the
/// R744 saturation table but takes its inlet state from the supercritical
/// pressure x temperature grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Refrigerant {
    R11,
    R12,
    R22,
    R23,
    R32,
    R134a,
    R290,
    R404A,
    R407A,
    R407C,
    R407F,
    R410A,
    R448A,
    R449A,
    R450A,
    R454A,
    R454B,
    R454C,
    R455A,
    R502,
    R507A,
    R508B,
    R513A,
    R600a,
    R717,
    R744,
    /// CO2, transcritical high side
    R744Tc,
    R1234yf,
    R1234ze,
    R1270,
}

impl Refrigerant {
    pub const ALL: [Refrigerant; 30] = [
        Refrigerant::R11,
        Refrigerant::R12,
        Refrigerant::R22,
        Refrigerant::R23,
        Refrigerant::R32,
        Refrigerant::R134a,
        Refrigerant::R290,
        Refrigerant::R404A,
        Refrigerant::R407A,
        Refrigerant::R407C,
        Refrigerant::R407F,
        Refrigerant::R410A,
        Refrigerant::R448A,
        Refrigerant::R449A,
        Refrigerant::R450A,
        Refrigerant::R454A,
        Refrigerant::R454B,
        Refrigerant::R454C,
        Refrigerant::R455A,
        Refrigerant::R502,
        Refrigerant::R507A,
        Refrigerant::R508B,
        Refrigerant::R513A,
        Refrigerant::R600a,
        Refrigerant::R717,
        Refrigerant::R744,
        Refrigerant::R744Tc,
        Refrigerant::R1234yf,
        Refrigerant::R1234ze,
        Refrigerant::R1270,
    ];

    /// Canonical identifier, as used in the data files.
    pub fn key(&self) -> &'static str {
        match self {
            Refrigerant::R11 => "R11",
            Refrigerant::R12 => "R12",
            Refrigerant::R22 => "R22",
            Refrigerant::R23 => "R23",
            Refrigerant::R32 => "R32",
            Refrigerant::R134a => "R134a",
            Refrigerant::R290 => "R290",
            Refrigerant::R404A => "R404A",
            Refrigerant::R407A => "R407A",
            Refrigerant::R407C => "R407C",
            Refrigerant::R407F => "R407F",
            Refrigerant::R410A => "R410A",
            Refrigerant::R448A => "R448A",
            Refrigerant::R449A => "R449A",
            Refrigerant::R450A => "R450A",
            Refrigerant::R454A => "R454A",
            Refrigerant::R454B => "R454B",
            Refrigerant::R454C => "R454C",
            Refrigerant::R455A => "R455A",
            Refrigerant::R502 => "R502",
            Refrigerant::R507A => "R507A",
            Refrigerant::R508B => "R508B",
            Refrigerant::R513A => "R513A",
            Refrigerant::R600a => "R600a",
            Refrigerant::R717 => "R717",
            Refrigerant::R744 => "R744",
            Refrigerant::R744Tc => "R744 TC",
            Refrigerant::R1234yf => "R1234yf",
            Refrigerant::R1234ze => "R1234ze",
            Refrigerant::R1270 => "R1270",
        }
    }

    /// Key into the saturation/superheat tables.
    ///
    /// Transcritical CO2 has no saturation curve of its own; all table-based
    /// lookups route through the R744 data.
    pub fn table_key(&self) -> &'static str {
        match self {
            Refrigerant::R744Tc => "R744",
            other => other.key(),
        }
    }

    /// True for CO2 with a transcritical high side.
    pub fn is_transcritical(&self) -> bool {
        matches!(self, Refrigerant::R744Tc)
    }

    /// True for the extreme-low-temperature refrigerants that carry their own
    /// oil-density fit and MOR validity window.
    pub fn is_ultra_low_temp(&self) -> bool {
        matches!(self, Refrigerant::R23 | Refrigerant::R508B)
    }
}

impl std::fmt::Display for Refrigerant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Refrigerant {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "R744 TC" | "R744TC" | "CO2 TC" => return Ok(Refrigerant::R744Tc),
            "CO2" => return Ok(Refrigerant::R744),
            "NH3" | "AMMONIA" => return Ok(Refrigerant::R717),
            "PROPANE" => return Ok(Refrigerant::R290),
            "PROPYLENE" => return Ok(Refrigerant::R1270),
            "ISOBUTANE" => return Ok(Refrigerant::R600a),
            _ => {}
        }
        Refrigerant::ALL
            .iter()
            .find(|r| r.key().eq_ignore_ascii_case(&normalized))
            .copied()
            .ok_or("unknown refrigerant")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_key_roundtrip() {
        for r in Refrigerant::ALL {
            let parsed = r.key().parse::<Refrigerant>().expect("key should parse");
            assert_eq!(parsed, r);
        }
    }

    #[test]
    fn transcritical_routes_to_r744_table() {
        assert_eq!(Refrigerant::R744Tc.table_key(), "R744");
        assert_eq!(Refrigerant::R744.table_key(), "R744");
        assert_eq!(Refrigerant::R404A.table_key(), "R404A");
    }

    #[test]
    fn aliases_parse() {
        assert_eq!("r744tc".parse::<Refrigerant>().unwrap(), Refrigerant::R744Tc);
        assert_eq!("Ammonia".parse::<Refrigerant>().unwrap(), Refrigerant::R717);
        assert_eq!("co2".parse::<Refrigerant>().unwrap(), Refrigerant::R744);
        assert!("R999".parse::<Refrigerant>().is_err());
    }

    #[test]
    fn ultra_low_temp_class() {
        assert!(Refrigerant::R23.is_ultra_low_temp());
        assert!(Refrigerant::R508B.is_ultra_low_temp());
        assert!(!Refrigerant::R404A.is_ultra_low_temp());
    }
}
