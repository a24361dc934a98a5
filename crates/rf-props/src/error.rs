//! Property engine errors.

use rf_core::RfError;
use thiserror::Error;

/// Result type for property operations.
pub type PropsResult<T> = Result<T, PropsError>;

/// Errors that can occur while loading or querying refrigerant tables.
#[derive(Error, Debug)]
pub enum PropsError {
    /// Refrigerant missing from a required table.
    #[error("Refrigerant '{name}' not found in {table}")]
    UnknownRefrigerant { name: String, table: &'static str },

    /// Transcritical CO2 discharge pressure inside the disallowed band.
    #[error(
        "Discharge pressure {pressure_bar} bar(a) is inside the disallowed \
         R744 TC band (72.13, 73.8)"
    )]
    DisallowedCo2Band { pressure_bar: f64 },

    /// Non-positive values in a table interpolated in log space.
    #[error("Non-positive values in '{what}' table; cannot log-transform")]
    NonPositiveTable { what: &'static str },

    /// Table failed a structural invariant at load.
    #[error("Invalid table: {what}")]
    InvalidTable { what: &'static str },

    /// Query value outside a range that does not clamp.
    #[error("Value out of range for {what}")]
    OutOfRange { what: &'static str },

    /// Property grid missing from the transcritical CO2 data.
    #[error("CO2 property '{what}' not found")]
    MissingCo2Property { what: &'static str },

    /// Numeric invariant from the core crate, e.g. a non-finite table cell.
    #[error(transparent)]
    Core(#[from] RfError),

    #[error("I/O error reading property data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed property data: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<PropsError> for RfError {
    fn from(err: PropsError) -> Self {
        match err {
            PropsError::UnknownRefrigerant { .. } => RfError::InvalidArg {
                what: "unknown refrigerant",
            },
            PropsError::DisallowedCo2Band { .. } => RfError::InvalidArg {
                what: "R744 TC discharge pressure band",
            },
            PropsError::NonPositiveTable { what } => RfError::Invariant { what },
            PropsError::InvalidTable { what } => RfError::Invariant { what },
            PropsError::OutOfRange { what } => RfError::InvalidArg { what },
            PropsError::MissingCo2Property { what } => RfError::InvalidArg { what },
            PropsError::Core(e) => e,
            PropsError::Io(_) => RfError::InvalidArg {
                what: "property data I/O",
            },
            PropsError::Json(_) => RfError::InvalidArg {
                what: "property data format",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PropsError::UnknownRefrigerant {
            name: "R999".into(),
            table: "saturation",
        };
        assert!(err.to_string().contains("R999"));

        let err = PropsError::DisallowedCo2Band { pressure_bar: 73.0 };
        assert!(err.to_string().contains("73"));
    }

    #[test]
    fn error_to_rf_error() {
        let err = PropsError::NonPositiveTable { what: "density" };
        let rf: RfError = err.into();
        assert!(matches!(rf, RfError::Invariant { .. }));
    }
}
