//! Hydraulic model errors.

use rf_core::RfError;
use rf_props::PropsError;
use thiserror::Error;

/// Result type for hydraulic operations.
pub type HydroResult<T> = Result<T, HydroError>;

#[derive(Error, Debug)]
pub enum HydroError {
    /// Property lookup failed underneath the hydraulic model.
    #[error(transparent)]
    Props(#[from] PropsError),

    /// Transcritical CO2 sizing needs both gas-cooler outlet pressures.
    #[error("R744 TC requires gas-cooler max and min outlet pressures")]
    MissingGcPressure,

    /// Branch mass flow must be a finite, non-negative number.
    #[error("Invalid branch mass flow: {value} kg/s")]
    InvalidMassFlow { value: f64 },
}

impl From<HydroError> for RfError {
    fn from(err: HydroError) -> Self {
        match err {
            HydroError::Props(e) => e.into(),
            HydroError::MissingGcPressure => RfError::InvalidArg {
                what: "gas-cooler outlet pressures",
            },
            HydroError::InvalidMassFlow { value } => RfError::NonFinite {
                what: "branch mass flow",
                value,
            },
        }
    }
}
