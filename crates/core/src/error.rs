//! Error types for configuration validation and simulation failures.

use thiserror::Error;

/// Errors surfaced by the fire behavior calculators and the simulation driver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FireSimError {
    /// Configuration rejected before any frame was produced.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Weather observation outside the physically meaningful range.
    #[error("invalid weather: {field} = {value} ({constraint})")]
    InvalidWeather {
        field: &'static str,
        value: f64,
        constraint: &'static str,
    },

    /// Fuel code not present in the FBP fuel table.
    #[error("unknown fuel code: '{0}'")]
    UnknownFuel(String),

    /// Negative or otherwise unusable inputs to the FBP equations.
    #[error("invalid FBP inputs: {0}")]
    InvalidInputs(String),

    /// Non-finite value produced during front integration. Fatal; the last
    /// good frame has already been emitted.
    #[error("numeric error: {0}")]
    NumericError(String),
}

impl FireSimError {
    /// Fold calculator-level failures into the configuration error the
    /// driver reports before producing frames. `NumericError` is a runtime
    /// condition and passes through unchanged.
    pub(crate) fn into_config_error(self) -> FireSimError {
        match self {
            FireSimError::NumericError(_) | FireSimError::InvalidConfig(_) => self,
            other => FireSimError::InvalidConfig(other.to_string()),
        }
    }
}
