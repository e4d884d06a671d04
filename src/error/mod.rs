use thiserror::Error;

/// Errors raised while building or stepping a simulated patient.
///
/// None of these are retried internally; a caller that wants to retry (for
/// example with a perturbed seed) builds a new patient.
#[derive(Error, Debug)]
pub enum SimulatorError {
    /// A parameter or derived quantity used as a divisor is zero or not finite
    #[error("Configuration error: {name} = {value} cannot be used as a divisor")]
    Configuration { name: String, value: f64 },

    /// The adaptive integrator could not meet its tolerance
    #[error("Integration failed at t = {time} (h = {step_size:e}): {reason}")]
    IntegrationFailure {
        time: f64,
        step_size: f64,
        reason: String,
    },

    /// A negative or non-finite amount was supplied in an action
    #[error("Invalid dose: {field} = {value}")]
    InvalidDose { field: &'static str, value: f64 },

    /// The breakpoints of a physical-activity profile are not ordered
    #[error("Invalid activity profile: {0}")]
    InvalidActivityProfile(String),

    /// A probability outside [0, 1]
    #[error("Invalid probability: {name} = {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    /// A simulator or scheduler setting outside its allowed range
    #[error("Invalid setting: {name} = {value}")]
    InvalidSetting { name: &'static str, value: f64 },

    /// No parameter variant is registered under this name
    #[error("Unknown parameter variant: {0}")]
    UnknownVariant(String),

    /// Parameter overrides could not be parsed
    #[error("Failed to parse parameters: {0}")]
    Parameters(#[from] serde_json::Error),
}

impl SimulatorError {
    pub(crate) fn configuration(name: impl Into<String>, value: f64) -> Self {
        SimulatorError::Configuration {
            name: name.into(),
            value,
        }
    }
}
