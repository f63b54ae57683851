//! Unified error types for the proxfuzz controller.
//!
//! A single [`Error`] enum that every subsystem converts into.  Only
//! construction-time paths return errors; the per-tick path absorbs
//! sensor faults and numeric degeneracies instead of surfacing them.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A sensor could not be read or returned out-of-range data.
    Sensor(SensorError),
    /// An actuator could not be brought up.
    Actuator(ActuatorError),
    /// Configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// No echo (or no edge) arrived within the bounded wait window.
    Timeout,
    /// Reading is outside the declared measuring range.
    OutOfRange,
    /// GPIO read or write returned an error.
    GpioFailed,
    /// Sensor requires warm-up time before readings are valid.
    WarmingUp,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timed out"),
            Self::OutOfRange => write!(f, "reading out of range"),
            Self::GpioFailed => write!(f, "GPIO access failed"),
            Self::WarmingUp => write!(f, "sensor warming up"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// LEDC timer configuration was rejected by the peripheral.
    TimerConfigFailed(i32),
    /// LEDC channel configuration was rejected by the peripheral.
    ChannelConfigFailed(i32),
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimerConfigFailed(rc) => write!(f, "PWM timer config failed (rc={rc})"),
            Self::ChannelConfigFailed(rc) => write!(f, "PWM channel config failed (rc={rc})"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Raised only while building an engine, gate or service.  Never at
/// tick time.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Membership function parameters are non-finite or out of order.
    InvalidMembership(&'static str),
    /// An output range has `min > max`, a non-positive step, or too many
    /// samples.
    InvalidRange { variable: String, reason: &'static str },
    /// The same label was added twice to one variable.
    DuplicateLabel { variable: String, label: String },
    /// A rule-base document repeats a key inside one map (a label, a
    /// rule condition or an output range).
    DuplicateKey(String),
    /// The same variable name was declared twice.
    DuplicateVariable(String),
    /// A variable was declared without any labels.
    EmptyVariable(String),
    /// An output variable has no `(min, max, step)` range.
    MissingOutputRange(String),
    /// A range was given for a variable that is not an output.
    UnknownRangeVariable(String),
    /// Rule `rule` names a variable that is not configured.
    UnknownVariable { rule: usize, variable: String },
    /// Rule `rule` names a label its variable does not define.
    UnknownLabel {
        rule: usize,
        variable: String,
        label: String,
    },
    /// Rule `rule` has no antecedent or no consequent.
    EmptyRule(usize),
    /// A system configuration field failed validation.
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMembership(msg) => write!(f, "invalid membership function: {msg}"),
            Self::InvalidRange { variable, reason } => {
                write!(f, "invalid output range for '{variable}': {reason}")
            }
            Self::DuplicateLabel { variable, label } => {
                write!(f, "duplicate label '{label}' in variable '{variable}'")
            }
            Self::DuplicateKey(key) => write!(f, "rule base repeats key '{key}'"),
            Self::DuplicateVariable(name) => write!(f, "duplicate variable '{name}'"),
            Self::EmptyVariable(name) => write!(f, "variable '{name}' has no labels"),
            Self::MissingOutputRange(name) => {
                write!(f, "output variable '{name}' has no range")
            }
            Self::UnknownRangeVariable(name) => {
                write!(f, "range given for unknown output variable '{name}'")
            }
            Self::UnknownVariable { rule, variable } => {
                write!(f, "rule {rule}: unknown variable '{variable}'")
            }
            Self::UnknownLabel {
                rule,
                variable,
                label,
            } => write!(f, "rule {rule}: variable '{variable}' has no label '{label}'"),
            Self::EmptyRule(rule) => write!(f, "rule {rule}: empty antecedent or consequent"),
            Self::Invalid(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display_names_the_reference() {
        let e = ConfigError::UnknownLabel {
            rule: 2,
            variable: "distance".into(),
            label: "nearby".into(),
        };
        assert_eq!(
            e.to_string(),
            "rule 2: variable 'distance' has no label 'nearby'"
        );
    }

    #[test]
    fn sensor_error_converts_into_top_level() {
        let e: Error = SensorError::Timeout.into();
        assert_eq!(e, Error::Sensor(SensorError::Timeout));
        assert_eq!(e.to_string(), "sensor: timed out");
    }
}
