//! Membership function shapes.
//!
//! Every shape maps a crisp scalar into a degree in `[0, 1]`.  Shapes are
//! a closed enum evaluated through one pure function, so the whole set
//! can be validated when the engine is built.
//!
//! ## Degenerate shapes
//!
//! | Shape        | Degeneracy          | Behaviour                              |
//! |--------------|---------------------|----------------------------------------|
//! | Triangular   | `a == b` / `b == c` | ramp becomes a step, 1.0 at the peak   |
//! | Trapezoidal  | `a == b` / `c == d` | ramp becomes a step, plateau wins      |
//! | Gaussian     | `sigma == 0`        | 1.0 exactly at `center`, 0.0 elsewhere |
//!
//! No branch ever divides by a zero-width ramp.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A membership function shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum MembershipFunction {
    /// Left foot `a`, peak `b`, right foot `c`.
    Triangular { a: f32, b: f32, c: f32 },
    /// Left foot `a`, plateau `[b, c]`, right foot `d`.
    Trapezoidal { a: f32, b: f32, c: f32, d: f32 },
    /// Bell curve with peak 1.0 at `center`.
    Gaussian { center: f32, sigma: f32 },
}

impl MembershipFunction {
    pub fn triangular(a: f32, b: f32, c: f32) -> Result<Self, ConfigError> {
        let mf = Self::Triangular { a, b, c };
        mf.validate()?;
        Ok(mf)
    }

    pub fn trapezoidal(a: f32, b: f32, c: f32, d: f32) -> Result<Self, ConfigError> {
        let mf = Self::Trapezoidal { a, b, c, d };
        mf.validate()?;
        Ok(mf)
    }

    pub fn gaussian(center: f32, sigma: f32) -> Result<Self, ConfigError> {
        let mf = Self::Gaussian { center, sigma };
        mf.validate()?;
        Ok(mf)
    }

    /// Check shape parameters.  Deserialized shapes bypass the
    /// constructors, so the engine calls this again at build time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Self::Triangular { a, b, c } => {
                if ![a, b, c].iter().all(|v| v.is_finite()) {
                    return Err(ConfigError::InvalidMembership(
                        "triangular parameters must be finite",
                    ));
                }
                if !(a <= b && b <= c) {
                    return Err(ConfigError::InvalidMembership(
                        "triangular requires a <= b <= c",
                    ));
                }
            }
            Self::Trapezoidal { a, b, c, d } => {
                if ![a, b, c, d].iter().all(|v| v.is_finite()) {
                    return Err(ConfigError::InvalidMembership(
                        "trapezoidal parameters must be finite",
                    ));
                }
                if !(a <= b && b <= c && c <= d) {
                    return Err(ConfigError::InvalidMembership(
                        "trapezoidal requires a <= b <= c <= d",
                    ));
                }
            }
            Self::Gaussian { center, sigma } => {
                if !center.is_finite() || !sigma.is_finite() {
                    return Err(ConfigError::InvalidMembership(
                        "gaussian parameters must be finite",
                    ));
                }
                if sigma < 0.0 {
                    return Err(ConfigError::InvalidMembership(
                        "gaussian requires sigma >= 0",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Degree of membership of `x`, always in `[0, 1]`.
    pub fn evaluate(&self, x: f32) -> f32 {
        if x.is_nan() {
            return 0.0;
        }
        let degree = match *self {
            Self::Triangular { a, b, c } => {
                if x == b {
                    1.0
                } else if x <= a || x >= c {
                    0.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (c - x) / (c - b)
                }
            }
            Self::Trapezoidal { a, b, c, d } => {
                if b <= x && x <= c {
                    1.0
                } else if x <= a || x >= d {
                    0.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (d - x) / (d - c)
                }
            }
            Self::Gaussian { center, sigma } => {
                if sigma == 0.0 {
                    if x == center { 1.0 } else { 0.0 }
                } else {
                    let z = (x - center) / sigma;
                    (-0.5 * z * z).exp()
                }
            }
        };
        degree.clamp(0.0, 1.0)
    }
}
