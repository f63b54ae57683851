//! Fuzzy inference: membership shapes, linguistic variables, rules and
//! the Mamdani engine that ties them together.
//!
//! ```text
//!   membership ──▶ variable ──┐
//!                             ├──▶ engine (FuzzyConfig → FuzzyEngine)
//!   rule ─────────────────────┘
//! ```
//!
//! [`presets`] holds the stock distance → (freq, duty) rule bases.

pub mod engine;
pub mod membership;
pub mod presets;
pub mod rule;
mod unique_map;
pub mod variable;

pub use engine::{ActivationMap, CrispOutput, FuzzifiedSnapshot, FuzzyConfig, FuzzyEngine};
pub use membership::MembershipFunction;
pub use rule::Rule;
pub use variable::{LinguisticVariable, OutputRange};
