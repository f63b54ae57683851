//! Linguistic variables and output ranges.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::membership::MembershipFunction;
use crate::error::ConfigError;

/// Upper bound on the number of samples in one output domain.
pub const MAX_DOMAIN_SAMPLES: usize = 100_000;

/// A named variable and its labelled membership functions.
///
/// Labels are kept in a `BTreeMap` so iteration order, and therefore every
/// derived snapshot, is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinguisticVariable {
    pub name: String,
    #[serde(deserialize_with = "super::unique_map::deserialize")]
    pub labels: BTreeMap<String, MembershipFunction>,
}

impl LinguisticVariable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: BTreeMap::new(),
        }
    }

    /// Add a label.  Fails if the label already exists on this variable.
    pub fn with_label(
        mut self,
        label: impl Into<String>,
        mf: MembershipFunction,
    ) -> Result<Self, ConfigError> {
        let label = label.into();
        if self.labels.contains_key(&label) {
            return Err(ConfigError::DuplicateLabel {
                variable: self.name.clone(),
                label,
            });
        }
        self.labels.insert(label, mf);
        Ok(self)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains_key(label)
    }

    /// Evaluate every label at `value`.
    pub fn fuzzify(&self, value: f32) -> BTreeMap<String, f32> {
        self.labels
            .iter()
            .map(|(label, mf)| (label.clone(), mf.evaluate(value)))
            .collect()
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.labels.is_empty() {
            return Err(ConfigError::EmptyVariable(self.name.clone()));
        }
        self.labels.values().try_for_each(MembershipFunction::validate)
    }
}

/// Discretized defuzzification domain of one output variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl OutputRange {
    pub fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    pub(crate) fn validate(&self, variable: &str) -> Result<(), ConfigError> {
        let invalid = |reason| ConfigError::InvalidRange {
            variable: variable.to_string(),
            reason,
        };
        if !(self.min.is_finite() && self.max.is_finite() && self.step.is_finite()) {
            return Err(invalid("bounds and step must be finite"));
        }
        if self.min > self.max {
            return Err(invalid("min must not exceed max"));
        }
        if self.step <= 0.0 {
            return Err(invalid("step must be positive"));
        }
        if ((self.max - self.min) / self.step) as usize >= MAX_DOMAIN_SAMPLES {
            return Err(invalid("too many domain samples"));
        }
        Ok(())
    }

    /// Sample points `min, min + step, ...` up to and including `max`.
    ///
    /// When the step does not land exactly on `max`, `max` is appended so
    /// both endpoints are always present.
    pub fn samples(&self) -> Vec<f32> {
        let span = self.max - self.min;
        let count = (span / self.step + 1e-4).floor() as usize;
        let mut samples: Vec<f32> = (0..=count)
            .map(|i| self.min + i as f32 * self.step)
            .collect();
        if let Some(last) = samples.last_mut() {
            if (self.max - *last).abs() <= self.step * 1e-3 {
                *last = self.max;
            } else if *last < self.max {
                samples.push(self.max);
            }
        }
        samples
    }

    /// Clamp `value` into `[min, max]`.
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// Output variable with its membership functions tabulated over the
/// discretized domain.  Built once by the engine.
#[derive(Debug, Clone)]
pub(crate) struct OutputTable {
    pub range: OutputRange,
    pub samples: Vec<f32>,
    /// `(label, membership at each sample)`, in label order.
    pub labels: Vec<(String, Vec<f32>)>,
}

impl OutputTable {
    pub fn build(variable: &LinguisticVariable, range: OutputRange) -> Self {
        let samples = range.samples();
        let labels = variable
            .labels
            .iter()
            .map(|(label, mf)| {
                let column = samples.iter().map(|&x| mf.evaluate(x)).collect();
                (label.clone(), column)
            })
            .collect();
        Self {
            range,
            samples,
            labels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_include_both_endpoints() {
        let duty = OutputRange::new(0.0, 100.0, 1.0).samples();
        assert_eq!(duty.len(), 101);
        assert_eq!(duty[0], 0.0);
        assert_eq!(*duty.last().unwrap(), 100.0);

        let freq = OutputRange::new(100.0, 2000.0, 10.0).samples();
        assert_eq!(freq.len(), 191);
        assert_eq!(*freq.last().unwrap(), 2000.0);
    }

    #[test]
    fn samples_append_max_when_step_overshoots() {
        let s = OutputRange::new(0.0, 10.0, 3.0).samples();
        assert_eq!(s, vec![0.0, 3.0, 6.0, 9.0, 10.0]);
    }

    #[test]
    fn degenerate_range_is_a_single_sample() {
        let s = OutputRange::new(5.0, 5.0, 1.0).samples();
        assert_eq!(s, vec![5.0]);
    }

    #[test]
    fn range_validation() {
        assert!(OutputRange::new(0.0, 100.0, 1.0).validate("duty").is_ok());
        assert!(OutputRange::new(10.0, 0.0, 1.0).validate("duty").is_err());
        assert!(OutputRange::new(0.0, 10.0, 0.0).validate("duty").is_err());
        assert!(OutputRange::new(0.0, 10.0, -1.0).validate("duty").is_err());
        assert!(OutputRange::new(0.0, f32::NAN, 1.0).validate("duty").is_err());
        assert!(OutputRange::new(0.0, 1.0e9, 1.0).validate("duty").is_err());
    }

    #[test]
    fn duplicate_label_is_rejected() {
        let mf = MembershipFunction::gaussian(0.0, 1.0).unwrap();
        let err = LinguisticVariable::new("distance")
            .with_label("close", mf)
            .unwrap()
            .with_label("close", mf)
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateLabel {
                variable: "distance".into(),
                label: "close".into()
            }
        );
    }

    #[test]
    fn output_table_tabulates_each_label() {
        let var = LinguisticVariable::new("duty")
            .with_label("high", MembershipFunction::trapezoidal(60.0, 80.0, 100.0, 100.0).unwrap())
            .unwrap();
        let table = OutputTable::build(&var, OutputRange::new(0.0, 100.0, 10.0));
        assert_eq!(table.samples.len(), 11);
        let (label, column) = &table.labels[0];
        assert_eq!(label, "high");
        assert_eq!(column[6], 0.0);
        assert!((column[7] - 0.5).abs() < 1e-6);
        assert_eq!(column[10], 1.0);
    }
}
