//! Mamdani inference engine.
//!
//! ```text
//!  inputs ──▶ fuzzify ──▶ FuzzifiedSnapshot
//!                               │
//!                        evaluate_rules   (min for AND, max across rules)
//!                               ▼
//!                         ActivationMap ──[all zero]──▶ range minima
//!                               │
//!                    aggregate_and_defuzzify  (clip, max, centroid)
//!                               ▼
//!                          CrispOutput
//! ```
//!
//! The configuration is validated once in [`FuzzyEngine::new`] and never
//! changes afterwards, so a built engine can be shared freely and every
//! per-tick call is infallible.

use std::collections::BTreeMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::rule::Rule;
use super::unique_map;
use super::variable::{LinguisticVariable, OutputRange, OutputTable};
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Everything needed to build a [`FuzzyEngine`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FuzzyConfig {
    pub inputs: Vec<LinguisticVariable>,
    pub outputs: Vec<LinguisticVariable>,
    /// `(min, max, step)` per output variable.
    #[serde(deserialize_with = "super::unique_map::deserialize")]
    pub ranges: BTreeMap<String, OutputRange>,
    pub rules: Vec<Rule>,
}

impl FuzzyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, variable: LinguisticVariable) -> Self {
        self.inputs.push(variable);
        self
    }

    pub fn with_output(mut self, variable: LinguisticVariable, range: OutputRange) -> Self {
        self.ranges.insert(variable.name.clone(), range);
        self.outputs.push(variable);
        self
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Parse a rule base from JSON.  Only the shape is checked here;
    /// [`FuzzyEngine::new`] does the semantic validation.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| {
            debug!("rule base JSON rejected: {}", e);
            match unique_map::duplicate_key(&e.to_string()) {
                Some(key) => ConfigError::DuplicateKey(key),
                None => ConfigError::Invalid("rule base is not valid JSON"),
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Per-tick maps
// ---------------------------------------------------------------------------

/// Membership degree of every label of every fuzzified input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FuzzifiedSnapshot(BTreeMap<String, BTreeMap<String, f32>>);

impl FuzzifiedSnapshot {
    /// Degree of `label` for `variable`, `None` if the variable was not
    /// part of this snapshot.
    pub fn degree(&self, variable: &str, label: &str) -> Option<f32> {
        self.0.get(variable)?.get(label).copied()
    }

    pub fn variable(&self, variable: &str) -> Option<&BTreeMap<String, f32>> {
        self.0.get(variable)
    }

    pub fn contains(&self, variable: &str) -> bool {
        self.0.contains_key(variable)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, BTreeMap<String, f32>>> for FuzzifiedSnapshot {
    fn from(map: BTreeMap<String, BTreeMap<String, f32>>) -> Self {
        Self(map)
    }
}

/// Firing strength of every label of every output variable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivationMap(BTreeMap<String, BTreeMap<String, f32>>);

impl ActivationMap {
    /// Strength of `output is label`; unknown pairs read as 0.0.
    pub fn activation(&self, output: &str, label: &str) -> f32 {
        self.0
            .get(output)
            .and_then(|labels| labels.get(label))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn output(&self, output: &str) -> Option<&BTreeMap<String, f32>> {
        self.0.get(output)
    }

    /// True when no label of any output received a non-zero strength.
    pub fn is_all_zero(&self) -> bool {
        self.0
            .values()
            .all(|labels| labels.values().all(|&v| v == 0.0))
    }
}

impl From<BTreeMap<String, BTreeMap<String, f32>>> for ActivationMap {
    fn from(map: BTreeMap<String, BTreeMap<String, f32>>) -> Self {
        Self(map)
    }
}

/// Crisp value per output variable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrispOutput(BTreeMap<String, f32>);

impl CrispOutput {
    pub fn get(&self, output: &str) -> Option<f32> {
        self.0.get(output).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Validated, immutable fuzzy inference engine.
#[derive(Debug, Clone)]
pub struct FuzzyEngine {
    inputs: BTreeMap<String, LinguisticVariable>,
    outputs: BTreeMap<String, OutputTable>,
    rules: Vec<Rule>,
}

impl FuzzyEngine {
    /// Validate `config` and build the engine.
    ///
    /// Every membership shape, range and rule reference is checked here;
    /// the first problem found is returned.
    pub fn new(config: FuzzyConfig) -> Result<Self, ConfigError> {
        let FuzzyConfig {
            inputs: input_vars,
            outputs: output_vars,
            ranges,
            rules,
        } = config;

        let mut inputs = BTreeMap::new();
        for var in input_vars {
            var.validate()?;
            if inputs.contains_key(&var.name) {
                return Err(ConfigError::DuplicateVariable(var.name));
            }
            inputs.insert(var.name.clone(), var);
        }

        let mut output_defs = BTreeMap::new();
        for var in output_vars {
            var.validate()?;
            if output_defs.contains_key(&var.name) {
                return Err(ConfigError::DuplicateVariable(var.name));
            }
            output_defs.insert(var.name.clone(), var);
        }

        if let Some(stray) = ranges.keys().find(|name| !output_defs.contains_key(*name)) {
            return Err(ConfigError::UnknownRangeVariable(stray.clone()));
        }

        let mut outputs = BTreeMap::new();
        for (name, var) in &output_defs {
            let range = *ranges
                .get(name)
                .ok_or_else(|| ConfigError::MissingOutputRange(name.clone()))?;
            range.validate(name)?;
            outputs.insert(name.clone(), OutputTable::build(var, range));
        }

        for (idx, rule) in rules.iter().enumerate() {
            if rule.antecedent.is_empty() || rule.consequent.is_empty() {
                return Err(ConfigError::EmptyRule(idx));
            }
            for (variable, label) in &rule.antecedent {
                Self::check_reference(idx, variable, label, inputs.get(variable))?;
            }
            for (variable, label) in &rule.consequent {
                Self::check_reference(idx, variable, label, output_defs.get(variable))?;
            }
        }

        info!(
            "fuzzy engine: {} input(s), {} output(s), {} rule(s)",
            inputs.len(),
            outputs.len(),
            rules.len()
        );

        Ok(Self {
            inputs,
            outputs,
            rules,
        })
    }

    fn check_reference(
        rule: usize,
        variable: &str,
        label: &str,
        def: Option<&LinguisticVariable>,
    ) -> Result<(), ConfigError> {
        let def = def.ok_or_else(|| ConfigError::UnknownVariable {
            rule,
            variable: variable.to_string(),
        })?;
        if !def.has_label(label) {
            return Err(ConfigError::UnknownLabel {
                rule,
                variable: variable.to_string(),
                label: label.to_string(),
            });
        }
        Ok(())
    }

    // ── Pipeline stages ──────────────────────────────────────────

    /// Convert crisp inputs into label degrees.
    ///
    /// A `None` value is a reading the sensor could not provide: every
    /// label of that variable gets degree 0.0.  Variables not supplied at
    /// all are absent from the snapshot.
    pub fn fuzzify<'a, I>(&self, inputs: I) -> FuzzifiedSnapshot
    where
        I: IntoIterator<Item = (&'a str, Option<f32>)>,
    {
        let mut snapshot = BTreeMap::new();
        for (name, value) in inputs {
            let Some(var) = self.inputs.get(name) else {
                debug!("fuzzify: ignoring unknown input '{}'", name);
                continue;
            };
            let degrees = match value {
                Some(v) => var.fuzzify(v),
                None => var.labels.keys().map(|l| (l.clone(), 0.0)).collect(),
            };
            snapshot.insert(name.to_string(), degrees);
        }
        FuzzifiedSnapshot(snapshot)
    }

    /// Fire every rule against `snapshot`.
    ///
    /// A rule whose antecedent names a variable missing from the snapshot
    /// contributes nothing.  Strengths reaching the same output label are
    /// combined with `max`, so rule order never matters.
    pub fn evaluate_rules(&self, snapshot: &FuzzifiedSnapshot) -> ActivationMap {
        let mut activations: BTreeMap<String, BTreeMap<String, f32>> = self
            .outputs
            .iter()
            .map(|(name, table)| {
                let labels = table.labels.iter().map(|(l, _)| (l.clone(), 0.0)).collect();
                (name.clone(), labels)
            })
            .collect();

        for rule in &self.rules {
            let strength = rule
                .antecedent
                .iter()
                .try_fold(1.0f32, |acc, (var, label)| {
                    snapshot.degree(var, label).map(|d| acc.min(d))
                })
                .unwrap_or(0.0);

            for (output, label) in &rule.consequent {
                if let Some(slot) = activations
                    .get_mut(output)
                    .and_then(|labels| labels.get_mut(label))
                {
                    *slot = slot.max(strength);
                }
            }
        }

        ActivationMap(activations)
    }

    /// Clip each output label at its activation, aggregate with `max`
    /// over the discretized domain, and take the centroid.
    ///
    /// An output whose aggregated area is exactly zero yields 0.0.
    pub fn aggregate_and_defuzzify(&self, activations: &ActivationMap) -> CrispOutput {
        let mut crisp = BTreeMap::new();
        for (name, table) in &self.outputs {
            let strengths: Vec<f32> = table
                .labels
                .iter()
                .map(|(label, _)| activations.activation(name, label))
                .collect();

            let mut numerator = 0.0f32;
            let mut denominator = 0.0f32;
            for (i, &x) in table.samples.iter().enumerate() {
                let mu = table
                    .labels
                    .iter()
                    .zip(&strengths)
                    .map(|((_, column), &strength)| strength.min(column[i]))
                    .fold(0.0f32, f32::max);
                numerator += x * mu;
                denominator += mu;
            }
            if denominator == 0.0 {
                denominator = 1.0;
            }
            crisp.insert(name.clone(), numerator / denominator);
        }
        CrispOutput(crisp)
    }

    /// Full pipeline for one tick.
    ///
    /// When no label of any output fired, every output is set to its range
    /// minimum and defuzzification is skipped.
    pub fn compute<'a, I>(&self, inputs: I) -> CrispOutput
    where
        I: IntoIterator<Item = (&'a str, Option<f32>)>,
    {
        let snapshot = self.fuzzify(inputs);
        let activations = self.evaluate_rules(&snapshot);
        if activations.is_all_zero() {
            debug!("fuzzy: no rule fired, holding outputs at range minima");
            return self.range_minima();
        }
        self.aggregate_and_defuzzify(&activations)
    }

    fn range_minima(&self) -> CrispOutput {
        CrispOutput(
            self.outputs
                .iter()
                .map(|(name, table)| (name.clone(), table.range.min))
                .collect(),
        )
    }

    // ── Queries ───────────────────────────────────────────────────

    pub fn has_input(&self, name: &str) -> bool {
        self.inputs.contains_key(name)
    }

    pub fn has_output(&self, name: &str) -> bool {
        self.outputs.contains_key(name)
    }

    pub fn output_range(&self, name: &str) -> Option<OutputRange> {
        self.outputs.get(name).map(|t| t.range)
    }

    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.inputs.keys().map(String::as_str)
    }

    pub fn output_names(&self) -> impl Iterator<Item = &str> {
        self.outputs.keys().map(String::as_str)
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}
