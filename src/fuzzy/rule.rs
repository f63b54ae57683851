//! Fuzzy rules: `if {variable: label, ...} then {output: label, ...}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One rule of the rule base.
///
/// The antecedent is an implicit AND over its entries; every consequent
/// entry receives the rule's strength.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(rename = "if", deserialize_with = "super::unique_map::deserialize")]
    pub antecedent: BTreeMap<String, String>,
    #[serde(rename = "then", deserialize_with = "super::unique_map::deserialize")]
    pub consequent: BTreeMap<String, String>,
}

impl Rule {
    pub fn new() -> Self {
        Self {
            antecedent: BTreeMap::new(),
            consequent: BTreeMap::new(),
        }
    }

    /// Add an antecedent condition `variable is label`.
    pub fn when(mut self, variable: impl Into<String>, label: impl Into<String>) -> Self {
        self.antecedent.insert(variable.into(), label.into());
        self
    }

    /// Add a consequent `output is label`.
    pub fn then(mut self, output: impl Into<String>, label: impl Into<String>) -> Self {
        self.consequent.insert(output.into(), label.into());
        self
    }
}

impl Default for Rule {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_and_json_forms_agree() {
        let built = Rule::new()
            .when("distance", "close")
            .then("freq", "high")
            .then("duty", "medium");
        let parsed: Rule = serde_json::from_str(
            r#"{"if": {"distance": "close"}, "then": {"freq": "high", "duty": "medium"}}"#,
        )
        .unwrap();
        assert_eq!(built, parsed);
    }
}
