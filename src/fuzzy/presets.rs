//! Ready-made rule bases mapping distance (mm) to a buzzer/LED command.
//!
//! Both presets share the same outputs:
//!
//! | Output | Range         | Step  | Labels                                  |
//! |--------|---------------|-------|-----------------------------------------|
//! | `duty` | 0 – 100 %     | 1     | low (shoulder), medium (tri), high      |
//! | `freq` | 100 – 2000 Hz | 10    | low / medium / high (gaussian)          |

use serde::{Deserialize, Serialize};

use super::engine::FuzzyConfig;
use super::membership::MembershipFunction as Mf;
use super::rule::Rule;
use super::variable::{LinguisticVariable, OutputRange};
use crate::error::ConfigError;

pub const INPUT_DISTANCE: &str = "distance";
pub const OUTPUT_DUTY: &str = "duty";
pub const OUTPUT_FREQ: &str = "freq";

/// Selects one of the stock rule bases from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    Theremin,
    FourZone,
}

impl Preset {
    pub fn config(self) -> Result<FuzzyConfig, ConfigError> {
        match self {
            Self::Theremin => theremin(),
            Self::FourZone => four_zone(),
        }
    }
}

fn duty_output() -> Result<LinguisticVariable, ConfigError> {
    LinguisticVariable::new(OUTPUT_DUTY)
        .with_label("low", Mf::trapezoidal(0.0, 0.0, 20.0, 40.0)?)?
        .with_label("medium", Mf::triangular(30.0, 50.0, 70.0)?)?
        .with_label("high", Mf::trapezoidal(60.0, 80.0, 100.0, 100.0)?)
}

fn freq_output() -> Result<LinguisticVariable, ConfigError> {
    LinguisticVariable::new(OUTPUT_FREQ)
        .with_label("low", Mf::gaussian(300.0, 150.0)?)?
        .with_label("medium", Mf::gaussian(1000.0, 300.0)?)?
        .with_label("high", Mf::gaussian(1700.0, 200.0)?)
}

fn with_outputs(config: FuzzyConfig) -> Result<FuzzyConfig, ConfigError> {
    Ok(config
        .with_output(duty_output()?, OutputRange::new(0.0, 100.0, 1.0))
        .with_output(freq_output()?, OutputRange::new(100.0, 2000.0, 10.0)))
}

/// Three wide zones (close / medium / far) across 0 – 3 m.
///
/// Close hands push both pitch and loudness up; two rules target `close`
/// so the louder of the two duty labels wins through max-aggregation.
pub fn theremin() -> Result<FuzzyConfig, ConfigError> {
    let distance = LinguisticVariable::new(INPUT_DISTANCE)
        .with_label("close", Mf::gaussian(0.0, 200.0)?)?
        .with_label("medium", Mf::gaussian(1500.0, 500.0)?)?
        .with_label("far", Mf::gaussian(3000.0, 400.0)?)?;

    let config = with_outputs(FuzzyConfig::new().with_input(distance))?
        .with_rule(rule("close", "high", "medium"))
        .with_rule(rule("medium", "medium", "high"))
        .with_rule(rule("far", "low", "low"))
        .with_rule(rule("close", "high", "high"));
    Ok(config)
}

/// Four narrower zones across 0.5 – 2 m, matched to a 2 m sensor range.
pub fn four_zone() -> Result<FuzzyConfig, ConfigError> {
    let distance = LinguisticVariable::new(INPUT_DISTANCE)
        .with_label("very_close", Mf::gaussian(500.0, 300.0)?)?
        .with_label("close", Mf::gaussian(1000.0, 300.0)?)?
        .with_label("medium", Mf::gaussian(1500.0, 300.0)?)?
        .with_label("far", Mf::gaussian(2000.0, 300.0)?)?;

    let config = with_outputs(FuzzyConfig::new().with_input(distance))?
        .with_rule(rule("very_close", "high", "high"))
        .with_rule(rule("close", "high", "medium"))
        .with_rule(rule("medium", "medium", "low"))
        .with_rule(rule("far", "low", "low"));
    Ok(config)
}

fn rule(distance: &str, freq: &str, duty: &str) -> Rule {
    Rule::new()
        .when(INPUT_DISTANCE, distance)
        .then(OUTPUT_FREQ, freq)
        .then(OUTPUT_DUTY, duty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy::engine::FuzzyEngine;

    #[test]
    fn presets_build() {
        let t = FuzzyEngine::new(theremin().unwrap()).unwrap();
        assert_eq!(t.rule_count(), 4);
        let f = FuzzyEngine::new(four_zone().unwrap()).unwrap();
        assert_eq!(f.rule_count(), 4);
    }

    #[test]
    fn preset_selects_rule_base() {
        assert_eq!(Preset::Theremin.config().unwrap(), theremin().unwrap());
        assert_eq!(Preset::FourZone.config().unwrap().inputs[0].labels.len(), 4);
        let p: Preset = serde_json::from_str(r#""four_zone""#).unwrap();
        assert_eq!(p, Preset::FourZone);
    }

    #[test]
    fn theremin_pitch_rises_as_hand_approaches() {
        let engine = FuzzyEngine::new(theremin().unwrap()).unwrap();
        let near = engine.compute([(INPUT_DISTANCE, Some(100.0))]);
        let mid = engine.compute([(INPUT_DISTANCE, Some(1500.0))]);
        let far = engine.compute([(INPUT_DISTANCE, Some(3000.0))]);

        let (fn_, fm, ff) = (
            near.get(OUTPUT_FREQ).unwrap(),
            mid.get(OUTPUT_FREQ).unwrap(),
            far.get(OUTPUT_FREQ).unwrap(),
        );
        assert!(fn_ > fm && fm > ff, "freq not monotone: {fn_} {fm} {ff}");

        let duty_far = far.get(OUTPUT_DUTY).unwrap();
        let duty_mid = mid.get(OUTPUT_DUTY).unwrap();
        assert!(duty_far < duty_mid, "far {duty_far} should be quieter than mid {duty_mid}");
    }

    #[test]
    fn four_zone_outputs_stay_in_range() {
        let engine = FuzzyEngine::new(four_zone().unwrap()).unwrap();
        for mm in (0..=2000).step_by(50) {
            let out = engine.compute([(INPUT_DISTANCE, Some(mm as f32))]);
            let duty = out.get(OUTPUT_DUTY).unwrap();
            let freq = out.get(OUTPUT_FREQ).unwrap();
            assert!((0.0..=100.0).contains(&duty), "duty {duty} at {mm}");
            assert!((100.0..=2000.0).contains(&freq), "freq {freq} at {mm}");
        }
    }
}
