//! Fuzz target: `FuzzyConfig::from_json` → `FuzzyEngine::new`
//!
//! Arbitrary bytes as a rule base document.  Parsing or validation may
//! reject it, but neither may panic, and anything accepted must compute.
//!
//! cargo fuzz run fuzz_rule_base_json

#![no_main]

use libfuzzer_sys::fuzz_target;
use proxfuzz::fuzzy::{FuzzyConfig, FuzzyEngine};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = FuzzyConfig::from_json(text) else {
        return;
    };
    let Ok(engine) = FuzzyEngine::new(config) else {
        return;
    };

    let inputs: Vec<String> = engine.input_names().map(str::to_owned).collect();
    for probe in [None, Some(0.0), Some(-1.0), Some(1.0e9)] {
        let out = engine.compute(inputs.iter().map(|n| (n.as_str(), probe)));
        assert_eq!(out.len(), engine.output_names().count());
    }
});
