//! Fuzz target: `FuzzyEngine::compute`
//!
//! Feeds arbitrary f32 bit patterns (NaN, infinities, subnormals included)
//! as the distance input of both stock rule bases and asserts that the
//! engine never panics and always yields a value inside each output range
//! for finite inputs.
//!
//! cargo fuzz run fuzz_engine_compute

#![no_main]

use libfuzzer_sys::fuzz_target;
use proxfuzz::fuzzy::FuzzyEngine;
use proxfuzz::fuzzy::presets::Preset;

fuzz_target!(|data: &[u8]| {
    let engines = [Preset::Theremin, Preset::FourZone].map(|p| {
        FuzzyEngine::new(p.config().expect("stock preset")).expect("stock preset builds")
    });

    for chunk in data.chunks_exact(4) {
        let mm = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        for engine in &engines {
            let out = engine.compute([("distance", Some(mm))]);
            if !mm.is_finite() {
                continue;
            }
            for (name, v) in out.iter() {
                let range = engine.output_range(name).expect("output has a range");
                assert!(
                    v >= range.min - 1e-3 && v <= range.max + 1e-3,
                    "{name} = {v} outside range for input {mm}"
                );
            }
        }
    }
});
