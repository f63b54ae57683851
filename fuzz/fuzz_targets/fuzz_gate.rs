//! Fuzz target: `GateState::transition`
//!
//! Interprets the input as a sequence of `(motion, dt_ms)` ticks against a
//! fuzzed gate configuration, letting the clock wrap freely.
//!
//! Invariants checked:
//! - Motion always leaves the gate Active
//! - Grace is never entered when `grace_timeout_ms == 0`
//! - Idle never moves anywhere without motion
//!
//! cargo fuzz run fuzz_gate

#![no_main]

use libfuzzer_sys::fuzz_target;
use proxfuzz::gate::{GateConfig, GatePhase, GateState};

fuzz_target!(|data: &[u8]| {
    if data.len() < 8 {
        return;
    }
    let (head, ticks) = data.split_at(8);
    let cfg = GateConfig {
        active_timeout_ms: u32::from_le_bytes([head[0], head[1], head[2], head[3]]),
        grace_timeout_ms: u32::from(u16::from_le_bytes([head[4], head[5]]))
            * u32::from(head[6] & 1),
        max_distance_mm: 2_000.0,
    };
    let mut now = u32::from_le_bytes([head[7], 0xff, 0xff, 0xff]);
    let mut state = GateState::default();

    for tick in ticks.chunks_exact(3) {
        let motion = tick[0] & 1 == 1;
        now = now.wrapping_add(u32::from(u16::from_le_bytes([tick[1], tick[2]])));
        let next = state.transition(motion, now, &cfg);

        if motion {
            assert_eq!(next.phase, GatePhase::Active);
        }
        if !cfg.grace_enabled() {
            assert_ne!(next.phase, GatePhase::Grace);
        }
        if state.phase == GatePhase::Idle && !motion {
            assert_eq!(next.phase, GatePhase::Idle);
        }
        state = next;
    }
});
