//! Motion/distance gate.
//!
//! ```text
//!            motion                     no motion, timed out
//!   ┌──────┐ ──────▶ ┌────────┐ ─────────────────────────────▶ ┌──────┐
//!   │ Idle │         │ Active │                                 │ Idle │
//!   └──────┘         └────────┘ ◀──┐                            └──────┘
//!                       │ no motion │ motion                        ▲
//!                       ▼ (grace)   │                               │
//!                    ┌───────┐ ─────┘        grace elapsed          │
//!                    │ Grace │ ─────────────────────────────────────┘
//!                    └───────┘
//! ```
//!
//! The transition itself is [`GateState::transition`], a pure function of
//! the previous state, the motion bit and the current time.  [`MotionGate`]
//! owns that record, logs transitions, and only asks the distance sensor
//! for a reading while the gate is open.
//!
//! All timestamps are `u32` milliseconds from a free-running counter;
//! elapsed time is always computed with `wrapping_sub` so a counter
//! rollover never stalls or trips the gate.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::app::ports::{DistancePort, MotionPort};

/// Gate phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GatePhase {
    /// Suppressed; distance is never read.
    Idle,
    /// Motion seen recently; every tick is forwarded.
    Active,
    /// Post-motion hold bridging short PIR dropouts.
    Grace,
}

impl GatePhase {
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active | Self::Grace)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Active => "Active",
            Self::Grace => "Grace",
        }
    }
}

/// Gate timing and the distance acceptance window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Milliseconds without motion before Active falls back to Idle.
    pub active_timeout_ms: u32,
    /// Grace hold in milliseconds; 0 disables the Grace phase.
    pub grace_timeout_ms: u32,
    /// Readings above this are reported as absent.
    pub max_distance_mm: f32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            active_timeout_ms: 60_000,
            grace_timeout_ms: 1_000,
            max_distance_mm: 2_000.0,
        }
    }
}

impl GateConfig {
    pub fn grace_enabled(&self) -> bool {
        self.grace_timeout_ms > 0
    }
}

/// Gate state record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateState {
    pub phase: GatePhase,
    pub last_motion_ms: u32,
    pub grace_start_ms: u32,
}

impl Default for GateState {
    fn default() -> Self {
        Self {
            phase: GatePhase::Idle,
            last_motion_ms: 0,
            grace_start_ms: 0,
        }
    }
}

impl GateState {
    /// Next state given this tick's motion bit and timestamp.
    pub fn transition(&self, motion: bool, now_ms: u32, config: &GateConfig) -> GateState {
        let mut next = *self;
        match (self.phase, motion) {
            (_, true) => {
                next.phase = GatePhase::Active;
                next.last_motion_ms = now_ms;
            }
            (GatePhase::Idle, false) => {}
            (GatePhase::Active, false) => {
                if now_ms.wrapping_sub(self.last_motion_ms) > config.active_timeout_ms {
                    next.phase = GatePhase::Idle;
                } else if config.grace_enabled() {
                    next.phase = GatePhase::Grace;
                    next.grace_start_ms = now_ms;
                }
            }
            (GatePhase::Grace, false) => {
                if now_ms.wrapping_sub(self.grace_start_ms) > config.grace_timeout_ms {
                    next.phase = GatePhase::Idle;
                }
            }
        }
        next
    }
}

/// Result of one gate tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateReading {
    pub active: bool,
    /// Distance in millimetres; `None` while inactive or when the sensor
    /// had nothing usable.
    pub distance_mm: Option<f32>,
}

/// Owns the gate state and drives it once per tick.
pub struct MotionGate {
    state: GateState,
    config: GateConfig,
}

impl MotionGate {
    pub fn new(config: GateConfig) -> Self {
        Self {
            state: GateState::default(),
            config,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn phase(&self) -> GatePhase {
        self.state.phase
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.state.phase.is_active()
    }

    /// Advance the state machine without touching any sensor.
    /// Returns `(from, to)` when the phase changed.
    pub fn step(&mut self, motion: bool, now_ms: u32) -> Option<(GatePhase, GatePhase)> {
        let from = self.state.phase;
        self.state = self.state.transition(motion, now_ms, &self.config);
        let to = self.state.phase;
        if from == to {
            return None;
        }
        info!("gate: {} -> {} at {} ms", from.name(), to.name(), now_ms);
        Some((from, to))
    }

    /// One full gate tick: sample motion, transition, then read distance
    /// only if the gate is open.
    pub fn update(
        &mut self,
        hw: &mut (impl MotionPort + DistancePort),
        now_ms: u32,
    ) -> GateReading {
        let motion = hw.motion_detected(now_ms);
        self.step(motion, now_ms);

        if !self.is_active() {
            return GateReading {
                active: false,
                distance_mm: None,
            };
        }

        GateReading {
            active: true,
            distance_mm: self.read_distance(hw),
        }
    }

    fn read_distance(&self, hw: &mut impl DistancePort) -> Option<f32> {
        match hw.read_distance_mm() {
            Ok(mm) if (0.0..=self.config.max_distance_mm).contains(&mm) => Some(mm),
            Ok(mm) => {
                debug!("gate: {:.1} mm outside window, treating as absent", mm);
                None
            }
            Err(e) => {
                debug!("gate: distance unavailable ({})", e);
                None
            }
        }
    }
}
