//! Mock hardware adapter for integration tests.
//!
//! Scripts motion and distance per tick and records every actuator call
//! so tests can assert on the full command history without touching real
//! GPIO/PWM registers.

use std::collections::VecDeque;

use proxfuzz::app::events::AppEvent;
use proxfuzz::app::ports::{ActuatorPort, DistancePort, EventSink, MotionPort};
use proxfuzz::error::SensorError;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    Update {
        frequency_hz: Option<f32>,
        duty_percent: Option<f32>,
    },
    Off,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// Level the PIR reports until changed.
    pub motion: bool,
    /// Readings handed out one per query; the last one repeats.
    pub distances: VecDeque<Result<f32, SensorError>>,
    pub distance_reads: usize,
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            motion: false,
            distances: VecDeque::from([Err(SensorError::Timeout)]),
            distance_reads: 0,
            calls: Vec::new(),
        }
    }

    /// Every subsequent query returns `reading`.
    pub fn set_distance(&mut self, reading: Result<f32, SensorError>) {
        self.distances.clear();
        self.distances.push_back(reading);
    }

    pub fn last_call(&self) -> Option<&ActuatorCall> {
        self.calls.last()
    }

    pub fn sounding(&self) -> bool {
        matches!(self.last_call(), Some(ActuatorCall::Update { .. }))
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionPort for MockHardware {
    fn motion_detected(&mut self, _now_ms: u32) -> bool {
        self.motion
    }
}

impl DistancePort for MockHardware {
    fn read_distance_mm(&mut self) -> Result<f32, SensorError> {
        self.distance_reads += 1;
        if self.distances.len() > 1 {
            self.distances.pop_front().unwrap_or(Err(SensorError::Timeout))
        } else {
            self.distances
                .front()
                .copied()
                .unwrap_or(Err(SensorError::Timeout))
        }
    }
}

impl ActuatorPort for MockHardware {
    fn update(&mut self, frequency_hz: Option<f32>, duty_percent: Option<f32>) {
        self.calls.push(ActuatorCall::Update {
            frequency_hz,
            duty_percent,
        });
    }

    fn off(&mut self) {
        self.calls.push(ActuatorCall::Off);
    }
}

// ── Event sink ────────────────────────────────────────────────

/// Collects every emitted event.
#[derive(Default)]
pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
