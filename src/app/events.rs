//! Outbound application events.
//!
//! The [`ControlService`](super::service::ControlService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them.

use crate::gate::GatePhase;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The control service has started (carries initial gate phase).
    Started(GatePhase),

    /// The gate moved between phases.
    GateChanged { from: GatePhase, to: GatePhase },

    /// The gate is open but the range finder stopped delivering usable
    /// readings.  Emitted once per outage.
    DistanceLost,

    /// Usable readings are back after a [`AppEvent::DistanceLost`].
    DistanceRestored(f32),

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryData {
    pub phase: GatePhase,
    pub distance_mm: Option<f32>,
    /// Last commanded frequency, `None` while silenced.
    pub frequency_hz: Option<f32>,
    /// Last commanded duty, `None` while silenced.
    pub duty_percent: Option<f32>,
    pub tick: u64,
}
