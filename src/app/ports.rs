//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlService (domain)
//! ```
//!
//! Driven adapters (PIR, ultrasonic ranger, PWM output, event sinks)
//! implement these traits.  The [`ControlService`](super::service::ControlService)
//! and the [`MotionGate`](crate::gate::MotionGate) consume them via
//! generics, so the domain core never touches hardware directly.
//!
//! Ports never fail the tick: motion is a plain bit, distance returns a
//! typed error that the gate folds into "absent", and actuator writes are
//! fire-and-forget.

use crate::error::SensorError;

// ───────────────────────────────────────────────────────────────
// Sensor ports (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Motion detector (PIR or similar).
pub trait MotionPort {
    /// `true` when motion is currently sensed.  Implementations return
    /// `false` while the detector is still warming up.
    fn motion_detected(&mut self, now_ms: u32) -> bool;
}

/// Distance ranger.
pub trait DistancePort {
    /// One (possibly averaged) distance reading in millimetres.
    ///
    /// Must return within a bounded time; a missing echo is
    /// [`SensorError::Timeout`], not a hang.
    fn read_distance_mm(&mut self) -> Result<f32, SensorError>;
}

/// Free-running millisecond counter.  Wraps at `u32::MAX`.
pub trait ClockPort {
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the tone/brightness output.
pub trait ActuatorPort {
    /// Apply a new command.  `None` leaves that parameter unchanged.
    fn update(&mut self, frequency_hz: Option<f32>, duty_percent: Option<f32>);

    /// Silence the output (duty 0).
    fn off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
