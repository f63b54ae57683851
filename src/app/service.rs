//! Application service — the hexagonal core.
//!
//! [`ControlService`] owns the motion gate and the fuzzy engine.  It
//! exposes a clean, hardware-agnostic API.  All I/O flows through port
//! traits injected at call sites, making the entire service testable with
//! mock adapters.
//!
//! ```text
//!  MotionPort   ──▶ ┌────────────────────────┐ ──▶ EventSink
//!  DistancePort ──▶ │     ControlService     │
//!  ActuatorPort ◀── │   Gate · FuzzyEngine   │
//!                   └────────────────────────┘
//! ```

use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::error::ConfigError;
use crate::fuzzy::FuzzyEngine;
use crate::gate::{GatePhase, GateReading, MotionGate};

use super::events::{AppEvent, TelemetryData};
use super::ports::{ActuatorPort, DistancePort, EventSink, MotionPort};

/// What one tick did to the actuator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Gate closed; the actuator was switched off.
    Silenced,
    /// Gate open; the actuator received this command.
    Driven {
        distance_mm: Option<f32>,
        frequency_hz: Option<f32>,
        duty_percent: Option<f32>,
    },
}

// ───────────────────────────────────────────────────────────────
// ControlService
// ───────────────────────────────────────────────────────────────

/// Orchestrates gate → engine → actuator once per tick.
pub struct ControlService {
    gate: MotionGate,
    engine: FuzzyEngine,
    distance_input: String,
    frequency_output: String,
    duty_output: String,
    telemetry_every_ticks: u32,
    tick_count: u64,
    last_outcome: TickOutcome,
    last_distance: Option<f32>,
    distance_lost: bool,
}

impl ControlService {
    /// Build the service.
    ///
    /// Fails if `config` is invalid or names engine variables that do not
    /// exist.
    pub fn new(config: &SystemConfig, engine: FuzzyEngine) -> Result<Self, ConfigError> {
        config.validate()?;
        if !engine.has_input(&config.distance_input) {
            return Err(ConfigError::Invalid("distance input is not an engine input"));
        }
        if !engine.has_output(&config.frequency_output) {
            return Err(ConfigError::Invalid("frequency output is not an engine output"));
        }
        if !engine.has_output(&config.duty_output) {
            return Err(ConfigError::Invalid("duty output is not an engine output"));
        }

        Ok(Self {
            gate: MotionGate::new(config.gate_config()),
            engine,
            distance_input: config.distance_input.as_str().to_owned(),
            frequency_output: config.frequency_output.as_str().to_owned(),
            duty_output: config.duty_output.as_str().to_owned(),
            telemetry_every_ticks: config.telemetry_every_ticks,
            tick_count: 0,
            last_outcome: TickOutcome::Silenced,
            last_distance: None,
            distance_lost: false,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Silence the actuator and announce the initial gate phase.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        hw.off();
        sink.emit(&AppEvent::Started(self.gate.phase()));
        info!("ControlService started in {:?}", self.gate.phase());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle: gate → engine → actuator.
    ///
    /// The `hw` parameter satisfies the sensor ports **and**
    /// [`ActuatorPort`], so a single mutable borrow covers the whole tick.
    pub fn tick(
        &mut self,
        hw: &mut (impl MotionPort + DistancePort + ActuatorPort),
        now_ms: u32,
        sink: &mut impl EventSink,
    ) -> TickOutcome {
        self.tick_count += 1;
        let prev_phase = self.gate.phase();

        // 1. Gate (reads motion, and distance only when open)
        let reading = self.gate.update(hw, now_ms);

        let new_phase = self.gate.phase();
        if new_phase != prev_phase {
            sink.emit(&AppEvent::GateChanged {
                from: prev_phase,
                to: new_phase,
            });
        }

        // 2. Engine + actuator
        let outcome = if reading.active {
            self.track_distance(&reading, sink);
            self.drive(hw, reading.distance_mm)
        } else {
            self.distance_lost = false;
            hw.off();
            TickOutcome::Silenced
        };

        self.last_outcome = outcome;
        self.last_distance = reading.distance_mm;

        // 3. Periodic telemetry
        if self.telemetry_every_ticks > 0
            && self.tick_count % u64::from(self.telemetry_every_ticks) == 0
        {
            sink.emit(&AppEvent::Telemetry(self.build_telemetry()));
        }

        outcome
    }

    fn drive(&self, hw: &mut impl ActuatorPort, distance_mm: Option<f32>) -> TickOutcome {
        let crisp = self
            .engine
            .compute([(self.distance_input.as_str(), distance_mm)]);
        let frequency_hz =
            self.in_range(&self.frequency_output, crisp.get(&self.frequency_output));
        let duty_percent = self.in_range(&self.duty_output, crisp.get(&self.duty_output));
        debug!(
            "tick: distance={:?} -> freq={:?} duty={:?}",
            distance_mm, frequency_hz, duty_percent
        );
        hw.update(frequency_hz, duty_percent);
        TickOutcome::Driven {
            distance_mm,
            frequency_hz,
            duty_percent,
        }
    }

    /// Unmatched outputs defuzzify to a literal 0, which may sit below the
    /// output's domain; the actuator only ever sees values inside it.
    fn in_range(&self, output: &str, value: Option<f32>) -> Option<f32> {
        let range = self.engine.output_range(output)?;
        value.map(|v| range.clamp(v))
    }

    fn track_distance(&mut self, reading: &GateReading, sink: &mut impl EventSink) {
        match (reading.distance_mm, self.distance_lost) {
            (None, false) => {
                warn!("range finder: no usable reading while gate open");
                self.distance_lost = true;
                sink.emit(&AppEvent::DistanceLost);
            }
            (Some(mm), true) => {
                self.distance_lost = false;
                sink.emit(&AppEvent::DistanceRestored(mm));
            }
            _ => {}
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot from the last tick.
    pub fn build_telemetry(&self) -> TelemetryData {
        let (frequency_hz, duty_percent) = match self.last_outcome {
            TickOutcome::Driven {
                frequency_hz,
                duty_percent,
                ..
            } => (frequency_hz, duty_percent),
            TickOutcome::Silenced => (None, None),
        };
        TelemetryData {
            phase: self.gate.phase(),
            distance_mm: self.last_distance,
            frequency_hz,
            duty_percent,
            tick: self.tick_count,
        }
    }

    /// Current gate phase.
    pub fn phase(&self) -> GatePhase {
        self.gate.phase()
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn last_outcome(&self) -> TickOutcome {
        self.last_outcome
    }

    pub fn engine(&self) -> &FuzzyEngine {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy::presets;

    fn engine() -> FuzzyEngine {
        FuzzyEngine::new(presets::theremin().unwrap()).unwrap()
    }

    #[test]
    fn rejects_names_missing_from_engine() {
        let mut config = SystemConfig::default();
        config.duty_output = heapless::String::try_from("volume").unwrap();
        assert!(matches!(
            ControlService::new(&config, engine()),
            Err(ConfigError::Invalid(_))
        ));

        let mut config = SystemConfig::default();
        config.distance_input = heapless::String::try_from("range").unwrap();
        assert!(ControlService::new(&config, engine()).is_err());
    }

    #[test]
    fn rejects_invalid_system_config() {
        let config = SystemConfig {
            tick_interval_ms: 0,
            ..SystemConfig::default()
        };
        assert!(ControlService::new(&config, engine()).is_err());
    }

    struct Bench {
        motion: bool,
        distance: f32,
        commands: Vec<(Option<f32>, Option<f32>)>,
    }

    impl MotionPort for Bench {
        fn motion_detected(&mut self, _now_ms: u32) -> bool {
            self.motion
        }
    }

    impl DistancePort for Bench {
        fn read_distance_mm(&mut self) -> Result<f32, crate::error::SensorError> {
            Ok(self.distance)
        }
    }

    impl ActuatorPort for Bench {
        fn update(&mut self, frequency_hz: Option<f32>, duty_percent: Option<f32>) {
            self.commands.push((frequency_hz, duty_percent));
        }

        fn off(&mut self) {}
    }

    struct Discard;

    impl EventSink for Discard {
        fn emit(&mut self, _event: &AppEvent) {}
    }

    /// Frequency rules only fire for "close"; far away the frequency
    /// output is unmatched while duty still fires.
    fn lopsided_engine() -> FuzzyEngine {
        use crate::fuzzy::{
            FuzzyConfig, LinguisticVariable, MembershipFunction, OutputRange, Rule,
        };
        let tri = |a, b, c| MembershipFunction::triangular(a, b, c).unwrap();
        let cfg = FuzzyConfig::new()
            .with_input(
                LinguisticVariable::new("distance")
                    .with_label("close", tri(0.0, 0.0, 500.0))
                    .unwrap()
                    .with_label("far", tri(1_000.0, 2_000.0, 2_000.0))
                    .unwrap(),
            )
            .with_output(
                LinguisticVariable::new("freq")
                    .with_label("high", tri(1_500.0, 2_000.0, 2_000.0))
                    .unwrap(),
                OutputRange::new(100.0, 2_000.0, 10.0),
            )
            .with_output(
                LinguisticVariable::new("duty")
                    .with_label("low", tri(0.0, 0.0, 40.0))
                    .unwrap(),
                OutputRange::new(0.0, 100.0, 1.0),
            )
            .with_rule(Rule::new().when("distance", "close").then("freq", "high"))
            .with_rule(Rule::new().when("distance", "far").then("duty", "low"));
        FuzzyEngine::new(cfg).unwrap()
    }

    #[test]
    fn unmatched_output_is_held_inside_its_range() {
        let mut app = ControlService::new(&SystemConfig::default(), lopsided_engine()).unwrap();
        assert_eq!(app.engine().rule_count(), 2);
        let raw = app.engine().compute([("distance", Some(2_000.0))]);
        assert_eq!(raw.get("freq"), Some(0.0));

        let mut hw = Bench {
            motion: true,
            distance: 2_000.0,
            commands: Vec::new(),
        };
        let outcome = app.tick(&mut hw, 0, &mut Discard);
        let (freq, duty) = hw.commands[0];
        assert_eq!(freq, Some(100.0));
        assert!(duty.is_some_and(|d| (0.0..=100.0).contains(&d)));
        assert_eq!(app.last_outcome(), outcome);
        assert!(matches!(
            outcome,
            TickOutcome::Driven {
                frequency_hz: Some(f),
                ..
            } if f == 100.0
        ));
    }

    #[test]
    fn fresh_service_reports_idle_telemetry() {
        let app = ControlService::new(&SystemConfig::default(), engine()).unwrap();
        let t = app.build_telemetry();
        assert_eq!(t.phase, GatePhase::Idle);
        assert_eq!(t.frequency_hz, None);
        assert_eq!(t.tick, 0);
        assert_eq!(app.last_outcome(), TickOutcome::Silenced);
    }
}
