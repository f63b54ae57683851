//! System configuration parameters
//!
//! All tunable parameters for the proximity controller.  The rule base
//! itself lives in [`FuzzyConfig`](crate::fuzzy::FuzzyConfig); this struct
//! only selects which stock rule base to build and how the I/O is wired.

use serde::{Deserialize, Serialize};

use crate::drivers::pwm::PwmMode;
use crate::error::ConfigError;
use crate::fuzzy::presets::{self, Preset};
use crate::gate::GateConfig;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub tick_interval_ms: u32,
    /// Emit a telemetry event every N ticks (0 = never)
    pub telemetry_every_ticks: u32,

    // --- Gate ---
    /// Time without motion before the gate closes (milliseconds)
    pub active_timeout_ms: u32,
    /// Post-motion hold (milliseconds); 0 disables the grace phase
    pub grace_timeout_ms: u32,

    // --- Sensors ---
    /// PIR readings are ignored for this long after power-up
    pub pir_warmup_ms: u32,
    /// Readings beyond this distance count as "nothing there"
    pub max_distance_mm: f32,
    /// Ultrasonic pings averaged per reading
    pub ultrasonic_samples: u8,
    /// Maximum wait for an echo edge (microseconds)
    pub echo_timeout_us: u32,

    // --- Actuator ---
    pub min_frequency_hz: f32,
    pub max_frequency_hz: f32,
    pub pwm_mode: PwmMode,

    // --- Fuzzy wiring ---
    /// Stock rule base built at startup
    pub preset: Preset,
    /// Name of the engine input fed with the distance reading
    pub distance_input: heapless::String<16>,
    /// Engine output driving the PWM frequency
    pub frequency_output: heapless::String<16>,
    /// Engine output driving the PWM duty cycle
    pub duty_output: heapless::String<16>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Timing
            tick_interval_ms: 100, // 10 Hz
            telemetry_every_ticks: 50,

            // Gate
            active_timeout_ms: 60_000,
            grace_timeout_ms: 1_000,

            // Sensors
            pir_warmup_ms: 30_000,
            max_distance_mm: 2_000.0,
            ultrasonic_samples: 3,
            echo_timeout_us: 30_000,

            // Actuator
            min_frequency_hz: 100.0,
            max_frequency_hz: 2_000.0,
            pwm_mode: PwmMode::Buzzer,

            // Fuzzy wiring
            preset: Preset::Theremin,
            distance_input: short_name(presets::INPUT_DISTANCE),
            frequency_output: short_name(presets::OUTPUT_FREQ),
            duty_output: short_name(presets::OUTPUT_DUTY),
        }
    }
}

fn short_name(s: &str) -> heapless::String<16> {
    let mut out = heapless::String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

impl SystemConfig {
    /// Reject values that would make the controller misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be > 0"));
        }
        if !(self.max_distance_mm.is_finite() && self.max_distance_mm > 0.0) {
            return Err(ConfigError::Invalid("max_distance_mm must be positive"));
        }
        if self.ultrasonic_samples == 0 {
            return Err(ConfigError::Invalid("ultrasonic_samples must be >= 1"));
        }
        if usize::from(self.ultrasonic_samples) > crate::sensors::ultrasonic::MAX_SAMPLES {
            return Err(ConfigError::Invalid("ultrasonic_samples exceeds buffer"));
        }
        if self.echo_timeout_us == 0 {
            return Err(ConfigError::Invalid("echo_timeout_us must be > 0"));
        }
        if !(self.min_frequency_hz.is_finite() && self.max_frequency_hz.is_finite()) {
            return Err(ConfigError::Invalid("frequency limits must be finite"));
        }
        if self.min_frequency_hz < 1.0 || self.min_frequency_hz > self.max_frequency_hz {
            return Err(ConfigError::Invalid(
                "frequency limits must satisfy 1 <= min <= max",
            ));
        }
        if self.distance_input.is_empty()
            || self.frequency_output.is_empty()
            || self.duty_output.is_empty()
        {
            return Err(ConfigError::Invalid("fuzzy variable names must be non-empty"));
        }
        if self.frequency_output == self.duty_output {
            return Err(ConfigError::Invalid(
                "frequency and duty must come from different outputs",
            ));
        }
        Ok(())
    }

    pub fn gate_config(&self) -> GateConfig {
        GateConfig {
            active_timeout_ms: self.active_timeout_ms,
            grace_timeout_ms: self.grace_timeout_ms,
            max_distance_mm: self.max_distance_mm,
        }
    }

    /// Compact binary form for flash storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        postcard::to_allocvec(self).map_err(|_| ConfigError::Invalid("config does not encode"))
    }

    /// Decode a stored blob.  The result is validated, so a blob written
    /// by an older, laxer build cannot slip through.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes)
            .map_err(|_| ConfigError::Invalid("stored config is corrupt"))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON override, falling back to defaults for missing fields.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|_| ConfigError::Invalid("config is not valid JSON"))?;
        config.validate()?;
        Ok(config)
    }
}
