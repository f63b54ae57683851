//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the motion sensor, the range finder and the PWM driver, exposing
//! them through [`MotionPort`], [`DistancePort`] and [`ActuatorPort`].
//! On non-espidf targets, the PWM driver uses cfg-gated simulation stubs
//! and the sensors run against whatever pins they were built with.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::{ActuatorPort, DistancePort, MotionPort};
use crate::drivers::pwm::PwmDriver;
use crate::error::SensorError;
use crate::sensors::MicrosClock;
use crate::sensors::pir::PirSensor;
use crate::sensors::ultrasonic::Ultrasonic;

// ── Sensor ports on the bare drivers ──────────────────────────

impl<P: InputPin> MotionPort for PirSensor<P> {
    fn motion_detected(&mut self, now_ms: u32) -> bool {
        self.read(now_ms)
    }
}

impl<TRIG, ECHO, DELAY, CLOCK> DistancePort for Ultrasonic<TRIG, ECHO, DELAY, CLOCK>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    DELAY: DelayNs,
    CLOCK: MicrosClock,
{
    fn read_distance_mm(&mut self) -> Result<f32, SensorError> {
        self.read()
    }
}

// ── Combined adapter ──────────────────────────────────────────

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<M, D> {
    motion: M,
    ranger: D,
    pwm: PwmDriver,
    min_frequency_hz: f32,
    max_frequency_hz: f32,
}

impl<M: MotionPort, D: DistancePort> HardwareAdapter<M, D> {
    /// Commanded frequencies are clamped to
    /// `[min_frequency_hz, max_frequency_hz]` before reaching the driver.
    pub fn new(
        motion: M,
        ranger: D,
        pwm: PwmDriver,
        min_frequency_hz: f32,
        max_frequency_hz: f32,
    ) -> Self {
        Self {
            motion,
            ranger,
            pwm,
            min_frequency_hz,
            max_frequency_hz,
        }
    }

    pub fn pwm(&self) -> &PwmDriver {
        &self.pwm
    }

    /// Silence the output and release the PWM channel.
    pub fn shutdown(&mut self) {
        self.pwm.deinit();
    }
}

impl<M: MotionPort, D> MotionPort for HardwareAdapter<M, D> {
    fn motion_detected(&mut self, now_ms: u32) -> bool {
        self.motion.motion_detected(now_ms)
    }
}

impl<M, D: DistancePort> DistancePort for HardwareAdapter<M, D> {
    fn read_distance_mm(&mut self) -> Result<f32, SensorError> {
        self.ranger.read_distance_mm()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<M, D> ActuatorPort for HardwareAdapter<M, D> {
    fn update(&mut self, frequency_hz: Option<f32>, duty_percent: Option<f32>) {
        let frequency_hz =
            frequency_hz.map(|f| f.clamp(self.min_frequency_hz, self.max_frequency_hz));
        self.pwm.update(frequency_hz, duty_percent);
    }

    fn off(&mut self) {
        self.pwm.off();
    }
}
