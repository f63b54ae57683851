//! HC-SR04 ultrasonic range finder.
//!
//! One ping:
//!
//! ```text
//!  TRIG ──┐ 2 µs ┌── 10 µs ──┐
//!         └──────┘           └──────────────────────────────
//!  ECHO ─────────────────────────┐   pulse_us   ┌───────────
//!                                └──────────────┘ (high)
//! ```
//!
//! Distance is `pulse_us × 0.1715` mm (speed of sound 343 m/s, halved for
//! the round trip), truncated to whole millimetres.  Both the wait for the
//! echo to rise and the pulse itself are bounded by `echo_timeout_us`.
//!
//! [`Ultrasonic::read`] averages several pings spaced 1 ms apart and
//! ignores the ones that failed.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use heapless::Vec;
use log::debug;

use super::MicrosClock;
use crate::error::SensorError;

/// Millimetres per microsecond of round-trip echo time.
pub const MM_PER_US: f32 = 0.1715;

/// Upper bound on pings averaged per reading.
pub const MAX_SAMPLES: usize = 8;

const SAMPLE_SPACING_US: u32 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UltrasonicConfig {
    pub max_distance_mm: f32,
    pub samples: u8,
    pub echo_timeout_us: u32,
}

impl Default for UltrasonicConfig {
    fn default() -> Self {
        Self {
            max_distance_mm: 2_000.0,
            samples: 3,
            echo_timeout_us: 30_000,
        }
    }
}

/// Echo pulse width → whole millimetres.
pub fn pulse_to_mm(pulse_us: u64) -> f32 {
    (pulse_us as f32 * MM_PER_US).trunc()
}

pub struct Ultrasonic<TRIG, ECHO, DELAY, CLOCK> {
    trig: TRIG,
    echo: ECHO,
    delay: DELAY,
    clock: CLOCK,
    config: UltrasonicConfig,
}

impl<TRIG, ECHO, DELAY, CLOCK> Ultrasonic<TRIG, ECHO, DELAY, CLOCK>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    DELAY: DelayNs,
    CLOCK: MicrosClock,
{
    /// `config.samples` is clamped to `1..=MAX_SAMPLES`.
    pub fn new(
        trig: TRIG,
        echo: ECHO,
        delay: DELAY,
        clock: CLOCK,
        mut config: UltrasonicConfig,
    ) -> Self {
        config.samples = config.samples.clamp(1, MAX_SAMPLES as u8);
        Self {
            trig,
            echo,
            delay,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &UltrasonicConfig {
        &self.config
    }

    /// Averaged distance over `config.samples` pings.
    ///
    /// Fails only when every ping failed; the error of the last ping is
    /// returned.
    pub fn read(&mut self) -> Result<f32, SensorError> {
        let mut readings: Vec<f32, MAX_SAMPLES> = Vec::new();
        let mut last_err = SensorError::Timeout;

        for _ in 0..self.config.samples {
            match self.read_single() {
                Ok(mm) => {
                    // Capacity equals the clamped sample count.
                    let _ = readings.push(mm);
                }
                Err(e) => last_err = e,
            }
            self.delay.delay_us(SAMPLE_SPACING_US);
        }

        if readings.is_empty() {
            debug!("ultrasonic: no valid ping ({})", last_err);
            return Err(last_err);
        }
        let sum: f32 = readings.iter().sum();
        Ok((sum / readings.len() as f32).trunc())
    }

    /// One raw ping.
    pub fn read_single(&mut self) -> Result<f32, SensorError> {
        self.trigger()?;
        let pulse_us = self.measure_echo()?;
        let mm = pulse_to_mm(pulse_us);
        if mm > self.config.max_distance_mm {
            return Err(SensorError::OutOfRange);
        }
        Ok(mm)
    }

    fn trigger(&mut self) -> Result<(), SensorError> {
        self.trig.set_low().map_err(|_| SensorError::GpioFailed)?;
        self.delay.delay_us(2);
        self.trig.set_high().map_err(|_| SensorError::GpioFailed)?;
        self.delay.delay_us(10);
        self.trig.set_low().map_err(|_| SensorError::GpioFailed)
    }

    /// Width of the next HIGH pulse on ECHO, in microseconds.
    fn measure_echo(&mut self) -> Result<u64, SensorError> {
        let timeout = u64::from(self.config.echo_timeout_us);

        let wait_start = self.clock.now_us();
        while !self.echo.is_high().map_err(|_| SensorError::GpioFailed)? {
            if self.clock.now_us().wrapping_sub(wait_start) > timeout {
                return Err(SensorError::Timeout);
            }
        }

        let rise = self.clock.now_us();
        loop {
            let now = self.clock.now_us();
            if self.echo.is_low().map_err(|_| SensorError::GpioFailed)? {
                return Ok(now.wrapping_sub(rise));
            }
            if now.wrapping_sub(rise) > timeout {
                return Err(SensorError::Timeout);
            }
        }
    }
}
