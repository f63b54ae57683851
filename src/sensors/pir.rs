//! HC-SR501 passive infrared motion sensor.
//!
//! The module needs roughly 30 s after power-up before its output means
//! anything; until then [`PirSensor::read`] reports no motion.

use embedded_hal::digital::InputPin;
use log::{info, warn};

use crate::error::SensorError;

pub struct PirSensor<P> {
    pin: P,
    warmup_ms: u32,
    start_ms: u32,
    warmed_up: bool,
}

impl<P: InputPin> PirSensor<P> {
    /// `start_ms` is the millisecond counter at power-up of the module.
    pub fn new(pin: P, warmup_ms: u32, start_ms: u32) -> Self {
        Self {
            pin,
            warmup_ms,
            start_ms,
            warmed_up: warmup_ms == 0,
        }
    }

    /// Raw level, or [`SensorError::WarmingUp`] inside the warm-up window.
    pub fn try_read(&mut self, now_ms: u32) -> Result<bool, SensorError> {
        if !self.warmed_up {
            if now_ms.wrapping_sub(self.start_ms) < self.warmup_ms {
                return Err(SensorError::WarmingUp);
            }
            self.warmed_up = true;
            info!("pir: warm-up complete after {} ms", self.warmup_ms);
        }
        self.pin.is_high().map_err(|_| SensorError::GpioFailed)
    }

    /// `true` while motion is sensed; `false` during warm-up and on pin
    /// errors.
    pub fn read(&mut self, now_ms: u32) -> bool {
        match self.try_read(now_ms) {
            Ok(level) => level,
            Err(SensorError::WarmingUp) => false,
            Err(e) => {
                warn!("pir: {}", e);
                false
            }
        }
    }

    pub fn is_warmed_up(&self) -> bool {
        self.warmed_up
    }
}
