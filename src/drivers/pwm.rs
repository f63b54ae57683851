//! Generic PWM output driver (passive buzzer, LED, servo...).
//!
//! Frequency is clamped to 1 Hz – 20 kHz and duty to 0 – 100 %, mapped
//! onto a 16-bit duty value (0..=65535) before it reaches the LEDC
//! registers.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the LEDC peripheral via hw_init helpers.
//! On host/test: tracks state in-memory only.

use serde::{Deserialize, Serialize};

use crate::drivers::hw_init;
use crate::pins;

pub const MIN_FREQUENCY_HZ: u32 = 1;
pub const MAX_FREQUENCY_HZ: u32 = 20_000;

/// What is attached to the output.  Only used for naming in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PwmMode {
    Buzzer,
    Led,
    Servo,
    Generic,
}

impl PwmMode {
    pub fn name(self) -> &'static str {
        match self {
            Self::Buzzer => "buzzer",
            Self::Led => "led",
            Self::Servo => "servo",
            Self::Generic => "generic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmState {
    /// Duty 0; the carrier keeps its last frequency.
    Off { freq_hz: u32 },
    Running { freq_hz: u32, duty_u16: u16 },
    /// Channel released by [`PwmDriver::deinit`].
    Released,
}

pub struct PwmDriver {
    mode: PwmMode,
    state: PwmState,
    freq_hz: u32,
    duty_u16: u16,
}

impl PwmDriver {
    /// Driver with the boot-time carrier and duty 0.
    pub fn new(mode: PwmMode) -> Self {
        Self::with_initial(mode, pins::PWM_DEFAULT_FREQ_HZ as f32, 0.0)
    }

    pub fn with_initial(mode: PwmMode, freq_hz: f32, duty_percent: f32) -> Self {
        let mut driver = Self {
            mode,
            state: PwmState::Off { freq_hz: 0 },
            freq_hz: 0,
            duty_u16: 0,
        };
        driver.set_frequency(freq_hz);
        driver.set_duty(duty_percent);
        driver
    }

    /// Set the carrier frequency, clamped to 1 Hz – 20 kHz.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        if self.state == PwmState::Released {
            return;
        }
        let hz = clamp_frequency(freq_hz);
        if hz != self.freq_hz {
            hw_init::pwm_set_frequency(hz);
            self.freq_hz = hz;
        }
        self.refresh_state();
    }

    /// Set the duty cycle in percent, clamped to 0 – 100.
    pub fn set_duty(&mut self, duty_percent: f32) {
        if self.state == PwmState::Released {
            return;
        }
        let duty = percent_to_u16(duty_percent);
        hw_init::pwm_set_duty(duty);
        self.duty_u16 = duty;
        self.refresh_state();
    }

    /// Apply whichever of frequency and duty is given.
    pub fn update(&mut self, freq_hz: Option<f32>, duty_percent: Option<f32>) {
        if let Some(f) = freq_hz {
            self.set_frequency(f);
        }
        if let Some(d) = duty_percent {
            self.set_duty(d);
        }
    }

    /// Silence the output (duty 0).
    pub fn off(&mut self) {
        self.set_duty(0.0);
    }

    /// Silence and release the LEDC channel.  Later calls are ignored
    /// until a new driver is built.
    pub fn deinit(&mut self) {
        self.off();
        hw_init::pwm_release();
        self.state = PwmState::Released;
        log::info!("pwm({}): released", self.mode.name());
    }

    pub fn state(&self) -> PwmState {
        self.state
    }

    pub fn mode(&self) -> PwmMode {
        self.mode
    }

    pub fn frequency_hz(&self) -> u32 {
        self.freq_hz
    }

    pub fn duty_u16(&self) -> u16 {
        self.duty_u16
    }

    /// Current duty in percent (0 – 100).
    pub fn duty_percent(&self) -> f32 {
        f32::from(self.duty_u16) * 100.0 / f32::from(u16::MAX)
    }

    fn refresh_state(&mut self) {
        self.state = if self.duty_u16 == 0 {
            PwmState::Off {
                freq_hz: self.freq_hz,
            }
        } else {
            PwmState::Running {
                freq_hz: self.freq_hz,
                duty_u16: self.duty_u16,
            }
        };
    }
}

/// Integer frequency in `[1, 20 000]` Hz; NaN maps to the minimum.
pub fn clamp_frequency(freq_hz: f32) -> u32 {
    if freq_hz.is_nan() {
        return MIN_FREQUENCY_HZ;
    }
    (freq_hz as u32).clamp(MIN_FREQUENCY_HZ, MAX_FREQUENCY_HZ)
}

/// `0..=100` % onto `0..=65535`; NaN maps to 0.
pub fn percent_to_u16(duty_percent: f32) -> u16 {
    if duty_percent.is_nan() {
        return 0;
    }
    let pct = duty_percent.clamp(0.0, 100.0);
    (pct / 100.0 * f32::from(u16::MAX)) as u16
}
