//! ESP32 time adapter.
//!
//! Provides monotonic time queries for the controller.
//!
//! - **`target_os = "espidf"`** — wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **`not(target_os = "espidf")`** — uses `std::time::Instant` for
//!   host-side testing and simulation.

use crate::app::ports::ClockPort;
use crate::sensors::MicrosClock;

/// Time adapter for the ESP32-S3 platform.
#[derive(Clone, Copy)]
pub struct Esp32TimeAdapter {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        // SAFETY: esp_timer_get_time is a read of the 64-bit RTC counter.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since boot (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    /// Milliseconds since boot, truncated to 32 bits (wraps after ~49.7 days).
    pub fn uptime_ms(&self) -> u32 {
        (self.uptime_us() / 1_000) as u32
    }
}

impl ClockPort for Esp32TimeAdapter {
    fn now_ms(&self) -> u32 {
        self.uptime_ms()
    }
}

impl MicrosClock for Esp32TimeAdapter {
    fn now_us(&self) -> u64 {
        self.uptime_us()
    }
}
