//! Sensor drivers — PIR motion detector and ultrasonic range finder.
//!
//! Both drivers are generic over the `embedded-hal` 1.0 digital traits so
//! the same code runs against `esp-idf-hal` pin drivers on the device and
//! against scripted mock pins on the host.

pub mod pir;
pub mod ultrasonic;

/// Free-running microsecond counter used to time echo pulses.
pub trait MicrosClock {
    fn now_us(&self) -> u64;
}

impl<T: MicrosClock + ?Sized> MicrosClock for &T {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}
