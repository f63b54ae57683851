//! proxfuzz firmware — main entry point.
//!
//! Hexagonal architecture with a fixed-cadence polling loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter              LogEventSink    Esp32Time        │
//! │  (Motion+Distance+Actuator)   (EventSink)     (Clock)          │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              ControlService (pure logic)               │    │
//! │  │  MotionGate · FuzzyEngine                              │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::PinDriver;
use esp_idf_hal::peripherals::Peripherals;
use log::{error, info};

use proxfuzz::adapters::hardware::HardwareAdapter;
use proxfuzz::adapters::log_sink::LogEventSink;
use proxfuzz::adapters::time::Esp32TimeAdapter;
use proxfuzz::app::ports::ClockPort;
use proxfuzz::app::service::ControlService;
use proxfuzz::config::SystemConfig;
use proxfuzz::drivers::hw_init;
use proxfuzz::drivers::pwm::PwmDriver;
use proxfuzz::fuzzy::FuzzyEngine;
use proxfuzz::pins;
use proxfuzz::sensors::pir::PirSensor;
use proxfuzz::sensors::ultrasonic::{Ultrasonic, UltrasonicConfig};

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  proxfuzz v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = SystemConfig::default();
    config.validate()?;
    let clock = Esp32TimeAdapter::new();

    // ── 2. Fuzzy engine ───────────────────────────────────────
    // Configuration errors are fatal: nothing sensible can run without
    // a valid rule base.
    let engine = FuzzyEngine::new(config.preset.config()?)?;

    // ── 3. Initialise hardware peripherals ────────────────────
    if let Err(e) = hw_init::init_peripherals(pins::PWM_DEFAULT_FREQ_HZ) {
        error!("PWM init failed: {}", e);
        return Err(e.into());
    }

    // Pin drivers must match the assignments in `pins`.
    let peripherals = Peripherals::take()?;
    let pir_pin = PinDriver::input(peripherals.pins.gpio13)?;
    let trig_pin = PinDriver::output(peripherals.pins.gpio15)?;
    let echo_pin = PinDriver::input(peripherals.pins.gpio16)?;
    info!(
        "GPIO: PIR={} TRIG={} ECHO={}",
        pins::PIR_SENSE_GPIO,
        pins::ULTRASONIC_TRIG_GPIO,
        pins::ULTRASONIC_ECHO_GPIO
    );

    // ── 4. Construct adapters ─────────────────────────────────
    let pir = PirSensor::new(pir_pin, config.pir_warmup_ms, clock.now_ms());
    let ranger = Ultrasonic::new(
        trig_pin,
        echo_pin,
        Ets,
        clock,
        UltrasonicConfig {
            max_distance_mm: config.max_distance_mm,
            samples: config.ultrasonic_samples,
            echo_timeout_us: config.echo_timeout_us,
        },
    );
    let pwm = PwmDriver::new(config.pwm_mode);
    info!(
        "PWM output: {} on GPIO{}",
        config.pwm_mode.name(),
        pins::PWM_OUT_GPIO
    );

    let mut hw = HardwareAdapter::new(
        pir,
        ranger,
        pwm,
        config.min_frequency_hz,
        config.max_frequency_hz,
    );
    let mut log_sink = LogEventSink::new();

    // ── 5. Construct app service ──────────────────────────────
    let mut app = ControlService::new(&config, engine)?;
    app.start(&mut hw, &mut log_sink);

    info!(
        "System ready. PIR warm-up {} s, tick {} ms.",
        config.pir_warmup_ms / 1000,
        config.tick_interval_ms
    );

    // ── 6. Control loop ───────────────────────────────────────
    loop {
        let started = clock.now_ms();
        app.tick(&mut hw, started, &mut log_sink);

        // Hold a fixed cadence; a slow tick (three 30 ms echo timeouts)
        // simply shortens the sleep.
        let spent = clock.now_ms().wrapping_sub(started);
        FreeRtos::delay_ms(config.tick_interval_ms.saturating_sub(spent).max(1));
    }
}
