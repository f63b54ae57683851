//! GPIO / peripheral pin assignments for the proximity controller board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Ultrasonic range finder (HC-SR04)
// ---------------------------------------------------------------------------

/// Digital output: 10 µs HIGH pulse starts a ping.
pub const ULTRASONIC_TRIG_GPIO: i32 = 15;
/// Digital input: HIGH for the round-trip time of the ping.
/// The HC-SR04 echo line is 5 V; use a divider on 3.3 V parts.
pub const ULTRASONIC_ECHO_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// PIR motion sensor (HC-SR501)
// ---------------------------------------------------------------------------

/// Digital input: HIGH while motion is detected.
pub const PIR_SENSE_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// PWM output (buzzer / LED)
// ---------------------------------------------------------------------------

/// LEDC PWM output driving the buzzer or LED.
pub const PWM_OUT_GPIO: i32 = 14;
/// Carrier frequency applied at boot before the first command.
pub const PWM_DEFAULT_FREQ_HZ: u32 = 1_000;
