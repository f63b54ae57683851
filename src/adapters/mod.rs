//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to              |
//! |----------------|--------------------|--------------------------|
//! | `hardware`     | MotionPort         | PIR via GPIO             |
//! |                | DistancePort       | HC-SR04 via GPIO         |
//! |                | ActuatorPort       | ESP32 LEDC PWM           |
//! | `log_sink`     | EventSink          | Serial log output        |
//! | `time`         | ClockPort          | ESP32 system timer       |
//! |                | MicrosClock        |                          |

pub mod hardware;
pub mod log_sink;
pub mod time;
