//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

fn opt(v: Option<f32>) -> OptFmt {
    OptFmt(v)
}

struct OptFmt(Option<f32>);

impl core::fmt::Display for OptFmt {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{:.0}", v),
            None => write!(f, "-"),
        }
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | tick={} | gate={} | dist={}mm | freq={}Hz duty={}%",
                    t.tick,
                    t.phase.name(),
                    opt(t.distance_mm),
                    opt(t.frequency_hz),
                    opt(t.duty_percent),
                );
            }
            AppEvent::GateChanged { from, to } => {
                info!("STATE | {} -> {}", from.name(), to.name());
            }
            AppEvent::DistanceLost => {
                warn!("RANGE | lost");
            }
            AppEvent::DistanceRestored(mm) => {
                info!("RANGE | restored at {:.0}mm", mm);
            }
            AppEvent::Started(phase) => {
                info!("START | initial_gate={}", phase.name());
            }
        }
    }
}
