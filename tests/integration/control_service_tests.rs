//! Integration tests for the ControlService → gate → engine → actuator
//! pipeline.
//!
//! These run on the host (x86_64) against scripted sensors and a
//! recording actuator.

use crate::mock_hw::{ActuatorCall, LogSink, MockHardware};

use proxfuzz::app::events::AppEvent;
use proxfuzz::app::service::{ControlService, TickOutcome};
use proxfuzz::config::SystemConfig;
use proxfuzz::error::SensorError;
use proxfuzz::fuzzy::FuzzyEngine;
use proxfuzz::fuzzy::presets::Preset;
use proxfuzz::gate::GatePhase;

fn make_app(config: SystemConfig) -> (ControlService, MockHardware, LogSink) {
    let engine = FuzzyEngine::new(config.preset.config().unwrap()).unwrap();
    let mut app = ControlService::new(&config, engine).unwrap();
    let mut hw = MockHardware::new();
    let mut sink = LogSink::new();
    app.start(&mut hw, &mut sink);
    (app, hw, sink)
}

fn no_grace() -> SystemConfig {
    SystemConfig {
        grace_timeout_ms: 0,
        ..SystemConfig::default()
    }
}

fn driven(outcome: TickOutcome) -> (f32, f32) {
    match outcome {
        TickOutcome::Driven {
            frequency_hz: Some(f),
            duty_percent: Some(d),
            ..
        } => (f, d),
        other => panic!("expected a driven tick, got {other:?}"),
    }
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_silences_output_and_announces_idle() {
    let (app, hw, sink) = make_app(SystemConfig::default());
    assert_eq!(app.phase(), GatePhase::Idle);
    assert_eq!(hw.calls, vec![ActuatorCall::Off]);
    assert_eq!(sink.events, vec![AppEvent::Started(GatePhase::Idle)]);
}

// ── Gate lifecycle ────────────────────────────────────────────

#[test]
fn motion_opens_gate_until_active_timeout_without_grace() {
    let (mut app, mut hw, mut sink) = make_app(no_grace());
    hw.set_distance(Ok(300.0));

    hw.motion = true;
    app.tick(&mut hw, 0, &mut sink);
    assert_eq!(app.phase(), GatePhase::Active);
    assert!(hw.sounding());

    hw.motion = false;
    for t in [1, 30_000, 59_999, 60_000] {
        app.tick(&mut hw, t, &mut sink);
        assert_eq!(app.phase(), GatePhase::Active, "closed early at t={t}");
        assert!(hw.sounding());
    }

    let outcome = app.tick(&mut hw, 60_001, &mut sink);
    assert_eq!(outcome, TickOutcome::Silenced);
    assert_eq!(app.phase(), GatePhase::Idle);
    assert_eq!(hw.last_call(), Some(&ActuatorCall::Off));

    let changes: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::GateChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        changes,
        vec![
            (GatePhase::Idle, GatePhase::Active),
            (GatePhase::Active, GatePhase::Idle)
        ]
    );
}

#[test]
fn grace_holds_sound_briefly_and_motion_resumes_active() {
    let (mut app, mut hw, mut sink) = make_app(SystemConfig::default());
    hw.set_distance(Ok(800.0));

    hw.motion = true;
    app.tick(&mut hw, 0, &mut sink);

    hw.motion = false;
    app.tick(&mut hw, 100, &mut sink);
    assert_eq!(app.phase(), GatePhase::Grace);
    assert!(hw.sounding(), "grace keeps the output running");

    hw.motion = true;
    app.tick(&mut hw, 600, &mut sink);
    assert_eq!(app.phase(), GatePhase::Active);

    hw.motion = false;
    app.tick(&mut hw, 700, &mut sink);
    assert_eq!(app.phase(), GatePhase::Grace);
    app.tick(&mut hw, 1_700, &mut sink);
    assert_eq!(app.phase(), GatePhase::Grace, "exactly grace_timeout is still inside");

    app.tick(&mut hw, 1_701, &mut sink);
    assert_eq!(app.phase(), GatePhase::Idle);
    assert_eq!(hw.last_call(), Some(&ActuatorCall::Off));
}

#[test]
fn idle_ticks_never_query_the_range_finder() {
    let (mut app, mut hw, mut sink) = make_app(SystemConfig::default());
    hw.set_distance(Ok(500.0));

    for t in (0..10).map(|i| i * 100) {
        assert_eq!(app.tick(&mut hw, t, &mut sink), TickOutcome::Silenced);
    }
    assert_eq!(hw.distance_reads, 0);
    assert!(hw.calls.iter().all(|c| *c == ActuatorCall::Off));

    hw.motion = true;
    app.tick(&mut hw, 1_000, &mut sink);
    assert_eq!(hw.distance_reads, 1);
}

// ── Fuzzy mapping ─────────────────────────────────────────────

#[test]
fn closer_hand_plays_higher_pitch() {
    let (mut app, mut hw, mut sink) = make_app(SystemConfig::default());
    hw.motion = true;

    hw.set_distance(Ok(100.0));
    let (near_freq, _) = driven(app.tick(&mut hw, 0, &mut sink));

    hw.set_distance(Ok(1_500.0));
    let (mid_freq, _) = driven(app.tick(&mut hw, 100, &mut sink));

    assert!(near_freq > mid_freq, "near={near_freq} mid={mid_freq}");
    assert!((100.0..=2_000.0).contains(&near_freq));
    assert!((100.0..=2_000.0).contains(&mid_freq));
}

#[test]
fn four_zone_preset_drives_within_ranges() {
    let config = SystemConfig {
        preset: Preset::FourZone,
        ..SystemConfig::default()
    };
    let (mut app, mut hw, mut sink) = make_app(config);
    hw.motion = true;

    for (i, mm) in [0.0, 450.0, 1_000.0, 1_600.0, 2_000.0].into_iter().enumerate() {
        hw.set_distance(Ok(mm));
        let (f, d) = driven(app.tick(&mut hw, i as u32 * 100, &mut sink));
        assert!((100.0..=2_000.0).contains(&f), "freq {f} at {mm}");
        assert!((0.0..=100.0).contains(&d), "duty {d} at {mm}");
    }
}

#[test]
fn open_gate_without_distance_plays_range_minimum() {
    let (mut app, mut hw, mut sink) = make_app(SystemConfig::default());
    hw.motion = true;
    hw.set_distance(Err(SensorError::Timeout));

    let outcome = app.tick(&mut hw, 0, &mut sink);
    assert_eq!(
        outcome,
        TickOutcome::Driven {
            distance_mm: None,
            frequency_hz: Some(100.0),
            duty_percent: Some(0.0),
        }
    );
    assert_eq!(
        hw.last_call(),
        Some(&ActuatorCall::Update {
            frequency_hz: Some(100.0),
            duty_percent: Some(0.0),
        })
    );
}

#[test]
fn readings_beyond_max_distance_count_as_absent() {
    let (mut app, mut hw, mut sink) = make_app(SystemConfig::default());
    hw.motion = true;
    hw.set_distance(Ok(2_500.0));

    match app.tick(&mut hw, 0, &mut sink) {
        TickOutcome::Driven { distance_mm, .. } => assert_eq!(distance_mm, None),
        other => panic!("unexpected {other:?}"),
    }
}

// ── Events ────────────────────────────────────────────────────

#[test]
fn distance_loss_and_recovery_are_reported_once() {
    let (mut app, mut hw, mut sink) = make_app(SystemConfig::default());
    hw.motion = true;
    hw.distances = [
        Ok(400.0),
        Err(SensorError::Timeout),
        Err(SensorError::OutOfRange),
        Err(SensorError::Timeout),
        Ok(420.0),
        Ok(430.0),
    ]
    .into_iter()
    .collect();

    for t in 0..6 {
        app.tick(&mut hw, t * 100, &mut sink);
    }

    assert_eq!(sink.count(|e| *e == AppEvent::DistanceLost), 1);
    let restored: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::DistanceRestored(mm) => Some(*mm),
            _ => None,
        })
        .collect();
    assert_eq!(restored, vec![420.0]);
}

#[test]
fn telemetry_follows_configured_cadence() {
    let config = SystemConfig {
        telemetry_every_ticks: 3,
        ..SystemConfig::default()
    };
    let (mut app, mut hw, mut sink) = make_app(config);
    hw.motion = true;
    hw.set_distance(Ok(600.0));

    for t in 0..7 {
        app.tick(&mut hw, t * 100, &mut sink);
    }

    let telemetry: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Telemetry(t) => Some(*t),
            _ => None,
        })
        .collect();
    assert_eq!(telemetry.len(), 2);
    assert_eq!(telemetry[0].tick, 3);
    assert_eq!(telemetry[1].tick, 6);
    assert_eq!(telemetry[1].phase, GatePhase::Active);
    assert_eq!(telemetry[1].distance_mm, Some(600.0));
    assert!(telemetry[1].frequency_hz.is_some());
    assert_eq!(app.tick_count(), 7);
}

#[test]
fn telemetry_can_be_disabled() {
    let config = SystemConfig {
        telemetry_every_ticks: 0,
        ..SystemConfig::default()
    };
    let (mut app, mut hw, mut sink) = make_app(config);
    for t in 0..100 {
        app.tick(&mut hw, t * 100, &mut sink);
    }
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Telemetry(_))), 0);
}
