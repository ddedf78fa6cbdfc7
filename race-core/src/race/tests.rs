use crate::config::{SPEED_TRIGGER_KMH, TARGET_DISTANCE_M};
use crate::nmea::parse;
use crate::race::{is_start_speed, RaceEvent, RaceEvents, RaceMachine, RaceState};

const START_LAT: &str = "4807.038";

fn rmc(lat: &str, speed_knots: &str) -> String {
    format!("$GNRMC,123519,A,{lat},N,01131.000,E,{speed_knots},084.4,230394,003.1,W*6A")
}

fn feed(sm: &mut RaceMachine, line: &str, now_ms: u32) -> RaceEvents {
    sm.update(&parse(line), now_ms)
}

/// Machine already past the start at `start_ms`, standing on `START_LAT`.
fn running_machine(start_ms: u32) -> RaceMachine {
    let mut sm = RaceMachine::new();
    feed(&mut sm, &rmc(START_LAT, "0.0"), 0);
    feed(&mut sm, &rmc(START_LAT, "10.0"), start_ms);
    assert_eq!(sm.state(), RaceState::Running);
    sm
}

#[test]
fn test_initial_state() {
    let sm = RaceMachine::new();
    assert_eq!(sm.state(), RaceState::AwaitingFix);
    assert!(sm.context().is_none());
}

#[test]
fn test_first_valid_fix_makes_ready() {
    let mut sm = RaceMachine::new();
    let events = feed(&mut sm, &rmc(START_LAT, "0.0"), 10);
    assert_eq!(events.as_slice(), &[RaceEvent::FixAcquired]);
    assert_eq!(sm.state(), RaceState::Ready);
}

#[test]
fn test_fast_first_fix_only_makes_ready() {
    let mut sm = RaceMachine::new();
    feed(&mut sm, &rmc(START_LAT, "22.4"), 10);
    assert_eq!(sm.state(), RaceState::Ready);
    assert!(sm.context().is_none());
}

#[test]
fn test_rejected_rmc_while_waiting_shows_indicator() {
    let mut sm = RaceMachine::new();
    let events = feed(&mut sm, "$GNRMC,123519,V,,,,,,,230394,,,N*53", 0);
    assert_eq!(events.as_slice(), &[RaceEvent::Waiting]);

    let events = feed(&mut sm, "$GNRMC,123519,A", 0);
    assert_eq!(events.as_slice(), &[RaceEvent::Waiting]);
    assert_eq!(sm.state(), RaceState::AwaitingFix);
}

#[test]
fn test_other_rejections_are_silent() {
    let mut sm = RaceMachine::new();
    assert!(feed(&mut sm, "$GPGSV,3,1,11*74", 0).is_empty());
    assert!(feed(&mut sm, "$GNGGA,123519,,,,,0,00,99.99,,,,,,*56", 0).is_empty());

    feed(&mut sm, &rmc(START_LAT, "0.0"), 0);
    assert!(feed(&mut sm, "$GNRMC,123519,V,,,,,,,230394,,,N*53", 0).is_empty());
    assert_eq!(sm.state(), RaceState::Ready);
}

#[test]
fn test_position_only_fix_does_not_drive_race() {
    let mut sm = RaceMachine::new();
    let gga = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47";
    assert!(feed(&mut sm, gga, 0).is_empty());
    assert_eq!(sm.state(), RaceState::AwaitingFix);
}

#[test]
fn test_trigger_is_strict() {
    assert!(!is_start_speed(SPEED_TRIGGER_KMH));
    assert!(!is_start_speed(0.0));
    assert!(is_start_speed(SPEED_TRIGGER_KMH + 1e-9));
}

#[test]
fn test_slow_fixes_stay_ready() {
    let mut sm = RaceMachine::new();
    feed(&mut sm, &rmc(START_LAT, "0.0"), 0);
    // 0.80 kn = 1.4816 km/h
    for t in 1..10 {
        assert!(feed(&mut sm, &rmc(START_LAT, "0.80"), t * 100).is_empty());
    }
    assert_eq!(sm.state(), RaceState::Ready);
}

#[test]
fn test_start_captures_position_and_time() {
    let mut sm = RaceMachine::new();
    feed(&mut sm, &rmc(START_LAT, "0.0"), 0);
    // 0.82 kn = 1.51864 km/h
    let events = feed(&mut sm, &rmc(START_LAT, "0.82"), 1234);

    assert_eq!(sm.state(), RaceState::Running);
    let ctx = sm.context().copied().unwrap();
    assert_eq!(ctx.start_ms, 1234);
    assert_eq!(ctx.distance_m, 0.0);
    assert!((ctx.start.latitude_deg - 48.1173).abs() < 1e-6);
    assert_eq!(events.as_slice(), &[RaceEvent::Started { start: ctx.start }]);
}

#[test]
fn test_progress_reports_distance_and_elapsed() {
    let mut sm = running_machine(1000);
    let events = feed(&mut sm, &rmc("4807.0600", "10.0"), 4000);

    assert_eq!(events.len(), 1);
    match events[0] {
        RaceEvent::Progress {
            distance_m,
            elapsed_ms,
        } => {
            assert!(distance_m > 40.0 && distance_m < 41.5, "got {distance_m}");
            assert_eq!(elapsed_ms, 3000);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(sm.state(), RaceState::Running);
}

#[test]
fn test_finish_on_first_fix_at_target() {
    let mut sm = running_machine(1000);

    // ~74.9 m: not yet.
    let events = feed(&mut sm, &rmc("4807.0784", "10.0"), 8000);
    assert_eq!(events.len(), 1);
    assert_eq!(sm.state(), RaceState::Running);

    // ~75.06 m: finish, after the progress line.
    let events = feed(&mut sm, &rmc("4807.0785", "10.0"), 9500);
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], RaceEvent::Progress { elapsed_ms: 8500, .. }));
    match events[1] {
        RaceEvent::Finished {
            distance_m,
            elapsed_ms,
        } => {
            assert!(distance_m >= TARGET_DISTANCE_M);
            assert_eq!(elapsed_ms, 8500);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(sm.state(), RaceState::Finished);
}

#[test]
fn test_distance_is_from_start_not_cumulative() {
    let mut sm = running_machine(0);
    // Walk 40 m out and back again: never finishes.
    for (i, lat) in ["4807.0600", "4807.038", "4807.0600", "4807.038"].iter().enumerate() {
        feed(&mut sm, &rmc(lat, "10.0"), 1000 * (i as u32 + 1));
    }
    assert_eq!(sm.state(), RaceState::Running);
    assert!(sm.context().unwrap().distance_m < 1e-6);
}

#[test]
fn test_finished_is_terminal() {
    let mut sm = running_machine(0);
    feed(&mut sm, &rmc("4807.1000", "10.0"), 5000);
    assert_eq!(sm.state(), RaceState::Finished);
    let ctx = *sm.context().unwrap();

    for t in 1..20 {
        assert!(feed(&mut sm, &rmc("4808.0000", "30.0"), 5000 + t * 100).is_empty());
        assert!(feed(&mut sm, "$GNRMC,123519,V,,,,,,,230394,,,N*53", 0).is_empty());
    }
    assert_eq!(sm.state(), RaceState::Finished);
    assert_eq!(*sm.context().unwrap(), ctx);
}

#[test]
fn test_elapsed_survives_clock_wrap() {
    let start = u32::MAX - 499;
    let mut sm = running_machine(start);
    let events = feed(&mut sm, &rmc("4807.1000", "10.0"), 500);
    assert!(matches!(
        events.last(),
        Some(RaceEvent::Finished {
            elapsed_ms: 1000,
            ..
        })
    ));
}
