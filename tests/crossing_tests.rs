//! Integration tests for the level crossing flasher

use rs_points::{
    hal::{MockClock, MockRelay, MockSensor, RecordingSink},
    Clock, CrossingConfig, CrossingController, CrossingState, Event, Power, ReleaseReason, Side,
};

type MockCrossing = CrossingController<MockSensor, MockSensor, MockRelay>;

fn crossing(config: &CrossingConfig) -> MockCrossing {
    CrossingController::new(
        config,
        MockSensor::digital(false),
        MockSensor::digital(false),
        MockRelay::new(),
        MockRelay::new(),
    )
}

fn run_for(
    crossing: &mut MockCrossing,
    clock: &mut MockClock,
    sink: &mut RecordingSink,
    duration: u32,
) {
    for _ in 0..duration / 5 {
        clock.advance(5);
        crossing.update(clock.now_ms(), sink).unwrap();
    }
}

fn releases(sink: &RecordingSink) -> Vec<ReleaseReason> {
    sink.events
        .iter()
        .filter_map(|e| match e {
            Event::CrossingReleased { reason, .. } => Some(*reason),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Train Passing
// ============================================================================

#[test]
fn train_passing_east_to_west() {
    let config = CrossingConfig::default();
    let mut crossing = crossing(&config);
    let mut clock = MockClock::new();
    let mut sink = RecordingSink::new();
    crossing.init(clock.now_ms(), &mut sink).unwrap();

    // Train reaches the east detector
    crossing.east_mut().set_high(true);
    run_for(&mut crossing, &mut clock, &mut sink, 100);
    assert_eq!(crossing.active_from(), Some(Side::East));

    // Crosses the road and reaches the west detector
    run_for(&mut crossing, &mut clock, &mut sink, 2000);
    crossing.west_mut().set_high(true);
    run_for(&mut crossing, &mut clock, &mut sink, 100);
    crossing.east_mut().set_high(false);
    run_for(&mut crossing, &mut clock, &mut sink, 1000);
    assert!(crossing.is_active());

    // Last vehicle leaves the west detector
    crossing.west_mut().set_high(false);
    run_for(&mut crossing, &mut clock, &mut sink, 100);
    assert_eq!(crossing.state(), CrossingState::Idle);
    assert_eq!(releases(&sink), [ReleaseReason::Cleared]);

    let (a, b) = crossing.lamps();
    assert_eq!((a.power, b.power), (Some(Power::Off), Some(Power::Off)));
}

#[test]
fn lamps_flash_alternately_at_interval() {
    let config = CrossingConfig::default()
        .with_debounce_ms(0)
        .with_sample_interval_ms(0)
        .with_flash_interval_ms(500);
    let mut crossing = crossing(&config);
    let mut clock = MockClock::new();
    let mut sink = RecordingSink::new();
    crossing.init(0, &mut sink).unwrap();

    crossing.west_mut().set_high(true);
    crossing.update(0, &mut sink).unwrap();

    let mut toggles = 0;
    let mut last = crossing.lamps().0.is_on();
    for _ in 0..400 {
        clock.advance(5);
        crossing.update(clock.now_ms(), &mut sink).unwrap();
        let (a, b) = crossing.lamps();
        assert_ne!(a.is_on(), b.is_on(), "exactly one lamp lit");
        if a.is_on() != last {
            toggles += 1;
            last = a.is_on();
        }
    }
    // 2000ms of flashing at 500ms per phase
    assert_eq!(toggles, 4);
}

// ============================================================================
// Fail-Safe Release
// ============================================================================

#[test]
fn train_backing_out_releases_on_timeout() {
    let config = CrossingConfig::default().with_release_timeout_ms(10_000);
    let mut crossing = crossing(&config);
    let mut clock = MockClock::new();
    let mut sink = RecordingSink::new();
    crossing.init(0, &mut sink).unwrap();

    crossing.west_mut().set_high(true);
    run_for(&mut crossing, &mut clock, &mut sink, 500);
    crossing.west_mut().set_high(false);
    run_for(&mut crossing, &mut clock, &mut sink, 9_900);
    assert!(crossing.is_active());

    run_for(&mut crossing, &mut clock, &mut sink, 200);
    assert!(!crossing.is_active());
    assert_eq!(releases(&sink), [ReleaseReason::Timeout]);
}

#[test]
fn detector_flicker_does_not_activate() {
    let config = CrossingConfig::default().with_debounce_ms(50);
    let mut crossing = crossing(&config);
    let mut clock = MockClock::new();
    let mut sink = RecordingSink::new();
    crossing.init(0, &mut sink).unwrap();

    for _ in 0..20 {
        crossing.east_mut().set_high(true);
        run_for(&mut crossing, &mut clock, &mut sink, 20);
        crossing.east_mut().set_high(false);
        run_for(&mut crossing, &mut clock, &mut sink, 20);
    }
    assert!(!crossing.is_active());
    assert!(sink.events.is_empty());
}

#[test]
fn lamp_write_failure_is_retried() {
    let config = CrossingConfig::default().with_debounce_ms(0);
    let mut crossing = CrossingController::new(
        &config,
        MockSensor::digital(true),
        MockSensor::digital(false),
        {
            let mut lamp = MockRelay::new();
            lamp.fail_next(1);
            lamp
        },
        MockRelay::new(),
    );
    let mut sink = RecordingSink::new();

    // First phase lights lamp A, which fails once
    assert!(crossing.init(0, &mut sink).is_err());
    assert!(crossing.is_active());

    crossing.update(10, &mut sink).unwrap();
    assert!(crossing.lamps().0.is_on());
    assert!(!crossing.lamps().1.is_on());
}
