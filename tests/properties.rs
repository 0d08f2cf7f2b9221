//! Property tests for the hysteresis interpreter, debounce gate and relay mapping.

use proptest::prelude::*;
use rs_points::{
    hal::{MockRelay, MockSensor, RecordingSink},
    DebounceGate, PointConfig, PointController, PointKind, PointState, Route, SensorLevel,
    Threshold,
};

fn arb_level() -> impl Strategy<Value = SensorLevel> {
    prop_oneof![Just(SensorLevel::Low), Just(SensorLevel::High)]
}

fn arb_threshold() -> impl Strategy<Value = Threshold> {
    (1u16..=1022, 1u16..=200).prop_map(|(t, h)| Threshold::new(t, h, 1023))
}

fn arb_kind() -> impl Strategy<Value = PointKind> {
    prop_oneof![
        arb_level().prop_map(|active_when| PointKind::Coacting { active_when }),
        arb_level().prop_map(|feed_b_when| PointKind::YBranch { feed_b_when }),
    ]
}

// ── Hysteresis interpreter ───────────────────────────────────

proptest! {
    #[test]
    fn below_lower_rail_is_low(threshold in arb_threshold(), prior in arb_level(), raw in 0u16..=1023) {
        prop_assume!(raw < threshold.lower());
        prop_assert_eq!(threshold.interpret(raw, prior), SensorLevel::Low);
    }

    #[test]
    fn above_upper_rail_is_high(threshold in arb_threshold(), prior in arb_level(), raw in 0u16..=1023) {
        prop_assume!(raw > threshold.upper());
        prop_assert_eq!(threshold.interpret(raw, prior), SensorLevel::High);
    }

    #[test]
    fn inside_band_holds_prior(threshold in arb_threshold(), prior in arb_level(), offset in 0u16..=400) {
        let raw = threshold.lower().saturating_add(offset).min(threshold.upper());
        prop_assert_eq!(threshold.interpret(raw, prior), prior);
    }
}

// ── Debounce gate ────────────────────────────────────────────

proptest! {
    /// Candidates that never hold still for the stable duration are never
    /// accepted.
    #[test]
    fn chatter_never_accepted(
        stable_ms in 10u32..=200,
        flips in proptest::collection::vec(1u32..10, 1..100),
    ) {
        let mut gate = DebounceGate::new(false, stable_ms, 0);
        let mut now = 0u32;
        let mut candidate = false;
        for gap in flips {
            // every run is shorter than the stable duration
            let step = gap.min(stable_ms - 1);
            candidate = !candidate;
            gate.accept(candidate, now);
            now += step;
            let out = gate.accept(candidate, now);
            prop_assert!(!out.changed);
            candidate = !candidate;
            gate.accept(candidate, now);
        }
        prop_assert!(!gate.accepted());
    }

    /// A sustained change is accepted exactly once, on the first tick at or
    /// after the stable duration.
    #[test]
    fn sustained_change_accepted_once(
        start in any::<u32>(),
        stable_ms in 0u32..=500,
        tick in 1u32..=20,
    ) {
        let mut gate = DebounceGate::new(false, stable_ms, start);
        let mut now = start;
        let mut accepted_at = None;
        let mut changes = 0;
        for _ in 0..(stable_ms / tick + 10) {
            if gate.accept(true, now).changed {
                changes += 1;
                accepted_at.get_or_insert(now);
            }
            now = now.wrapping_add(tick);
        }
        prop_assert_eq!(changes, 1);
        let elapsed = accepted_at.map(|at| at.wrapping_sub(start));
        prop_assert!(elapsed.is_some_and(|e| e >= stable_ms && e < stable_ms + tick));
    }
}

// ── Relay mapping ────────────────────────────────────────────

proptest! {
    /// Whatever the readings, a coacting pair never powers exactly one relay
    /// and a Y-branch always powers exactly one.
    #[test]
    fn relay_invariants_hold_for_any_history(
        kind in arb_kind(),
        readings in proptest::collection::vec(0u16..=1023, 1..200),
    ) {
        let config = PointConfig::coacting("prop")
            .with_kind(kind)
            .with_sample_interval_ms(0)
            .with_stable_ms(20);
        let mut point = PointController::new(
            &config,
            MockSensor::analog(readings[0]),
            MockRelay::new(),
            MockRelay::new(),
        );
        let mut sink = RecordingSink::new();
        point.init(0, &mut sink).unwrap();

        for (i, raw) in readings.iter().enumerate() {
            point.sensor_mut().set(*raw);
            point.update(i as u32 * 5, &mut sink).unwrap();

            let powered = [point.first_relay(), point.second_relay()]
                .iter()
                .filter(|r| r.is_on())
                .count();
            match point.state() {
                Some(PointState::Coacting(_)) => {
                    prop_assert!(powered == 0 || powered == 2);
                }
                Some(PointState::YBranch(_)) => {
                    prop_assert_eq!(powered, 1);
                }
                None => {
                    prop_assert!(false, "relays never applied");
                }
            }
        }
    }

    /// Every state change notification matches the relays actually written.
    #[test]
    fn notifications_match_relays(readings in proptest::collection::vec(0u16..=1023, 1..200)) {
        let config = PointConfig::y_branch("prop").with_sample_interval_ms(0).with_stable_ms(10);
        let mut point = PointController::new(
            &config,
            MockSensor::analog(readings[0]),
            MockRelay::new(),
            MockRelay::new(),
        );
        let mut sink = RecordingSink::new();
        point.init(0, &mut sink).unwrap();
        for (i, raw) in readings.iter().enumerate() {
            point.sensor_mut().set(*raw);
            point.update(i as u32 * 5, &mut sink).unwrap();
        }

        let last = sink.changes().last().map(|c| c.state);
        prop_assert_eq!(last, point.state());
        match point.state() {
            Some(PointState::YBranch(Route::FeedA)) => {
                prop_assert!(point.first_relay().is_on());
            }
            Some(PointState::YBranch(Route::FeedB)) => {
                prop_assert!(point.second_relay().is_on());
            }
            other => {
                prop_assert!(false, "unexpected state {:?}", other);
            }
        }
        // consecutive notifications never repeat a state
        let states: Vec<_> = sink.changes().map(|c| c.state).collect();
        prop_assert!(states.windows(2).all(|w| w[0] != w[1]));
    }
}
