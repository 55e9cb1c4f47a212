use std::sync::Arc;

use crate::sim::SimTime;
use crate::time::{DEFAULT_CORE_TICK, TimeError, TimeLord};

#[test]
fn default_core_tick_is_one_picosecond() {
    let mut lord = TimeLord::default();
    assert_eq!(lord.core_tick(), DEFAULT_CORE_TICK);
    assert_eq!(lord.core_converter().factor(), 1);
    assert_eq!(lord.nano().expect("ns").factor(), 1_000);
    assert_eq!(lord.micro().expect("us").factor(), 1_000_000);
    assert_eq!(lord.milli().expect("ms").factor(), 1_000_000_000);
}

#[test]
fn converters_round_trip_on_their_own_grid() {
    let mut lord = TimeLord::default();
    for spec in ["1ps", "1ns", "1us", "1ms", "1s"] {
        let tc = lord.converter(spec).expect("converter");
        for local in [0_u64, 1, 7, 1_000, 123_456] {
            let core = tc.to_core(local);
            assert_eq!(core.ticks() % tc.factor(), 0);
            assert_eq!(tc.to_core(tc.from_core(core)), core, "{spec} @ {local}");
        }
    }
}

#[test]
fn from_core_truncates() {
    let mut lord = TimeLord::default();
    let ns = lord.nano().expect("ns");
    assert_eq!(ns.from_core(SimTime(1_999)), 1);
    assert_eq!(ns.from_core(SimTime(999)), 0);
}

#[test]
fn equal_factors_share_one_converter() {
    let mut lord = TimeLord::default();
    let a = lord.converter("1ns").expect("1ns");
    let b = lord.converter("1000ps").expect("1000ps");
    let c = lord.converter("1GHz").expect("1GHz");
    assert!(Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&a, &c));
    // core converter + 1ns
    assert_eq!(lord.converter_count(), 2);
}

#[test]
fn inexact_factor_is_rounded() {
    let mut lord = TimeLord::default();
    // 3GHz = 333.33ps
    assert_eq!(lord.converter("3GHz").expect("3GHz").factor(), 333);
}

#[test]
fn finer_than_core_tick_is_an_error() {
    let mut lord = TimeLord::new("1ns").expect("core 1ns");
    assert!(matches!(
        lord.converter("1ps"),
        Err(TimeError::BelowResolution { .. })
    ));
    assert_eq!(lord.converter("1us").expect("1us").factor(), 1_000);
}

#[test]
fn sub_tick_periods_are_not_rounded_up() {
    let mut lord = TimeLord::new("1ns").expect("core 1ns");
    for spec in ["2GHz", "600ps", "999ps", "0.5ns"] {
        assert!(
            matches!(lord.converter(spec), Err(TimeError::BelowResolution { .. })),
            "{spec} must be rejected on a 1ns core"
        );
    }
    // 正好一个 tick，以及 1.4 tick 舍入为 1
    assert_eq!(lord.converter("1GHz").expect("1GHz").factor(), 1);
    assert_eq!(lord.converter("1400ps").expect("1400ps").factor(), 1);
    assert_eq!(lord.converter_count(), 1);
}

#[test]
fn shared_converter_keeps_the_first_spelling() {
    let mut lord = TimeLord::default();
    let ns = lord.converter("1ns").expect("1ns");
    let ghz = lord.converter("1GHz").expect("1GHz");
    assert_eq!(ns.spec(), "1ns");
    assert_eq!(ghz.spec(), "1ns");

    let mut lord = TimeLord::default();
    assert_eq!(lord.converter("1GHz").expect("1GHz").spec(), "1GHz");
    assert_eq!(lord.nano().expect("ns").spec(), "1GHz");
}

#[test]
fn core_tick_must_be_a_period() {
    assert!(matches!(
        TimeLord::new("1GHz"),
        Err(TimeError::CoreNotPeriod(_))
    ));
}
