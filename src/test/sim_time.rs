use crate::sim::SimTime;

#[test]
fn sim_time_saturates_at_both_ends() {
    assert_eq!(SimTime::MAX.saturating_add(SimTime(1)), SimTime::MAX);
    assert_eq!(SimTime(3).saturating_sub(SimTime(5)), SimTime::ZERO);
    assert_eq!(SimTime(3).saturating_add(SimTime(5)).ticks(), 8);
}

#[test]
fn sim_time_displays_as_ticks() {
    assert_eq!(SimTime(42).to_string(), "42 ticks");
}
