use crate::time::{TimeError, UnitKind, parse_period};

#[test]
fn periods_parse_with_si_prefixes() {
    let p = parse_period("1ns").expect("1ns");
    assert_eq!(p.kind, UnitKind::Period);
    assert_eq!((p.num, p.den), (1, 1_000_000_000));

    let p = parse_period(" 2.5 us ").expect("2.5 us");
    assert_eq!(p.num * 1_000_000, p.den * 2 + p.den / 2);
}

#[test]
fn frequencies_are_inverted_to_periods() {
    let p = parse_period("2GHz").expect("2GHz");
    assert_eq!(p.kind, UnitKind::Frequency);
    // 0.5ns
    assert_eq!(p.num * 2_000_000_000, p.den);
}

#[test]
fn bad_specs_are_rejected() {
    assert_eq!(parse_period("   "), Err(TimeError::Empty));
    assert!(matches!(parse_period("ns"), Err(TimeError::InvalidNumber(_))));
    assert!(matches!(parse_period("-5ns"), Err(TimeError::InvalidNumber(_))));
    assert!(matches!(parse_period("1.2.3ns"), Err(TimeError::InvalidNumber(_))));
    assert!(matches!(parse_period("5 parsecs"), Err(TimeError::UnknownUnit(_))));
    assert!(matches!(parse_period("3xs"), Err(TimeError::UnknownUnit(_))));
    assert!(matches!(parse_period("0ns"), Err(TimeError::ZeroValue(_))));
}
