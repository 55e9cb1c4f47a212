use std::sync::Arc;

use crate::component::ComponentId;
use crate::link::{HandlerId, Link, LinkEvent, LinkKind, LinkPeer};
use crate::sim::SimTime;
use crate::time::TimeLord;

fn event(payload: u32) -> LinkEvent {
    LinkEvent::new(ComponentId(1), "out", Box::new(payload))
}

#[test]
fn port_without_handler_queues_arrivals() {
    let mut link = Link::port("in");
    assert!(link.is_polling());
    assert!(!link.is_connected());

    assert!(link.accept(event(1)).is_none());
    assert!(link.accept(event(2)).is_none());
    assert_eq!(link.pending(), 2);

    let first = link.poll().expect("queued");
    assert_eq!(first.payload::<u32>(), Some(&1));
    assert_eq!(first.src(), ComponentId(1));
    assert_eq!(first.src_link(), "out");
    assert_eq!(link.poll().and_then(|e| e.into_payload::<u32>().ok()), Some(2));
    assert!(link.poll().is_none());
}

#[test]
fn port_with_handler_hands_events_back() {
    let mut link = Link::port("in");
    link.set_handler(Some(HandlerId(3)));
    assert!(!link.is_polling());

    let (handler, ev) = link.accept(event(5)).expect("dispatched");
    assert_eq!(handler, HandlerId(3));
    assert_eq!(ev.payload::<u32>(), Some(&5));
    assert_eq!(link.pending(), 0);

    link.set_polling();
    assert!(link.accept(event(6)).is_none());
}

#[test]
fn first_time_base_wins() {
    let mut lord = TimeLord::default();
    let ns = lord.nano().expect("ns");
    let us = lord.micro().expect("us");

    let mut link = Link::port("p");
    assert!(!link.set_default_time_base(None));
    assert!(link.set_default_time_base(Some(Arc::clone(&ns))));
    assert!(!link.set_default_time_base(Some(us)));
    assert_eq!(link.time_base().map(|tc| tc.factor()), Some(1_000));
}

#[test]
fn self_link_is_a_zero_latency_loopback() {
    let link = Link::self_link("timer");
    assert_eq!(link.kind(), LinkKind::SelfLink);
    assert_eq!(link.peer(), &LinkPeer::Loopback);
    assert_eq!(link.latency(), SimTime::ZERO);
    assert!(link.is_connected());
}

#[test]
fn local_latency_needs_a_time_base() {
    let mut lord = TimeLord::default();
    let mut link = Link::port("p");
    link.set_latency(SimTime(25_000));
    assert_eq!(link.latency_local(), None);

    link.set_default_time_base(Some(lord.nano().expect("ns")));
    assert_eq!(link.latency_local(), Some(25));
}

#[test]
fn wrong_payload_type_returns_the_event() {
    let ev = event(9);
    let ev = ev.into_payload::<String>().expect_err("not a string");
    assert_eq!(ev.payload::<u32>(), Some(&9));
}
