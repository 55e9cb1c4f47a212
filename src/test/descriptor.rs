use serde_json::Value;

use super::support::{Probe, base_with_ports};
use crate::component::{Component, ComponentId};
use crate::elements::{Accumulator, Adder, Multiplier, Pinger, builtin_registry};
use crate::eli::{Category, CreateStrategy, ElementInfo, KindTag};
use crate::params::{ConfigError, Params};

#[test]
fn adder_uses_its_constructor_and_multiplier_its_factory() {
    let registry = builtin_registry().expect("registry");
    let adder = registry.lookup("demo", "Adder", KindTag::Component).expect("Adder");
    let mult = registry
        .lookup("demo", "Multiplier", KindTag::Component)
        .expect("Multiplier");
    assert_eq!(adder.creation_strategy(), CreateStrategy::Constructor);
    assert_eq!(mult.creation_strategy(), CreateStrategy::CustomFactory);

    let a = adder
        .create_component(base_with_ports(7, &["in", "out"]), &Params::new())
        .expect("create Adder");
    let m = mult
        .create_component(
            base_with_ports(8, &["in", "out"]),
            &Params::new().with("factor", "3"),
        )
        .expect("create Multiplier");

    let a = a.as_any().downcast_ref::<Adder>().expect("is Adder");
    let m = m.as_any().downcast_ref::<Multiplier>().expect("is Multiplier");
    assert_eq!(a.built_by(), CreateStrategy::Constructor);
    assert_eq!(a.base().id(), ComponentId(7));
    assert_eq!(m.built_by(), CreateStrategy::CustomFactory);
    assert_eq!(m.factor(), 3);
    assert_ne!(a.base().id(), m.base().id());
}

#[test]
fn missing_required_param_fails_creation() {
    let registry = builtin_registry().expect("registry");
    let mult = registry.component("demo", "Multiplier").expect("Multiplier");
    let err = mult
        .create_component(base_with_ports(1, &["in", "out"]), &Params::new())
        .err()
        .expect("factor is required");
    assert_eq!(
        err,
        ConfigError::MissingParam {
            element: "demo.Multiplier".to_string(),
            param: "factor".to_string(),
        }
    );
}

#[test]
fn custom_factory_can_reject_what_the_constructor_accepts() {
    let registry = builtin_registry().expect("registry");
    let mult = registry.component("demo", "Multiplier").expect("Multiplier");
    let err = mult
        .create_component(
            base_with_ports(1, &["in", "out"]),
            &Params::new().with("factor", "0"),
        )
        .err()
        .expect("factory rejects zero");
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}

#[test]
fn creating_with_the_wrong_kind_is_an_error() {
    let registry = builtin_registry().expect("registry");
    let adder = registry.component("demo", "Adder").expect("Adder");
    let mut owner = base_with_ports(1, &[]);
    assert!(matches!(
        adder.create_subcomponent(&mut owner, &Params::new()),
        Err(ConfigError::WrongKind { expected: "subcomponent", .. })
    ));
}

#[test]
fn defaults_are_filled_before_construction() {
    let info = ElementInfo::component::<Pinger>();
    let resolved = info
        .resolve_params(&Params::new().with("rounds", "5"))
        .expect("resolve");
    assert_eq!(resolved.get("rounds"), Some("5"));
    assert_eq!(resolved.get("clock"), Some("1GHz"));
    assert_eq!(resolved.get("delay"), Some("0"));
}

#[test]
fn declared_metadata_keeps_registration_order() {
    let info = ElementInfo::component::<Probe>();

    assert_eq!(info.params().len(), 1);
    assert_eq!(info.params()[0].name, "clock");
    assert_eq!(info.params()[0].default.as_deref(), Some("1GHz"));
    assert_eq!(info.params()[0].description, None);

    assert_eq!(info.stats().len(), 1);
    assert_eq!(info.stats()[0].name, "count");
    assert_eq!(info.stats()[0].units.as_deref(), Some("events"));
    assert_eq!(info.stats()[0].enable_level, 1);
    assert_eq!(info.stats()[0].description, None);

    assert_eq!(info.ports().len(), 1);
    assert_eq!(info.ports()[0].name, "in");
    assert_eq!(info.ports()[0].description, None);
    assert!(info.has_port("in"));
    assert!(!info.has_port("out"));
}

#[test]
fn printing_uses_placeholders_for_absent_fields() {
    let text = ElementInfo::component::<Probe>().to_string();
    assert!(text.starts_with("    Probe: metadata only\n"), "{text}");
    assert!(text.contains("    Parameters (1 total):\n      clock: <empty> (1GHz)\n"));
    assert!(text.contains("      count: <empty> (events).  Enable level = 1\n"));
    assert!(text.contains("    Ports (1 total):\n      in: <empty>\n"));

    let sub = ElementInfo::subcomponent::<Accumulator>().to_string();
    assert!(sub.contains("    Interface: demo.Reducer\n"));
    assert!(!sub.contains("Ports"));
}

#[test]
fn subcomponents_have_an_interface_and_no_ports() {
    let info = ElementInfo::subcomponent::<Accumulator>();
    assert_eq!(info.kind_tag(), KindTag::SubComponent);
    assert_eq!(info.interface(), Some("demo.Reducer"));
    assert_eq!(info.category(), None);
    assert!(info.ports().is_empty());
}

#[test]
fn descriptors_serialize_with_a_kind_tag() {
    let v: Value = serde_json::to_value(ElementInfo::subcomponent::<Accumulator>()).expect("json");
    assert_eq!(v["kind"], "sub_component");
    assert_eq!(v["interface"], "demo.Reducer");
    assert_eq!(v["strategy"], "constructor");

    let v: Value = serde_json::to_value(ElementInfo::component::<Multiplier>()).expect("json");
    assert_eq!(v["kind"], "component");
    assert_eq!(v["strategy"], "custom_factory");
    assert_eq!(v["category"], Category::PROCESSOR.bits());
    assert_eq!(v["ports"][0]["name"], "in");
}

#[test]
fn categories_combine_as_bit_flags() {
    let c = Category::PROCESSOR | Category::NETWORK;
    assert!(c.contains(Category::PROCESSOR));
    assert!(c.contains(Category::NETWORK));
    assert!(!c.contains(Category::MEMORY));
}
