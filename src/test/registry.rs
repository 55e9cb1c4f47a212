use std::any::Any;
use std::sync::Arc;
use std::thread;

use crate::component::{Component, ComponentBase, ComponentId};

use super::support::base_with_ports;
use crate::elements::{Adder, DemoLibrary, builtin_registry};
use crate::eli::{
    ComponentElement, CreateStrategy, DuplicatePolicy, ElementInfo, ElementLibrary,
    ElementRegistry, KindTag, RegistryError,
};
use crate::params::{ConfigError, Params};

/// 与 `demo.Adder` 同名的另一个实现
struct ShadowAdder {
    base: ComponentBase,
}

impl Component for ShadowAdder {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ComponentElement for ShadowAdder {
    const LIBRARY: &'static str = "demo";
    const NAME: &'static str = "Adder";
    const DESCRIPTION: &'static str = "shadow";

    fn new(base: ComponentBase, _params: &Params) -> Result<Self, ConfigError> {
        Ok(Self { base })
    }
}

struct Alpha;

impl ElementLibrary for Alpha {
    fn name(&self) -> &str {
        "alpha"
    }

    fn register(&self, registry: &mut ElementRegistry) -> Result<(), RegistryError> {
        registry.add_component::<ShadowAdder>()?;
        Ok(())
    }
}

struct Zeta;

impl ElementLibrary for Zeta {
    fn name(&self) -> &str {
        "zeta"
    }

    fn register(&self, registry: &mut ElementRegistry) -> Result<(), RegistryError> {
        registry.add_component::<Adder>()?;
        Ok(())
    }
}

#[test]
fn registering_twice_overwrites_instead_of_duplicating() {
    let mut registry = ElementRegistry::new();
    assert_eq!(registry.policy(), DuplicatePolicy::Warn);

    registry.add_component::<Adder>().expect("first");
    assert_eq!(registry.len(), 1);
    let second = registry.add_component::<ShadowAdder>().expect("second");
    assert_eq!(registry.len(), 1);

    let found = registry.component("demo", "Adder").expect("Adder");
    assert!(Arc::ptr_eq(&found, &second));
    assert_eq!(found.description(), "shadow");
}

#[test]
fn reject_policy_keeps_the_first_descriptor() {
    let mut registry = ElementRegistry::with_policy(DuplicatePolicy::Reject);
    let first = registry.add_component::<Adder>().expect("first");

    assert_eq!(
        registry.add_component::<ShadowAdder>().err(),
        Some(RegistryError::Duplicate {
            library: "demo".to_string(),
            name: "Adder".to_string(),
            kind: KindTag::Component,
        })
    );
    let found = registry.component("demo", "Adder").expect("Adder");
    assert!(Arc::ptr_eq(&found, &first));
}

#[test]
fn components_and_subcomponents_live_in_separate_tables() {
    let registry = builtin_registry().expect("registry");
    assert!(registry.component("demo", "Accumulator").is_none());
    assert!(registry.subcomponent("demo", "Accumulator").is_some());
    assert!(registry.subcomponent("demo", "Adder").is_none());

    assert!(registry.lookup_type("demo.Pinger", KindTag::Component).is_some());
    assert!(registry.lookup_type("Pinger", KindTag::Component).is_none());
    assert!(registry.lookup_type("other.Pinger", KindTag::Component).is_none());

    let lib = registry.library("demo").expect("demo");
    let names: Vec<&str> = lib.components().map(|i| i.name()).collect();
    assert_eq!(names, ["Adder", "Multiplier", "Pinger", "Ponger"]);
    assert_eq!(lib.subcomponents().count(), 1);
}

#[test]
fn descriptor_kind_must_match_the_table() {
    let mut registry = ElementRegistry::new();
    let err = registry
        .register_subcomponent(ElementInfo::component::<Adder>())
        .err()
        .expect("wrong kind");
    assert!(matches!(
        err,
        RegistryError::WrongKind {
            expected: KindTag::SubComponent,
            actual: KindTag::Component,
            ..
        }
    ));
    assert!(registry.is_empty());
}

#[test]
fn bootstrap_runs_libraries_in_name_order() {
    // alpha 先注册 ShadowAdder，zeta 后注册 Adder 覆盖之，与传入顺序无关
    for libs in [
        [&Alpha as &dyn ElementLibrary, &Zeta],
        [&Zeta as &dyn ElementLibrary, &Alpha],
    ] {
        let registry = ElementRegistry::bootstrap(&libs, DuplicatePolicy::Warn).expect("bootstrap");
        let adder = registry.component("demo", "Adder").expect("Adder");
        assert_eq!(adder.creation_strategy(), CreateStrategy::Constructor);
        assert_ne!(adder.description(), "shadow");
    }
}

#[test]
fn bootstrap_with_reject_surfaces_conflicts() {
    let err = ElementRegistry::bootstrap(&[&DemoLibrary as &dyn ElementLibrary, &Zeta], DuplicatePolicy::Reject)
        .err()
        .expect("conflict");
    assert!(matches!(err, RegistryError::Duplicate { .. }));
}

#[test]
fn database_printout_lists_libraries_and_elements() {
    let registry = builtin_registry().expect("registry");
    let text = registry.to_string();
    assert!(text.starts_with("library : demo\n  Components: \n"), "{text}");
    assert!(text.contains("    Adder: Adds a constant to every integer it receives\n"));
    assert!(text.contains("  SubComponents: \n    Accumulator: "));
}

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn registry_and_descriptors_are_send_sync() {
    assert_send_sync::<ElementRegistry>();
    assert_send_sync::<ElementInfo>();
    assert_send_sync::<Arc<ElementRegistry>>();
    assert_send_sync::<Arc<ElementInfo>>();
}

#[test]
fn shared_registry_serves_lookups_from_many_threads() {
    let registry = Arc::new(builtin_registry().expect("registry"));

    thread::scope(|s| {
        for id in 0..8u64 {
            let registry = Arc::clone(&registry);
            s.spawn(move || {
                let adder = registry
                    .lookup("demo", "Adder", KindTag::Component)
                    .expect("Adder");
                assert_eq!(adder.name(), "Adder");
                assert!(registry
                    .lookup_type("demo.Accumulator", KindTag::SubComponent)
                    .is_some());

                let mul = registry
                    .lookup_type("demo.Multiplier", KindTag::Component)
                    .expect("Multiplier");
                let c = mul
                    .create_component(
                        base_with_ports(id, &["in", "out"]),
                        &Params::new().with("factor", "2"),
                    )
                    .expect("create");
                assert_eq!(c.base().id(), ComponentId(id));
            });
        }
    });

    // 只读共享，结束后各表不变
    assert_eq!(Arc::strong_count(&registry), 1);
    assert!(registry.component("demo", "Multiplier").is_some());
}
