//! 测试替身与小工具

use std::any::Any;
use std::sync::Arc;

use crate::component::{Component, ComponentBase, ComponentId};
use crate::elements::DemoLibrary;
use crate::eli::{
    ComponentElement, DuplicatePolicy, ElementRegistry, ParamSpec, PortSpec, StatSpec,
};
use crate::kernel::{Exit, KernelServices};
use crate::link::{HandlerId, Link, LinkEvent, LinkMap, LinkTarget};
use crate::params::{ConfigError, Params};
use crate::sim::SimTime;
use crate::time::{TimeConverter, TimeError, TimeLord};

/// 记录所有调用的 `KernelServices` 实现
pub(crate) struct FakeKernel {
    pub now: SimTime,
    pub lord: TimeLord,
    pub registry: ElementRegistry,
    pub exit: Exit,
    pub clocks: Vec<(ComponentId, String, HandlerId)>,
    pub deliveries: Vec<(SimTime, LinkTarget, LinkEvent)>,
}

impl Default for FakeKernel {
    fn default() -> Self {
        Self {
            now: SimTime::ZERO,
            lord: TimeLord::default(),
            registry: ElementRegistry::bootstrap(&[&DemoLibrary], DuplicatePolicy::Reject)
                .expect("demo registry"),
            exit: Exit::default(),
            clocks: Vec::new(),
            deliveries: Vec::new(),
        }
    }
}

impl KernelServices for FakeKernel {
    fn core_tick(&self) -> SimTime {
        self.now
    }

    fn time_lord(&mut self) -> &mut TimeLord {
        &mut self.lord
    }

    fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    fn register_clock(
        &mut self,
        id: ComponentId,
        freq: &str,
        handler: HandlerId,
    ) -> Result<Arc<TimeConverter>, TimeError> {
        let tc = self.lord.converter(freq)?;
        self.clocks.push((id, freq.to_string(), handler));
        Ok(tc)
    }

    fn increment_exit_refs(&mut self, id: ComponentId) -> bool {
        self.exit.ref_inc(id)
    }

    fn decrement_exit_refs(&mut self, id: ComponentId) -> bool {
        self.exit.ref_dec(id)
    }

    fn schedule_delivery(&mut self, at: SimTime, target: LinkTarget, event: LinkEvent) {
        self.deliveries.push((at, target, event));
    }
}

/// 带若干端口链路的组件基座
pub(crate) fn base_with_ports(id: u64, ports: &[&str]) -> ComponentBase {
    let mut links = LinkMap::new();
    for port in ports {
        links.insert_link(Link::port(*port));
    }
    ComponentBase::new(ComponentId(id), format!("comp{id}"), links)
}

/// 只声明元数据的最小组件
pub(crate) struct Probe {
    base: ComponentBase,
}

impl Component for Probe {
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

impl ComponentElement for Probe {
    const LIBRARY: &'static str = "probe";
    const NAME: &'static str = "Probe";
    const DESCRIPTION: &'static str = "metadata only";

    fn params() -> Vec<ParamSpec> {
        vec![ParamSpec::new("clock").default_value("1GHz")]
    }

    fn stats() -> Vec<StatSpec> {
        vec![StatSpec::new("count").units("events").enable_level(1)]
    }

    fn ports() -> Vec<PortSpec> {
        vec![PortSpec::new("in")]
    }

    fn new(base: ComponentBase, _params: &Params) -> Result<Self, ConfigError> {
        Ok(Self { base })
    }
}
