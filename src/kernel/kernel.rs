//! 单 rank 仿真内核
//!
//! 负责分配组件身份、持有链路表直到组件构造、连线、构造组件，
//! 并把时钟与链路投递建模为 `Simulator` 队列中的事件。

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use super::error::KernelError;
use super::exit::Exit;
use super::graph::GraphSpec;
use super::services::KernelServices;
use crate::component::{Component, ComponentBase, ComponentId};
use crate::eli::{ElementInfo, ElementRegistry, KindTag};
use crate::link::{HandlerId, Link, LinkEvent, LinkMap, LinkPeer, LinkTarget};
use crate::params::Params;
use crate::sim::{CLOCK_PRIORITY, DELIVERY_PRIORITY, Event, SimTime, Simulator, World};
use crate::time::{TimeConverter, TimeError, TimeLord};

/// 组件回调时可见的内核状态
#[derive(Debug)]
pub struct KernelState {
    registry: Arc<ElementRegistry>,
    time_lord: TimeLord,
    exit: Exit,
}

/// 单次回调期间的内核上下文：事件队列 + 内核状态
pub struct KernelCtx<'a> {
    sim: &'a mut Simulator,
    state: &'a mut KernelState,
}

impl<'a> KernelCtx<'a> {
    pub fn new(sim: &'a mut Simulator, state: &'a mut KernelState) -> Self {
        Self { sim, state }
    }
}

impl KernelServices for KernelCtx<'_> {
    fn core_tick(&self) -> SimTime {
        self.sim.now()
    }

    fn time_lord(&mut self) -> &mut TimeLord {
        &mut self.state.time_lord
    }

    fn registry(&self) -> &ElementRegistry {
        &self.state.registry
    }

    fn register_clock(
        &mut self,
        id: ComponentId,
        freq: &str,
        handler: HandlerId,
    ) -> Result<Arc<TimeConverter>, TimeError> {
        let tc = self.state.time_lord.converter(freq)?;
        // 第一拍落在下一个周期整数倍上
        let cycle = tc.from_core(self.sim.now()) + 1;
        let at = tc.to_core(cycle);
        self.sim.schedule_with_priority(
            at,
            CLOCK_PRIORITY,
            ClockTick {
                component: id,
                handler,
                period: tc.period(),
                cycle,
            },
        );
        debug!(component = %id, freq, first_tick = %at, "注册时钟");
        Ok(tc)
    }

    fn increment_exit_refs(&mut self, id: ComponentId) -> bool {
        self.state.exit.ref_inc(id)
    }

    fn decrement_exit_refs(&mut self, id: ComponentId) -> bool {
        let ok = self.state.exit.ref_dec(id);
        if ok && self.state.exit.should_exit() {
            info!(now = %self.sim.now(), "🏁 退出计数归零，结束仿真");
            self.sim.stop();
        }
        ok
    }

    fn schedule_delivery(&mut self, at: SimTime, target: LinkTarget, event: LinkEvent) {
        self.sim
            .schedule_with_priority(at, DELIVERY_PRIORITY, DeliverEvent { target, event });
    }
}

/// 链路事件投递
struct DeliverEvent {
    target: LinkTarget,
    event: LinkEvent,
}

impl Event for DeliverEvent {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let DeliverEvent { target, event } = *self;
        let kernel = world
            .as_any_mut()
            .downcast_mut::<Kernel>()
            .expect("world must be Kernel");
        kernel.deliver(target, event, sim);
    }
}

/// 时钟 tick
#[derive(Debug, Clone)]
struct ClockTick {
    component: ComponentId,
    handler: HandlerId,
    period: SimTime,
    cycle: u64,
}

impl Event for ClockTick {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let kernel = world
            .as_any_mut()
            .downcast_mut::<Kernel>()
            .expect("world must be Kernel");
        kernel.clock_tick(*self, sim);
    }
}

struct PendingComponent {
    id: ComponentId,
    name: String,
    info: Arc<ElementInfo>,
    params: Params,
}

/// 单 rank 内核
pub struct Kernel {
    state: KernelState,
    names: HashMap<String, ComponentId>,
    link_maps: HashMap<ComponentId, LinkMap>,
    pending: Vec<PendingComponent>,
    components: Vec<Box<dyn Component>>,
    next_id: u64,
    built: bool,
}

impl Kernel {
    /// 使用默认 core tick（1ps）
    pub fn new(registry: Arc<ElementRegistry>) -> Self {
        Self::with_time_lord(registry, TimeLord::default())
    }

    pub fn with_core_tick(registry: Arc<ElementRegistry>, core_tick: &str) -> Result<Self, KernelError> {
        Ok(Self::with_time_lord(registry, TimeLord::new(core_tick)?))
    }

    fn with_time_lord(registry: Arc<ElementRegistry>, time_lord: TimeLord) -> Self {
        Self {
            state: KernelState {
                registry,
                time_lord,
                exit: Exit::default(),
            },
            names: HashMap::new(),
            link_maps: HashMap::new(),
            pending: Vec::new(),
            components: Vec::new(),
            next_id: 0,
            built: false,
        }
    }

    /// 按图描述构建：声明组件、连线、构造
    pub fn from_graph(registry: Arc<ElementRegistry>, graph: &GraphSpec) -> Result<Self, KernelError> {
        let mut kernel = Self::with_core_tick(registry, &graph.core_tick)?;
        for c in &graph.components {
            kernel.add_component(&c.name, &c.type_name, c.params.clone())?;
        }
        for l in &graph.links {
            kernel.connect(
                &l.name,
                (l.left.component.as_str(), l.left.port.as_str()),
                (l.right.component.as_str(), l.right.port.as_str()),
                &l.latency,
            )?;
        }
        kernel.build()?;
        Ok(kernel)
    }

    pub fn registry(&self) -> &Arc<ElementRegistry> {
        &self.state.registry
    }

    pub fn time_lord_mut(&mut self) -> &mut TimeLord {
        &mut self.state.time_lord
    }

    pub fn exit(&self) -> &Exit {
        &self.state.exit
    }

    /// 已构造的组件数
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// 声明一个组件：分配身份，并按描述符的端口创建链路槽位
    #[tracing::instrument(skip(self, params))]
    pub fn add_component(
        &mut self,
        name: &str,
        type_name: &str,
        params: Params,
    ) -> Result<ComponentId, KernelError> {
        if self.built {
            return Err(KernelError::AlreadyBuilt);
        }
        if self.names.contains_key(name) {
            return Err(KernelError::DuplicateComponent(name.to_string()));
        }
        let info = self
            .state
            .registry
            .lookup_type(type_name, KindTag::Component)
            .ok_or_else(|| KernelError::UnknownElement(type_name.to_string()))?;

        let id = ComponentId(self.next_id);
        self.next_id += 1;

        let mut links = LinkMap::new();
        for port in info.ports() {
            links.insert_link(Link::port(port.name.clone()));
        }
        debug!(id = %id, ports = links.len(), "📦 声明组件");

        self.names.insert(name.to_string(), id);
        self.link_maps.insert(id, links);
        self.pending.push(PendingComponent {
            id,
            name: name.to_string(),
            info,
            params,
        });
        Ok(id)
    }

    pub fn component_id(&self, name: &str) -> Option<ComponentId> {
        self.names.get(name).copied()
    }

    fn target(&self, (component, port): (&str, &str)) -> Result<LinkTarget, KernelError> {
        let id = self
            .component_id(component)
            .ok_or_else(|| KernelError::UnknownComponent(component.to_string()))?;
        Ok(LinkTarget {
            component: id,
            link: port.to_string(),
        })
    }

    fn port_mut(&mut self, component: &str, port: &str) -> Result<&mut Link, KernelError> {
        let id = self
            .component_id(component)
            .ok_or_else(|| KernelError::UnknownComponent(component.to_string()))?;
        self.link_maps
            .get_mut(&id)
            .and_then(|m| m.get_link_mut(port))
            .ok_or_else(|| KernelError::UndeclaredPort {
                component: component.to_string(),
                port: port.to_string(),
            })
    }

    /// 连接两个端口（双向），延迟以单位字符串给出
    #[tracing::instrument(skip(self))]
    pub fn connect(
        &mut self,
        name: &str,
        left: (&str, &str),
        right: (&str, &str),
        latency: &str,
    ) -> Result<(), KernelError> {
        if self.built {
            return Err(KernelError::AlreadyBuilt);
        }
        let latency = self.state.time_lord.converter(latency)?.period();

        for (component, port) in [left, right] {
            if self.port_mut(component, port)?.is_connected() {
                return Err(KernelError::PortAlreadyConnected {
                    component: component.to_string(),
                    port: port.to_string(),
                });
            }
        }

        let left_target = self.target(left)?;
        let right_target = self.target(right)?;

        let l = self.port_mut(left.0, left.1)?;
        l.set_peer(LinkPeer::Remote(right_target));
        l.set_latency(latency);
        let r = self.port_mut(right.0, right.1)?;
        r.set_peer(LinkPeer::Remote(left_target));
        r.set_latency(latency);

        debug!(latency = %latency, "🔗 连接链路");
        Ok(())
    }

    /// 交出组件的链路表（构造组件时使用）
    pub fn take_link_map(&mut self, id: ComponentId) -> LinkMap {
        self.link_maps.remove(&id).unwrap_or_default()
    }

    /// 按声明顺序构造所有组件
    #[tracing::instrument(skip(self))]
    pub fn build(&mut self) -> Result<(), KernelError> {
        if self.built {
            return Err(KernelError::AlreadyBuilt);
        }
        self.built = true;
        let pending = std::mem::take(&mut self.pending);
        for p in pending {
            let links = self.take_link_map(p.id);
            let base = ComponentBase::new(p.id, p.name.clone(), links);
            let component = p
                .info
                .create_component(base, &p.params)
                .map_err(|source| KernelError::Construct {
                    component: p.name.clone(),
                    source,
                })?;
            trace!(id = %p.id, name = %p.name, element = %p.info.type_name(), "组件已构造");
            self.components.push(component);
        }
        info!(components = self.components.len(), "✅ 组件构造完成");
        Ok(())
    }

    /// 仿真开始前调用每个组件的 `setup`
    pub fn setup(&mut self, sim: &mut Simulator) {
        let mut ctx = KernelCtx::new(sim, &mut self.state);
        for c in self.components.iter_mut() {
            c.setup(&mut ctx);
        }
    }

    /// 仿真结束后调用每个组件的 `finish`
    pub fn finish(&mut self, sim: &mut Simulator) {
        let mut ctx = KernelCtx::new(sim, &mut self.state);
        for c in self.components.iter_mut() {
            c.finish(&mut ctx);
        }
    }

    pub fn component(&self, id: ComponentId) -> Option<&dyn Component> {
        let idx = usize::try_from(id.0).ok()?;
        self.components.get(idx).map(|c| &**c)
    }

    pub fn component_by_name(&self, name: &str) -> Option<&dyn Component> {
        self.component(self.component_id(name)?)
    }

    /// 以具体类型访问组件
    pub fn component_as<T: Component>(&self, name: &str) -> Option<&T> {
        self.component_by_name(name)?.as_any().downcast_ref::<T>()
    }

    #[tracing::instrument(skip(self, event, sim), fields(to = %target.component, link = %target.link))]
    fn deliver(&mut self, target: LinkTarget, event: LinkEvent, sim: &mut Simulator) {
        let idx = usize::try_from(target.component.0).unwrap_or(usize::MAX);
        let Some(comp) = self.components.get_mut(idx) else {
            warn!("投递目标组件不存在，丢弃事件");
            return;
        };
        let Some(link) = comp.base_mut().links_mut().get_link_mut(&target.link) else {
            warn!("投递目标链路不存在，丢弃事件");
            return;
        };
        let Some((handler, event)) = link.accept(event) else {
            trace!("轮询链路，事件入队");
            return;
        };
        let mut ctx = KernelCtx::new(sim, &mut self.state);
        comp.handle_event(handler, event, &mut ctx);
    }

    fn clock_tick(&mut self, tick: ClockTick, sim: &mut Simulator) {
        let idx = usize::try_from(tick.component.0).unwrap_or(usize::MAX);
        let Some(comp) = self.components.get_mut(idx) else {
            return;
        };
        let mut ctx = KernelCtx::new(sim, &mut self.state);
        let done = comp.clock_tick(tick.handler, tick.cycle, &mut ctx);
        if done {
            debug!(component = %tick.component, cycle = tick.cycle, "⏰ 时钟注销");
            return;
        }
        let next = sim.now().saturating_add(tick.period);
        sim.schedule_with_priority(
            next,
            CLOCK_PRIORITY,
            ClockTick {
                cycle: tick.cycle + 1,
                ..tick
            },
        );
    }
}

impl World for Kernel {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
