//! 组件运行时基座
//!
//! 每个组件实例持有一个 `ComponentBase`：身份、独占的链路表、默认时间基准。
//! 所有需要内核协作的操作都显式接收 `&mut dyn KernelServices`。

use std::any::Any;
use std::sync::Arc;

use tracing::{debug, error, trace, warn};

use super::id::ComponentId;
use super::traits::SubComponent;
use crate::eli::KindTag;
use crate::kernel::KernelServices;
use crate::link::{HandlerId, Link, LinkError, LinkEvent, LinkMap};
use crate::params::{ConfigError, Params};
use crate::sim::SimTime;
use crate::time::{TimeConverter, TimeError};

/// 时钟注册结果：除换算器外，列出因传播默认时间基准而被改写的链路。
#[derive(Debug, Clone)]
pub struct ClockRegistration {
    pub converter: Arc<TimeConverter>,
    pub rebound_links: Vec<String>,
}

#[derive(Debug)]
pub struct ComponentBase {
    id: ComponentId,
    name: String,
    links: LinkMap,
    default_time_base: Option<Arc<TimeConverter>>,
}

impl ComponentBase {
    pub fn new(id: ComponentId, name: impl Into<String>, links: LinkMap) -> Self {
        Self {
            id,
            name: name.into(),
            links,
            default_time_base: None,
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn links(&self) -> &LinkMap {
        &self.links
    }

    pub fn links_mut(&mut self) -> &mut LinkMap {
        &mut self.links
    }

    pub fn default_time_base(&self) -> Option<&Arc<TimeConverter>> {
        self.default_time_base.as_ref()
    }

    /// 配置已声明的链路。未声明的名字返回 `None`，不分配任何东西。
    ///
    /// `handler` 为 `None` 时链路成为轮询链路；`time_base` 按先写者胜绑定。
    pub fn configure_link(
        &mut self,
        name: &str,
        time_base: Option<Arc<TimeConverter>>,
        handler: Option<HandlerId>,
    ) -> Option<&mut Link> {
        let Some(link) = self.links.get_link_mut(name) else {
            debug!(component = %self.name, link = name, "配置未声明的链路");
            return None;
        };
        link.set_handler(handler);
        link.set_default_time_base(time_base);
        Some(link)
    }

    /// 同 `configure_link`，时间基准以单位字符串给出（如 `"1ns"`）
    pub fn configure_link_with_base(
        &mut self,
        name: &str,
        time_base: &str,
        handler: Option<HandlerId>,
        kernel: &mut dyn KernelServices,
    ) -> Result<Option<&mut Link>, TimeError> {
        let tc = kernel.time_lord().converter(time_base)?;
        Ok(self.configure_link(name, Some(tc), handler))
    }

    /// 添加零延迟自链路。
    ///
    /// # Panics
    ///
    /// 名字已存在于链路表时 panic：自链路不能遮蔽已声明的端口，这是模型缺陷。
    pub fn add_self_link(&mut self, name: &str) {
        if self.links.contains(name) {
            error!(component = %self.name, link = name, "自链路名字重复");
            panic!(
                "component `{}` attempted to add self link with duplicate name `{name}`",
                self.name
            );
        }
        let mut link = Link::self_link(name);
        link.set_default_time_base(self.default_time_base.clone());
        self.links.insert_link(link);
        trace!(component = %self.name, link = name, "添加自链路");
    }

    /// `add_self_link` + `configure_link`
    pub fn configure_self_link(
        &mut self,
        name: &str,
        time_base: Option<Arc<TimeConverter>>,
        handler: Option<HandlerId>,
    ) -> &mut Link {
        self.add_self_link(name);
        self.configure_link(name, time_base, handler)
            .expect("self link was just inserted")
    }

    /// 注册时钟。`propagate` 为真时，该换算器成为组件默认时间基准，
    /// 并绑定到所有尚无时间基准的链路。
    pub fn register_clock(
        &mut self,
        freq: &str,
        handler: HandlerId,
        propagate: bool,
        kernel: &mut dyn KernelServices,
    ) -> Result<Arc<TimeConverter>, TimeError> {
        Ok(self
            .register_clock_reporting(freq, handler, propagate, kernel)?
            .converter)
    }

    /// 同 `register_clock`，同时返回被改写的链路名
    pub fn register_clock_reporting(
        &mut self,
        freq: &str,
        handler: HandlerId,
        propagate: bool,
        kernel: &mut dyn KernelServices,
    ) -> Result<ClockRegistration, TimeError> {
        let converter = kernel.register_clock(self.id, freq, handler)?;
        let rebound_links = if propagate {
            self.propagate_time_base(&converter)
        } else {
            Vec::new()
        };
        debug!(component = %self.name, freq, propagate, rebound = rebound_links.len(), "⏰ 注册时钟");
        Ok(ClockRegistration {
            converter,
            rebound_links,
        })
    }

    /// 注册时间基准（不产生时钟），传播规则同 `register_clock`
    pub fn register_time_base(
        &mut self,
        base: &str,
        propagate: bool,
        kernel: &mut dyn KernelServices,
    ) -> Result<Arc<TimeConverter>, TimeError> {
        let tc = kernel.time_lord().converter(base)?;
        if propagate {
            self.propagate_time_base(&tc);
        }
        Ok(tc)
    }

    fn propagate_time_base(&mut self, tc: &Arc<TimeConverter>) -> Vec<String> {
        let mut rebound = Vec::new();
        for link in self.links.iter_mut() {
            if link.set_default_time_base(Some(Arc::clone(tc))) {
                rebound.push(link.name().to_string());
            }
        }
        self.default_time_base = Some(Arc::clone(tc));
        rebound
    }

    /// 当前时间，以 `tc` 的粒度表示。无副作用。
    pub fn current_sim_time(&self, tc: &TimeConverter, kernel: &dyn KernelServices) -> u64 {
        tc.from_core(kernel.core_tick())
    }

    /// 当前时间，以单位字符串给出的粒度表示
    pub fn current_sim_time_in(
        &self,
        base: &str,
        kernel: &mut dyn KernelServices,
    ) -> Result<u64, TimeError> {
        let tc = kernel.time_lord().converter(base)?;
        Ok(tc.from_core(kernel.core_tick()))
    }

    pub fn current_sim_time_nano(&self, kernel: &mut dyn KernelServices) -> Result<u64, TimeError> {
        let tc = kernel.time_lord().nano()?;
        Ok(tc.from_core(kernel.core_tick()))
    }

    pub fn current_sim_time_micro(&self, kernel: &mut dyn KernelServices) -> Result<u64, TimeError> {
        let tc = kernel.time_lord().micro()?;
        Ok(tc.from_core(kernel.core_tick()))
    }

    pub fn current_sim_time_milli(&self, kernel: &mut dyn KernelServices) -> Result<u64, TimeError> {
        let tc = kernel.time_lord().milli()?;
        Ok(tc.from_core(kernel.core_tick()))
    }

    /// 声明本组件尚未完成：退出引用计数 +1
    pub fn register_exit(&self, kernel: &mut dyn KernelServices) -> bool {
        kernel.increment_exit_refs(self.id)
    }

    /// 撤销一次 `register_exit`。没有配对的注册时返回 `false`。
    pub fn unregister_exit(&self, kernel: &mut dyn KernelServices) -> bool {
        let ok = kernel.decrement_exit_refs(self.id);
        if !ok {
            warn!(component = %self.name, "unregister_exit 没有配对的 register_exit");
        }
        ok
    }

    /// 经由指定链路发送负载，`delay` 为链路时间基准下的额外延迟
    pub fn send<T: Any + Send>(
        &self,
        link: &str,
        delay: u64,
        payload: T,
        kernel: &mut dyn KernelServices,
    ) -> Result<SimTime, LinkError> {
        let l = self
            .links
            .get_link(link)
            .ok_or_else(|| LinkError::NotFound(link.to_string()))?;
        l.send(self.id, delay, Box::new(payload), kernel)
    }

    /// 从轮询链路取下一个事件
    pub fn poll(&mut self, link: &str) -> Option<LinkEvent> {
        self.links.get_link_mut(link)?.poll()
    }

    /// 按 `library.name` 加载一个隶属于本组件的子组件
    pub fn load_subcomponent(
        &mut self,
        type_name: &str,
        params: &Params,
        kernel: &dyn KernelServices,
    ) -> Result<Box<dyn SubComponent>, ConfigError> {
        let info = kernel
            .registry()
            .lookup_type(type_name, KindTag::SubComponent)
            .ok_or_else(|| ConfigError::UnknownElement(type_name.to_string()))?;
        info.create_subcomponent(self, params)
    }
}
