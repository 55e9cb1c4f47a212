//! 链路类型
//!
//! 组件链路表中的一个具名端点。有处理器的链路在投递时回调组件；没有处理器的
//! 是轮询链路，事件排队等待组件主动 `poll`。

use std::any::Any;
use std::collections::VecDeque;
use std::sync::Arc;

use thiserror::Error;
use tracing::trace;

use super::event::LinkEvent;
use crate::component::ComponentId;
use crate::kernel::KernelServices;
use crate::sim::SimTime;
use crate::time::TimeConverter;

/// 组件内的事件处理器编号。投递时原样交回 `Component::handle_event`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(pub u32);

/// 投递目标：某个组件链路表中的某条链路
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkTarget {
    pub component: ComponentId,
    pub link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// 端口声明的组件间链路
    Port,
    /// 零延迟回环链路，用于组件给自己调度事件
    SelfLink,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkPeer {
    Unconnected,
    Remote(LinkTarget),
    Loopback,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("link `{0}` is not declared")]
    NotFound(String),
    #[error("link `{0}` has no time base")]
    NoTimeBase(String),
    #[error("link `{0}` is not connected")]
    Unconnected(String),
}

#[derive(Debug)]
pub struct Link {
    name: String,
    kind: LinkKind,
    handler: Option<HandlerId>,
    polling: bool,
    time_base: Option<Arc<TimeConverter>>,
    /// core tick 表示的传输延迟
    latency: SimTime,
    peer: LinkPeer,
    queue: VecDeque<LinkEvent>,
}

impl Link {
    /// 端口链路，等待内核连线
    pub fn port(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: LinkKind::Port,
            handler: None,
            polling: true,
            time_base: None,
            latency: SimTime::ZERO,
            peer: LinkPeer::Unconnected,
            queue: VecDeque::new(),
        }
    }

    /// 零延迟自链路
    pub fn self_link(name: impl Into<String>) -> Self {
        Self {
            kind: LinkKind::SelfLink,
            peer: LinkPeer::Loopback,
            ..Self::port(name)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> LinkKind {
        self.kind
    }

    pub fn handler(&self) -> Option<HandlerId> {
        self.handler
    }

    pub fn is_polling(&self) -> bool {
        self.polling
    }

    /// 绑定处理器；`None` 表示轮询链路
    pub fn set_handler(&mut self, handler: Option<HandlerId>) {
        self.handler = handler;
        self.polling = handler.is_none();
    }

    pub fn set_polling(&mut self) {
        self.set_handler(None);
    }

    pub fn time_base(&self) -> Option<&Arc<TimeConverter>> {
        self.time_base.as_ref()
    }

    /// 先写者胜：已有时间基准时不覆盖。返回是否生效。
    pub fn set_default_time_base(&mut self, tc: Option<Arc<TimeConverter>>) -> bool {
        if self.time_base.is_some() || tc.is_none() {
            return false;
        }
        self.time_base = tc;
        true
    }

    pub fn latency(&self) -> SimTime {
        self.latency
    }

    /// 以时间基准表示的延迟；未绑定时间基准时为 `None`
    pub fn latency_local(&self) -> Option<u64> {
        self.time_base.as_ref().map(|tc| tc.from_core(self.latency))
    }

    pub(crate) fn set_latency(&mut self, latency: SimTime) {
        self.latency = latency;
    }

    pub fn peer(&self) -> &LinkPeer {
        &self.peer
    }

    pub(crate) fn set_peer(&mut self, peer: LinkPeer) {
        self.peer = peer;
    }

    pub fn is_connected(&self) -> bool {
        self.peer != LinkPeer::Unconnected
    }

    /// 发送：投递时刻 = 当前 tick + 链路延迟 + `delay`（本地单位）。
    pub fn send(
        &self,
        owner: ComponentId,
        delay: u64,
        payload: Box<dyn Any + Send>,
        kernel: &mut dyn KernelServices,
    ) -> Result<SimTime, LinkError> {
        let tb = self
            .time_base
            .as_ref()
            .ok_or_else(|| LinkError::NoTimeBase(self.name.clone()))?;
        let target = match &self.peer {
            LinkPeer::Remote(t) => t.clone(),
            LinkPeer::Loopback => LinkTarget {
                component: owner,
                link: self.name.clone(),
            },
            LinkPeer::Unconnected => return Err(LinkError::Unconnected(self.name.clone())),
        };

        let at = kernel
            .core_tick()
            .saturating_add(self.latency)
            .saturating_add(tb.to_core(delay));
        trace!(link = %self.name, ?target, at = %at, "发送链路事件");

        let mut ev = LinkEvent::new(owner, self.name.clone(), payload);
        ev.set_delivery_time(at);
        kernel.schedule_delivery(at, target, ev);
        Ok(at)
    }

    /// 接收端：有处理器时交回 (处理器, 事件)，轮询链路则入队。
    pub(crate) fn accept(&mut self, ev: LinkEvent) -> Option<(HandlerId, LinkEvent)> {
        match self.handler {
            Some(h) => Some((h, ev)),
            None => {
                self.queue.push_back(ev);
                None
            }
        }
    }

    /// 轮询链路：取出下一个已到达的事件
    pub fn poll(&mut self) -> Option<LinkEvent> {
        self.queue.pop_front()
    }

    /// 已到达但尚未被取走的事件数
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}
