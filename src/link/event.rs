//! 链路事件
//!
//! 组件之间唯一的通信载体。负载是任意 `Send` 值，接收方按需向下转型。

use std::any::Any;
use std::fmt;

use crate::component::ComponentId;
use crate::sim::SimTime;

pub struct LinkEvent {
    src: ComponentId,
    src_link: String,
    delivery_time: SimTime,
    payload: Box<dyn Any + Send>,
}

impl LinkEvent {
    pub fn new(src: ComponentId, src_link: impl Into<String>, payload: Box<dyn Any + Send>) -> Self {
        Self {
            src,
            src_link: src_link.into(),
            delivery_time: SimTime::ZERO,
            payload,
        }
    }

    /// 发送方组件
    pub fn src(&self) -> ComponentId {
        self.src
    }

    /// 发送方使用的链路名
    pub fn src_link(&self) -> &str {
        &self.src_link
    }

    /// 投递时刻（core tick）
    pub fn delivery_time(&self) -> SimTime {
        self.delivery_time
    }

    pub(crate) fn set_delivery_time(&mut self, at: SimTime) {
        self.delivery_time = at;
    }

    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// 取出负载；类型不匹配时原样返回事件
    pub fn into_payload<T: Any>(self) -> Result<T, LinkEvent> {
        let LinkEvent {
            src,
            src_link,
            delivery_time,
            payload,
        } = self;
        payload.downcast::<T>().map(|b| *b).map_err(|payload| LinkEvent {
            src,
            src_link,
            delivery_time,
            payload,
        })
    }
}

impl fmt::Debug for LinkEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkEvent")
            .field("src", &self.src)
            .field("src_link", &self.src_link)
            .field("delivery_time", &self.delivery_time)
            .finish_non_exhaustive()
    }
}
