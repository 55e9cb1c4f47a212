//! 链路
//!
//! 组件间带时间语义的通信端点、链路表与链路事件。

mod event;
#[allow(clippy::module_inception)]
mod link;
mod link_map;

pub use event::LinkEvent;
pub use link::{HandlerId, Link, LinkError, LinkKind, LinkPeer, LinkTarget};
pub use link_map::LinkMap;
