//! 组件运行时
//!
//! 组件身份、运行时基座（链路表、默认时间基准、时钟、自链路、退出计数）
//! 以及组件/子组件接口。

mod base;
mod id;
mod traits;

pub use base::{ClockRegistration, ComponentBase};
pub use id::ComponentId;
pub use traits::{Component, SubComponent};
