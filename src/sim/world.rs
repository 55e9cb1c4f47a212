//! 世界 trait
//!
//! 事件执行时可访问的可变状态，通常是 `crate::kernel::Kernel`。

use super::simulator::Simulator;
use std::any::Any;

/// 仿真世界：事件通过 `as_any_mut` 向下转型拿到具体类型。
pub trait World: Any {
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// 每个事件执行完后回调一次
    fn on_tick(&mut self, _sim: &mut Simulator) {}
}
