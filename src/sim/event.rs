//! 队列事件 trait
//!
//! 队列中的一项可执行动作（时钟 tick、链路投递等）。与组件之间传递的
//! `crate::link::LinkEvent` 不同，这里的事件只对内核可见。

use super::simulator::Simulator;
use super::world::World;

/// 可被调度执行的动作。使用 `self: Box<Self>` 以便执行时取走所有权。
pub trait Event: Send + 'static {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World);
}
