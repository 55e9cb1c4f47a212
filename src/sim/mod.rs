//! 仿真核心模块
//!
//! 单 rank 的顺序事件队列。内核（`crate::kernel`）把时钟与链路投递建模为
//! 此队列中的事件；跨 rank 的同步算法不在本 crate 范围内。

// 子模块声明
mod event;
mod scheduled_event;
mod simulator;
mod time;
mod world;

// 重新导出公共接口
pub use event::Event;
pub use scheduled_event::{CLOCK_PRIORITY, DEFAULT_PRIORITY, DELIVERY_PRIORITY, ScheduledEvent};
pub use simulator::Simulator;
pub use time::SimTime;
pub use world::World;
