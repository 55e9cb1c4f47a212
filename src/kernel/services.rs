//! 内核协作接口
//!
//! 组件运行时需要的全部内核服务。单 rank 的 `Kernel` 通过 `KernelCtx` 实现它，
//! 测试可以用自己的替身实现。

use std::sync::Arc;

use crate::component::ComponentId;
use crate::eli::ElementRegistry;
use crate::link::{HandlerId, LinkEvent, LinkTarget};
use crate::sim::SimTime;
use crate::time::{TimeConverter, TimeError, TimeLord};

pub trait KernelServices {
    /// 当前 core tick
    fn core_tick(&self) -> SimTime;

    /// 时间权威
    fn time_lord(&mut self) -> &mut TimeLord;

    /// 只读的元件库数据库
    fn registry(&self) -> &ElementRegistry;

    /// 为组件 `id` 注册时钟，返回时钟周期对应的换算器
    fn register_clock(
        &mut self,
        id: ComponentId,
        freq: &str,
        handler: HandlerId,
    ) -> Result<Arc<TimeConverter>, TimeError>;

    fn increment_exit_refs(&mut self, id: ComponentId) -> bool;

    /// 没有配对的 increment 时返回 `false`，且不改变计数
    fn decrement_exit_refs(&mut self, id: ComponentId) -> bool;

    /// 在 `at` 把事件投递到 `target`
    fn schedule_delivery(&mut self, at: SimTime, target: LinkTarget, event: LinkEvent);
}
