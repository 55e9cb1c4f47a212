//! 组件与子组件接口

use std::any::Any;

use super::base::ComponentBase;
use super::id::ComponentId;
use crate::kernel::KernelServices;
use crate::link::{HandlerId, LinkEvent};

/// 仿真组件。
///
/// 组件之间不共享可变状态：所有交互都经由链路事件，由内核在事件步中同步回调
/// `handle_event` / `clock_tick`。回调不得阻塞。
pub trait Component: Any + Send {
    fn base(&self) -> &ComponentBase;
    fn base_mut(&mut self) -> &mut ComponentBase;

    /// 所有组件构造完成后、仿真开始前调用一次
    fn setup(&mut self, _kernel: &mut dyn KernelServices) {}

    /// 仿真结束后调用一次
    fn finish(&mut self, _kernel: &mut dyn KernelServices) {}

    /// 有处理器的链路上到达事件
    fn handle_event(
        &mut self,
        _handler: HandlerId,
        _event: LinkEvent,
        _kernel: &mut dyn KernelServices,
    ) {
    }

    /// 时钟 tick；返回 `true` 注销该时钟
    fn clock_tick(
        &mut self,
        _handler: HandlerId,
        _cycle: u64,
        _kernel: &mut dyn KernelServices,
    ) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any;
}

/// 隶属于某个组件的子组件，由所属组件持有并驱动。
pub trait SubComponent: Any + Send {
    fn owner(&self) -> ComponentId;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
