//! 内置元件库 `demo`
//!
//! 几个小元件，覆盖两种构造策略、端口连线、时钟、自链路、轮询链路、
//! 子组件加载与退出计数。`eli_info`、`graph_sim`、`ping_pong` 都基于它。

mod accumulator;
mod arith;
mod ping_pong;

pub use accumulator::Accumulator;
pub use arith::{Adder, Multiplier};
pub use ping_pong::{Ping, Pinger, Pong, Ponger};

use crate::eli::{DuplicatePolicy, ElementLibrary, ElementRegistry, RegistryError};

pub const DEMO_LIBRARY: &str = "demo";

/// `demo` 库的注册入口
#[derive(Debug, Default, Clone, Copy)]
pub struct DemoLibrary;

impl ElementLibrary for DemoLibrary {
    fn name(&self) -> &str {
        DEMO_LIBRARY
    }

    fn register(&self, registry: &mut ElementRegistry) -> Result<(), RegistryError> {
        registry.add_component::<Adder>()?;
        registry.add_component::<Multiplier>()?;
        registry.add_component::<Pinger>()?;
        registry.add_component::<Ponger>()?;
        registry.add_subcomponent::<Accumulator>()?;
        Ok(())
    }
}

/// 只含内置库的元件数据库；重复注册直接报错
pub fn builtin_registry() -> Result<ElementRegistry, RegistryError> {
    ElementRegistry::bootstrap(&[&DemoLibrary], DuplicatePolicy::Reject)
}
