//! 仿真内核
//!
//! 单 rank 内核：组件构造、连线、时钟、链路投递与退出计数。

mod error;
mod exit;
mod graph;
#[allow(clippy::module_inception)]
mod kernel;
mod services;

pub use error::KernelError;
pub use exit::Exit;
pub use graph::{ComponentSpec, EndpointSpec, GraphSpec, LinkSpec};
pub use kernel::{Kernel, KernelCtx, KernelState};
pub use services::KernelServices;
