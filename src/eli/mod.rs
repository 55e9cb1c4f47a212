//! 元件库信息（Element Library Info）
//!
//! 自描述的插件注册表：元件类型声明名字、参数、统计量、端口与构造方式，
//! 内核只通过描述符与之交互，不需要在编译期知道具体类型。

mod descriptor;
mod element;
mod registry;
mod spec;

pub use descriptor::{Category, CreateStrategy, ElementInfo, ElementKind, KindTag};
pub use element::{ComponentElement, ComponentFactory, SubComponentElement, SubComponentFactory};
pub use registry::{DuplicatePolicy, ElementLibrary, ElementRegistry, LibraryInfo, RegistryError};
pub use spec::{ParamSpec, PortSpec, StatSpec};
