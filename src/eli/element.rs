//! 元件注册契约
//!
//! 具体元件类型通过实现 `ComponentElement` / `SubComponentElement` 描述自己。
//! 默认通过 `new` 构造；需要自定义实例化（对象池、按参数选择变体等）的类型
//! 覆盖 `custom_factory` 返回自己的工厂函数。注册时只探测一次，结果固化在描述符中。

use crate::component::{Component, ComponentBase, SubComponent};
use crate::params::{ConfigError, Params};

use super::descriptor::Category;
use super::spec::{ParamSpec, PortSpec, StatSpec};

/// 组件工厂：拿到内核分配好身份与链路表的 `ComponentBase`。
pub type ComponentFactory = fn(ComponentBase, &Params) -> Result<Box<dyn Component>, ConfigError>;

/// 子组件工厂：拿到所属组件的 `ComponentBase`。
pub type SubComponentFactory =
    fn(&mut ComponentBase, &Params) -> Result<Box<dyn SubComponent>, ConfigError>;

pub trait ComponentElement: Component + Sized {
    const LIBRARY: &'static str;
    const NAME: &'static str;
    const DESCRIPTION: &'static str;
    const CATEGORY: Category = Category::UNCATEGORIZED;

    fn params() -> Vec<ParamSpec> {
        Vec::new()
    }

    fn stats() -> Vec<StatSpec> {
        Vec::new()
    }

    fn ports() -> Vec<PortSpec> {
        Vec::new()
    }

    /// 普通构造。`params` 已按 `params()` 校验并补齐默认值。
    fn new(base: ComponentBase, params: &Params) -> Result<Self, ConfigError>;

    /// 可选的自定义工厂
    fn custom_factory() -> Option<ComponentFactory> {
        None
    }
}

pub trait SubComponentElement: SubComponent + Sized {
    const LIBRARY: &'static str;
    const NAME: &'static str;
    const DESCRIPTION: &'static str;
    const INTERFACE: &'static str;

    fn params() -> Vec<ParamSpec> {
        Vec::new()
    }

    fn stats() -> Vec<StatSpec> {
        Vec::new()
    }

    fn new(owner: &mut ComponentBase, params: &Params) -> Result<Self, ConfigError>;

    fn custom_factory() -> Option<SubComponentFactory> {
        None
    }
}

pub(crate) fn construct_component<T: ComponentElement>(
    base: ComponentBase,
    params: &Params,
) -> Result<Box<dyn Component>, ConfigError> {
    Ok(Box::new(T::new(base, params)?))
}

pub(crate) fn construct_subcomponent<T: SubComponentElement>(
    owner: &mut ComponentBase,
    params: &Params,
) -> Result<Box<dyn SubComponent>, ConfigError> {
    Ok(Box::new(T::new(owner, params)?))
}
