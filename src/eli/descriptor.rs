//! 元件描述符
//!
//! 组件与子组件共用一个 `ElementInfo`，用 `ElementKind` 区分：组件额外携带
//! 类别与端口，子组件携带接口名。构造策略在注册时确定并固化。

use std::fmt;
use std::ops::BitOr;

use serde::Serialize;
use tracing::{debug, warn};

use crate::component::{Component, ComponentBase, SubComponent};
use crate::params::{ConfigError, Params};

use super::element::{
    ComponentElement, ComponentFactory, SubComponentElement, SubComponentFactory,
    construct_component, construct_subcomponent,
};
use super::spec::{ParamSpec, PortSpec, StatSpec};

/// 组件类别（可按位组合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Category(u32);

impl Category {
    pub const UNCATEGORIZED: Category = Category(0x00);
    pub const PROCESSOR: Category = Category(0x01);
    pub const MEMORY: Category = Category(0x02);
    pub const NETWORK: Category = Category(0x04);
    pub const SYSTEM: Category = Category(0x08);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: Category) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Category {
    type Output = Category;

    fn bitor(self, rhs: Category) -> Category {
        Category(self.0 | rhs.0)
    }
}

/// 用于查找的种类标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KindTag {
    Component,
    SubComponent,
}

impl fmt::Display for KindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KindTag::Component => f.write_str("component"),
            KindTag::SubComponent => f.write_str("subcomponent"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementKind {
    Component {
        category: Category,
        ports: Vec<PortSpec>,
    },
    SubComponent {
        interface: String,
    },
}

/// 构造策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateStrategy {
    /// 调用类型的普通构造函数
    Constructor,
    /// 调用类型声明的自定义工厂
    CustomFactory,
}

#[derive(Clone, Copy)]
enum Factory {
    Component(ComponentFactory),
    SubComponent(SubComponentFactory),
}

/// 一个具体元件类型的元数据与构造契约。注册后不可变，可跨线程共享。
#[derive(Clone, Serialize)]
pub struct ElementInfo {
    name: String,
    library: String,
    description: String,
    params: Vec<ParamSpec>,
    stats: Vec<StatSpec>,
    #[serde(flatten)]
    kind: ElementKind,
    strategy: CreateStrategy,
    #[serde(skip)]
    factory: Factory,
}

impl ElementInfo {
    /// 为组件类型 `T` 生成描述符，同时确定构造策略
    pub fn component<T: ComponentElement>() -> Self {
        let (strategy, factory) = match T::custom_factory() {
            Some(f) => (CreateStrategy::CustomFactory, f),
            None => (
                CreateStrategy::Constructor,
                construct_component::<T> as ComponentFactory,
            ),
        };
        Self {
            name: T::NAME.to_string(),
            library: T::LIBRARY.to_string(),
            description: T::DESCRIPTION.to_string(),
            params: T::params(),
            stats: T::stats(),
            kind: ElementKind::Component {
                category: T::CATEGORY,
                ports: T::ports(),
            },
            strategy,
            factory: Factory::Component(factory),
        }
    }

    /// 为子组件类型 `T` 生成描述符
    pub fn subcomponent<T: SubComponentElement>() -> Self {
        let (strategy, factory) = match T::custom_factory() {
            Some(f) => (CreateStrategy::CustomFactory, f),
            None => (
                CreateStrategy::Constructor,
                construct_subcomponent::<T> as SubComponentFactory,
            ),
        };
        Self {
            name: T::NAME.to_string(),
            library: T::LIBRARY.to_string(),
            description: T::DESCRIPTION.to_string(),
            params: T::params(),
            stats: T::stats(),
            kind: ElementKind::SubComponent {
                interface: T::INTERFACE.to_string(),
            },
            strategy,
            factory: Factory::SubComponent(factory),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn library(&self) -> &str {
        &self.library
    }

    /// `library.name`
    pub fn type_name(&self) -> String {
        format!("{}.{}", self.library, self.name)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn stats(&self) -> &[StatSpec] {
        &self.stats
    }

    /// 子组件没有端口，返回空切片
    pub fn ports(&self) -> &[PortSpec] {
        match &self.kind {
            ElementKind::Component { ports, .. } => ports.as_slice(),
            ElementKind::SubComponent { .. } => &[],
        }
    }

    pub fn category(&self) -> Option<Category> {
        match &self.kind {
            ElementKind::Component { category, .. } => Some(*category),
            ElementKind::SubComponent { .. } => None,
        }
    }

    pub fn interface(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Component { .. } => None,
            ElementKind::SubComponent { interface } => Some(interface.as_str()),
        }
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn kind_tag(&self) -> KindTag {
        match self.kind {
            ElementKind::Component { .. } => KindTag::Component,
            ElementKind::SubComponent { .. } => KindTag::SubComponent,
        }
    }

    pub fn creation_strategy(&self) -> CreateStrategy {
        self.strategy
    }

    pub fn has_port(&self, port: &str) -> bool {
        self.ports().iter().any(|p| p.name == port)
    }

    /// 按参数说明校验：补齐默认值，缺少必需参数时报错，未声明的键只告警。
    pub fn resolve_params(&self, params: &Params) -> Result<Params, ConfigError> {
        let mut resolved = params.clone();
        for spec in &self.params {
            if resolved.contains(&spec.name) {
                continue;
            }
            match &spec.default {
                Some(default) => {
                    resolved.insert(spec.name.clone(), default.clone());
                }
                None => {
                    return Err(ConfigError::MissingParam {
                        element: self.type_name(),
                        param: spec.name.clone(),
                    });
                }
            }
        }
        for key in params.keys() {
            if !self.params.iter().any(|s| s.name == key) {
                warn!(element = %self.type_name(), key, "未声明的参数");
            }
        }
        Ok(resolved)
    }

    /// 构造组件实例
    pub fn create_component(
        &self,
        base: ComponentBase,
        params: &Params,
    ) -> Result<Box<dyn Component>, ConfigError> {
        let Factory::Component(factory) = self.factory else {
            return Err(ConfigError::WrongKind {
                element: self.type_name(),
                expected: "component",
            });
        };
        let params = self.resolve_params(params)?;
        debug!(element = %self.type_name(), id = %base.id(), strategy = ?self.strategy, "🏗️  构造组件");
        factory(base, &params)
    }

    /// 构造隶属于 `owner` 的子组件实例
    pub fn create_subcomponent(
        &self,
        owner: &mut ComponentBase,
        params: &Params,
    ) -> Result<Box<dyn SubComponent>, ConfigError> {
        let Factory::SubComponent(factory) = self.factory else {
            return Err(ConfigError::WrongKind {
                element: self.type_name(),
                expected: "subcomponent",
            });
        };
        let params = self.resolve_params(params)?;
        debug!(element = %self.type_name(), owner = %owner.id(), strategy = ?self.strategy, "🏗️  构造子组件");
        factory(owner, &params)
    }
}

impl fmt::Debug for ElementInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementInfo")
            .field("library", &self.library)
            .field("name", &self.name)
            .field("kind", &self.kind_tag())
            .field("strategy", &self.strategy)
            .finish()
    }
}

impl fmt::Display for ElementInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "    {}: {}", self.name, self.description)?;
        if let Some(interface) = self.interface() {
            writeln!(f, "    Interface: {interface}")?;
        }
        writeln!(f, "    Parameters ({} total):", self.params.len())?;
        for p in &self.params {
            writeln!(f, "      {p}")?;
        }
        writeln!(f, "    Statistics ({} total):", self.stats.len())?;
        for s in &self.stats {
            writeln!(f, "      {s}")?;
        }
        if let ElementKind::Component { ports, .. } = &self.kind {
            writeln!(f, "    Ports ({} total):", ports.len())?;
            for p in ports {
                writeln!(f, "      {p}")?;
            }
        }
        Ok(())
    }
}

