//! 元件库数据库
//!
//! 库名 -> 库；每个库内组件与子组件各有一张独立的名字表。库在首次引用时创建。
//! 注册只发生在启动阶段（`bootstrap`），之后以 `Arc<ElementRegistry>` 只读共享。

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::descriptor::{ElementInfo, KindTag};
use super::element::{ComponentElement, SubComponentElement};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{kind} `{library}.{name}` is already registered")]
    Duplicate {
        library: String,
        name: String,
        kind: KindTag,
    },
    #[error("`{library}.{name}` is a {actual}, expected a {expected}")]
    WrongKind {
        library: String,
        name: String,
        expected: KindTag,
        actual: KindTag,
    },
}

/// 重复注册 (library, name) 时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// 覆盖旧条目并告警
    #[default]
    Warn,
    /// 保留旧条目并返回 `RegistryError::Duplicate`
    Reject,
}

/// 一个元件库
#[derive(Debug, Default)]
pub struct LibraryInfo {
    name: String,
    components: BTreeMap<String, Arc<ElementInfo>>,
    subcomponents: BTreeMap<String, Arc<ElementInfo>>,
}

impl LibraryInfo {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn component(&self, name: &str) -> Option<&Arc<ElementInfo>> {
        self.components.get(name)
    }

    pub fn subcomponent(&self, name: &str) -> Option<&Arc<ElementInfo>> {
        self.subcomponents.get(name)
    }

    pub fn components(&self) -> impl Iterator<Item = &Arc<ElementInfo>> {
        self.components.values()
    }

    pub fn subcomponents(&self) -> impl Iterator<Item = &Arc<ElementInfo>> {
        self.subcomponents.values()
    }

    fn table_mut(&mut self, kind: KindTag) -> &mut BTreeMap<String, Arc<ElementInfo>> {
        match kind {
            KindTag::Component => &mut self.components,
            KindTag::SubComponent => &mut self.subcomponents,
        }
    }

    fn table(&self, kind: KindTag) -> &BTreeMap<String, Arc<ElementInfo>> {
        match kind {
            KindTag::Component => &self.components,
            KindTag::SubComponent => &self.subcomponents,
        }
    }
}

impl fmt::Display for LibraryInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Components: ")?;
        for info in self.components.values() {
            writeln!(f, "{info}")?;
        }
        writeln!(f, "  SubComponents: ")?;
        for info in self.subcomponents.values() {
            writeln!(f, "{info}")?;
        }
        Ok(())
    }
}

/// 元件库的注册入口。每个库实现一次，由 `ElementRegistry::bootstrap` 按库名顺序调用。
pub trait ElementLibrary {
    fn name(&self) -> &str;
    fn register(&self, registry: &mut ElementRegistry) -> Result<(), RegistryError>;
}

#[derive(Debug, Default)]
pub struct ElementRegistry {
    libraries: BTreeMap<String, LibraryInfo>,
    policy: DuplicatePolicy,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            libraries: BTreeMap::new(),
            policy,
        }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// 确定性的启动注册：按库名排序后依次调用各库的入口。
    pub fn bootstrap(
        libraries: &[&dyn ElementLibrary],
        policy: DuplicatePolicy,
    ) -> Result<Self, RegistryError> {
        let mut ordered: Vec<&dyn ElementLibrary> = libraries.to_vec();
        ordered.sort_by(|a, b| a.name().cmp(b.name()));

        let mut registry = Self::with_policy(policy);
        for lib in ordered {
            debug!(library = lib.name(), "📚 注册元件库");
            lib.register(&mut registry)?;
        }
        info!(
            libraries = registry.libraries.len(),
            elements = registry.len(),
            "元件库注册完成"
        );
        Ok(registry)
    }

    fn library_mut(&mut self, name: &str) -> &mut LibraryInfo {
        self.libraries
            .entry(name.to_string())
            .or_insert_with(|| LibraryInfo::new(name))
    }

    fn insert(
        &mut self,
        info: ElementInfo,
        expected: KindTag,
    ) -> Result<Arc<ElementInfo>, RegistryError> {
        let actual = info.kind_tag();
        if actual != expected {
            return Err(RegistryError::WrongKind {
                library: info.library().to_string(),
                name: info.name().to_string(),
                expected,
                actual,
            });
        }

        let policy = self.policy;
        let info = Arc::new(info);
        let table = self.library_mut(info.library()).table_mut(expected);
        if table.contains_key(info.name()) {
            match policy {
                DuplicatePolicy::Warn => {
                    warn!(
                        library = info.library(),
                        name = info.name(),
                        kind = %expected,
                        "⚠️  重复注册，覆盖旧描述符"
                    );
                }
                DuplicatePolicy::Reject => {
                    return Err(RegistryError::Duplicate {
                        library: info.library().to_string(),
                        name: info.name().to_string(),
                        kind: expected,
                    });
                }
            }
        }
        table.insert(info.name().to_string(), Arc::clone(&info));
        debug!(element = %info.type_name(), kind = %expected, "注册元件");
        Ok(info)
    }

    /// 注册组件描述符，返回存入数据库的条目
    pub fn register_component(&mut self, info: ElementInfo) -> Result<Arc<ElementInfo>, RegistryError> {
        self.insert(info, KindTag::Component)
    }

    /// 注册子组件描述符
    pub fn register_subcomponent(
        &mut self,
        info: ElementInfo,
    ) -> Result<Arc<ElementInfo>, RegistryError> {
        self.insert(info, KindTag::SubComponent)
    }

    /// 按描述符自身的种类注册
    pub fn register(&mut self, info: ElementInfo) -> Result<Arc<ElementInfo>, RegistryError> {
        let kind = info.kind_tag();
        self.insert(info, kind)
    }

    pub fn add_component<T: ComponentElement>(&mut self) -> Result<Arc<ElementInfo>, RegistryError> {
        self.register_component(ElementInfo::component::<T>())
    }

    pub fn add_subcomponent<T: SubComponentElement>(
        &mut self,
    ) -> Result<Arc<ElementInfo>, RegistryError> {
        self.register_subcomponent(ElementInfo::subcomponent::<T>())
    }

    pub fn lookup(&self, library: &str, name: &str, kind: KindTag) -> Option<Arc<ElementInfo>> {
        self.libraries
            .get(library)?
            .table(kind)
            .get(name)
            .map(Arc::clone)
    }

    pub fn component(&self, library: &str, name: &str) -> Option<Arc<ElementInfo>> {
        self.lookup(library, name, KindTag::Component)
    }

    pub fn subcomponent(&self, library: &str, name: &str) -> Option<Arc<ElementInfo>> {
        self.lookup(library, name, KindTag::SubComponent)
    }

    /// 按 `library.name` 形式查找
    pub fn lookup_type(&self, type_name: &str, kind: KindTag) -> Option<Arc<ElementInfo>> {
        let (library, name) = type_name.split_once('.')?;
        self.lookup(library, name, kind)
    }

    pub fn library(&self, name: &str) -> Option<&LibraryInfo> {
        self.libraries.get(name)
    }

    pub fn libraries(&self) -> impl Iterator<Item = &LibraryInfo> {
        self.libraries.values()
    }

    /// 所有库中的描述符总数
    pub fn len(&self) -> usize {
        self.libraries
            .values()
            .map(|l| l.components.len() + l.subcomponents.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for ElementRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, lib) in &self.libraries {
            writeln!(f, "library : {name}")?;
            write!(f, "{lib}")?;
        }
        Ok(())
    }
}
