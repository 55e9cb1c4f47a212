//! 元件自描述条目：参数、统计量、端口。
//!
//! 纯数据，没有行为；`Display` 输出供文档工具打印。

use std::fmt;

use serde::Serialize;

const EMPTY: &str = "<empty>";
const REQUIRED: &str = "<required>";

/// 参数说明。`default` 为 `None` 表示该参数必需。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamSpec {
    pub name: String,
    pub description: Option<String>,
    pub default: Option<String>,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            default: None,
        }
    }

    /// 必需参数
    pub fn required(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name).describe(description)
    }

    /// 带默认值的参数
    pub fn optional(
        name: impl Into<String>,
        description: impl Into<String>,
        default: impl Into<String>,
    ) -> Self {
        Self::new(name).describe(description).default_value(default)
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

impl fmt::Display for ParamSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({})",
            self.name,
            self.description.as_deref().unwrap_or(EMPTY),
            self.default.as_deref().unwrap_or(REQUIRED)
        )
    }
}

/// 统计量说明。`enable_level` 越大越详细。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatSpec {
    pub name: String,
    pub description: Option<String>,
    pub units: Option<String>,
    pub enable_level: u8,
}

impl StatSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            units: None,
            enable_level: 0,
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    pub fn enable_level(mut self, level: u8) -> Self {
        self.enable_level = level;
        self
    }
}

impl fmt::Display for StatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({}).  Enable level = {}",
            self.name,
            self.description.as_deref().unwrap_or(EMPTY),
            self.units.as_deref().unwrap_or(EMPTY),
            self.enable_level
        )
    }
}

/// 端口说明：元件承诺提供的可连接链路槽位。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortSpec {
    pub name: String,
    pub description: Option<String>,
}

impl PortSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.name,
            self.description.as_deref().unwrap_or(EMPTY)
        )
    }
}
