//! 组件图描述（graph.json）
//!
//! 声明组件实例、参数与端口之间的连线，由 `Kernel::from_graph` 消费。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::KernelError;
use crate::params::Params;
use crate::time::DEFAULT_CORE_TICK;

fn default_core_tick() -> String {
    DEFAULT_CORE_TICK.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSpec {
    #[serde(default = "default_core_tick")]
    pub core_tick: String,
    pub components: Vec<ComponentSpec>,
    #[serde(default)]
    pub links: Vec<LinkSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub name: String,
    /// "library.Element"
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub params: Params,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkSpec {
    pub name: String,
    /// 带单位的延迟，例如 "10ns"
    pub latency: String,
    pub left: EndpointSpec,
    pub right: EndpointSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EndpointSpec {
    pub component: String,
    pub port: String,
}

impl GraphSpec {
    pub fn from_json(raw: &str) -> Result<Self, KernelError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, KernelError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }
}
