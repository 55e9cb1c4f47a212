//! 时间换算器
//!
//! 把组件声明的时间粒度与内核的 core tick 对应起来。

use std::fmt;

use crate::sim::SimTime;

/// 不可变的时间换算器：一个本地时间单位等于 `factor` 个 core tick。
///
/// 由 `TimeLord` 创建并缓存，通过 `Arc` 在组件和链路间共享。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimeConverter {
    factor: u64,
    spec: String,
}

impl TimeConverter {
    pub(crate) fn new(factor: u64, spec: impl Into<String>) -> Self {
        debug_assert!(factor > 0);
        Self {
            factor,
            spec: spec.into(),
        }
    }

    /// 每个本地单位包含的 core tick 数
    pub fn factor(&self) -> u64 {
        self.factor
    }

    /// 该换算器的规范单位描述。
    ///
    /// 相同 factor 的换算器由 `TimeLord` 共享，这里是第一次请求该 factor 时
    /// 使用的写法：先请求 `"1ns"` 再请求 `"1GHz"`，两者返回的都是 `"1ns"`。
    pub fn spec(&self) -> &str {
        &self.spec
    }

    /// 本地时间 -> core tick
    pub fn to_core(&self, local: u64) -> SimTime {
        SimTime(local.saturating_mul(self.factor))
    }

    /// core tick -> 本地时间（向下取整）
    pub fn from_core(&self, core: SimTime) -> u64 {
        core.0 / self.factor
    }

    /// 一个本地单位的长度
    pub fn period(&self) -> SimTime {
        SimTime(self.factor)
    }
}

impl fmt::Display for TimeConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (x{})", self.spec, self.factor)
    }
}
