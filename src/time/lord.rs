//! 时间权威（TimeLord）
//!
//! 持有 core timebase，负责把单位字符串解析为 `TimeConverter` 并缓存。
//! 相同 factor 的换算器只创建一次，不同写法（"1ns" 与 "1000ps"）共享同一实例。

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace};

use super::converter::TimeConverter;
use super::error::TimeError;
use super::unit::{Period, UnitKind, parse_period};

pub const DEFAULT_CORE_TICK: &str = "1ps";

#[derive(Debug)]
pub struct TimeLord {
    core_spec: String,
    core: Period,
    by_factor: HashMap<u64, Arc<TimeConverter>>,
    by_spec: HashMap<String, Arc<TimeConverter>>,
}

impl Default for TimeLord {
    fn default() -> Self {
        // 1ps = 1 / 10^12 s
        Self::with_core(
            DEFAULT_CORE_TICK,
            Period {
                kind: UnitKind::Period,
                num: 1,
                den: 1_000_000_000_000,
            },
        )
    }
}

impl TimeLord {
    /// 以给定 core tick（必须是周期，例如 `"1ps"`）创建
    pub fn new(core_tick: &str) -> Result<Self, TimeError> {
        let core = parse_period(core_tick)?;
        if core.kind != UnitKind::Period {
            return Err(TimeError::CoreNotPeriod(core_tick.to_string()));
        }
        Ok(Self::with_core(core_tick, core))
    }

    fn with_core(core_spec: &str, core: Period) -> Self {
        let mut lord = Self {
            core_spec: core_spec.trim().to_string(),
            core,
            by_factor: HashMap::new(),
            by_spec: HashMap::new(),
        };
        // core tick 自身的换算器总是存在
        let spec = lord.core_spec.clone();
        let tc = lord.converter_for_factor(1, &spec);
        lord.by_spec.insert(spec, tc);
        lord
    }

    pub fn core_tick(&self) -> &str {
        &self.core_spec
    }

    /// factor 为 1 的换算器
    pub fn core_converter(&mut self) -> Arc<TimeConverter> {
        let spec = self.core_spec.clone();
        self.converter_for_factor(1, &spec)
    }

    /// 获取（或创建）单位字符串对应的换算器
    pub fn converter(&mut self, spec: &str) -> Result<Arc<TimeConverter>, TimeError> {
        let key = spec.trim();
        if let Some(tc) = self.by_spec.get(key) {
            trace!(spec = key, "命中换算器缓存");
            return Ok(Arc::clone(tc));
        }

        let period = parse_period(key)?;
        let finer = period
            .finer_than(&self.core)
            .ok_or_else(|| TimeError::Overflow(key.to_string()))?;
        // 短于一个 core tick 的周期直接报错，不向上舍入
        if finer {
            return Err(TimeError::BelowResolution {
                spec: key.to_string(),
                core: self.core_spec.clone(),
            });
        }
        let (ticks, exact) = period
            .ticks_of(&self.core)
            .ok_or_else(|| TimeError::Overflow(key.to_string()))?;
        let factor = u64::try_from(ticks).map_err(|_| TimeError::Overflow(key.to_string()))?;
        if !exact {
            debug!(spec = key, factor, core = %self.core_spec, "单位不能被 core tick 整除，已四舍五入");
        }

        let tc = self.converter_for_factor(factor, key);
        self.by_spec.insert(key.to_string(), Arc::clone(&tc));
        Ok(tc)
    }

    fn converter_for_factor(&mut self, factor: u64, spec: &str) -> Arc<TimeConverter> {
        Arc::clone(
            self.by_factor
                .entry(factor)
                .or_insert_with(|| Arc::new(TimeConverter::new(factor, spec))),
        )
    }

    pub fn nano(&mut self) -> Result<Arc<TimeConverter>, TimeError> {
        self.converter("1ns")
    }

    pub fn micro(&mut self) -> Result<Arc<TimeConverter>, TimeError> {
        self.converter("1us")
    }

    pub fn milli(&mut self) -> Result<Arc<TimeConverter>, TimeError> {
        self.converter("1ms")
    }

    /// 已创建的不同换算器数量
    pub fn converter_count(&self) -> usize {
        self.by_factor.len()
    }
}
