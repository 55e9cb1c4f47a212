//! 算术元件：`Adder`（普通构造）与 `Multiplier`（自定义工厂、轮询输入）

use std::any::Any;

use tracing::{debug, error, warn};

use crate::component::{Component, ComponentBase};
use crate::eli::{
    Category, ComponentElement, ComponentFactory, CreateStrategy, ParamSpec, PortSpec, StatSpec,
};
use crate::kernel::KernelServices;
use crate::link::{HandlerId, Link, LinkEvent};
use crate::params::{ConfigError, Params};

const INPUT: HandlerId = HandlerId(0);
const CLOCK: HandlerId = HandlerId(1);

/// 已连线时经 `out` 发出一个数
fn forward(base: &ComponentBase, value: i64, kernel: &mut dyn KernelServices) {
    if !base.links().get_link("out").is_some_and(Link::is_connected) {
        return;
    }
    if let Err(e) = base.send("out", 0, value, kernel) {
        warn!(component = %base.name(), error = %e, "发送失败");
    }
}

fn take_i64(base: &ComponentBase, event: LinkEvent) -> Option<i64> {
    match event.into_payload::<i64>() {
        Ok(v) => Some(v),
        Err(ev) => {
            warn!(component = %base.name(), src = %ev.src(), "负载不是 i64，丢弃");
            None
        }
    }
}

/// 给每个输入加上 `addend` 后转发
#[derive(Debug)]
pub struct Adder {
    base: ComponentBase,
    addend: i64,
    start: Option<i64>,
    sum: i64,
    seen: u64,
    built_by: CreateStrategy,
}

impl Adder {
    pub fn built_by(&self) -> CreateStrategy {
        self.built_by
    }

    /// 所有输出之和
    pub fn sum(&self) -> i64 {
        self.sum
    }

    pub fn seen(&self) -> u64 {
        self.seen
    }

    fn emit(&mut self, input: i64, kernel: &mut dyn KernelServices) {
        let out = input.saturating_add(self.addend);
        self.sum = self.sum.saturating_add(out);
        self.seen += 1;
        debug!(component = %self.base.name(), input, out, "➕");
        forward(&self.base, out, kernel);
    }
}

impl Component for Adder {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn setup(&mut self, kernel: &mut dyn KernelServices) {
        if let Err(e) = self.base.register_time_base("1ns", true, kernel) {
            error!(component = %self.base.name(), error = %e, "注册时间基准失败");
            return;
        }
        if let Some(start) = self.start {
            self.emit(start, kernel);
        }
    }

    fn handle_event(&mut self, handler: HandlerId, event: LinkEvent, kernel: &mut dyn KernelServices) {
        if handler != INPUT {
            return;
        }
        if let Some(v) = take_i64(&self.base, event) {
            self.emit(v, kernel);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ComponentElement for Adder {
    const LIBRARY: &'static str = super::DEMO_LIBRARY;
    const NAME: &'static str = "Adder";
    const DESCRIPTION: &'static str = "Adds a constant to every integer it receives";
    const CATEGORY: Category = Category::PROCESSOR;

    fn params() -> Vec<ParamSpec> {
        vec![
            ParamSpec::optional("addend", "Value added to each input", "1"),
            ParamSpec::optional("start", "Value injected at setup; empty for none", ""),
        ]
    }

    fn stats() -> Vec<StatSpec> {
        vec![StatSpec::new("sum").describe("Sum of all outputs").units("count")]
    }

    fn ports() -> Vec<PortSpec> {
        vec![
            PortSpec::new("in").describe("Integer input"),
            PortSpec::new("out").describe("Integer output"),
        ]
    }

    fn new(mut base: ComponentBase, params: &Params) -> Result<Self, ConfigError> {
        let addend = params.find_or("addend", 1)?;
        let start = match params.get("start") {
            Some(raw) if !raw.trim().is_empty() => Some(params.required("start")?),
            _ => None,
        };
        base.configure_link("in", None, Some(INPUT));
        base.configure_link("out", None, None);
        Ok(Self {
            base,
            addend,
            start,
            sum: 0,
            seen: 0,
            built_by: CreateStrategy::Constructor,
        })
    }
}

/// 每个时钟周期从轮询输入取出全部数值，乘以 `factor` 后转发
#[derive(Debug)]
pub struct Multiplier {
    base: ComponentBase,
    factor: i64,
    clock: String,
    max_ticks: u64,
    ticks: u64,
    products: Vec<i64>,
    /// 时钟注销后到达、没有被处理的输入
    dropped: u64,
    built_by: CreateStrategy,
}

impl Multiplier {
    pub fn built_by(&self) -> CreateStrategy {
        self.built_by
    }

    pub fn factor(&self) -> i64 {
        self.factor
    }

    pub fn products(&self) -> &[i64] {
        &self.products
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    fn configure(
        mut base: ComponentBase,
        params: &Params,
        built_by: CreateStrategy,
    ) -> Result<Self, ConfigError> {
        let factor = params.required("factor")?;
        let clock = params.get("clock").unwrap_or("1GHz").to_string();
        let max_ticks = params.find_or("ticks", 16)?;
        base.configure_link("in", None, None);
        base.configure_link("out", None, None);
        Ok(Self {
            base,
            factor,
            clock,
            max_ticks,
            ticks: 0,
            products: Vec::new(),
            dropped: 0,
            built_by,
        })
    }

    /// 工厂拒绝 `factor = 0`，普通构造不做此检查
    fn build(base: ComponentBase, params: &Params) -> Result<Box<dyn Component>, ConfigError> {
        let m = Self::configure(base, params, CreateStrategy::CustomFactory)?;
        if m.factor == 0 {
            return Err(ConfigError::InvalidValue {
                key: "factor".to_string(),
                value: "0".to_string(),
                reason: "multiplying by zero discards every input".to_string(),
            });
        }
        Ok(Box::new(m))
    }
}

impl Component for Multiplier {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn setup(&mut self, kernel: &mut dyn KernelServices) {
        if let Err(e) = self.base.register_clock(&self.clock, CLOCK, true, kernel) {
            error!(component = %self.base.name(), clock = %self.clock, error = %e, "注册时钟失败");
        }
    }

    fn clock_tick(&mut self, _handler: HandlerId, cycle: u64, kernel: &mut dyn KernelServices) -> bool {
        while let Some(ev) = self.base.poll("in") {
            let Some(v) = take_i64(&self.base, ev) else {
                continue;
            };
            let p = v.saturating_mul(self.factor);
            debug!(component = %self.base.name(), cycle, input = v, product = p, "✖️");
            self.products.push(p);
            forward(&self.base, p, kernel);
        }
        self.ticks += 1;
        self.ticks >= self.max_ticks
    }

    fn finish(&mut self, _kernel: &mut dyn KernelServices) {
        while self.base.poll("in").is_some() {
            self.dropped += 1;
        }
        if self.dropped > 0 {
            warn!(
                component = %self.base.name(),
                dropped = self.dropped,
                ticks = self.ticks,
                "时钟停止后仍有输入到达，已丢弃"
            );
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ComponentElement for Multiplier {
    const LIBRARY: &'static str = super::DEMO_LIBRARY;
    const NAME: &'static str = "Multiplier";
    const DESCRIPTION: &'static str = "Multiplies polled integers by a factor once per cycle";
    const CATEGORY: Category = Category::PROCESSOR;

    fn params() -> Vec<ParamSpec> {
        vec![
            ParamSpec::required("factor", "Multiplier applied to each input"),
            ParamSpec::optional("clock", "Polling clock frequency", "1GHz"),
            ParamSpec::optional("ticks", "Number of cycles before the clock stops", "16"),
        ]
    }

    fn stats() -> Vec<StatSpec> {
        vec![
            StatSpec::new("products")
                .describe("Number of products computed")
                .units("count")
                .enable_level(1),
        ]
    }

    fn ports() -> Vec<PortSpec> {
        vec![
            PortSpec::new("in").describe("Polled integer input"),
            PortSpec::new("out").describe("Integer output"),
        ]
    }

    fn new(base: ComponentBase, params: &Params) -> Result<Self, ConfigError> {
        Self::configure(base, params, CreateStrategy::Constructor)
    }

    fn custom_factory() -> Option<ComponentFactory> {
        Some(Self::build as ComponentFactory)
    }
}
