//! 乒乓元件
//!
//! `Pinger` 在第一个时钟周期发出 ping，收到 pong 后发下一轮，`rounds` 轮结束后
//! 撤销退出注册。`Ponger` 经零延迟自链路模拟服务时间后回复，并把每次服务
//! 报告给它加载的 `demo.Accumulator` 子组件。

use std::any::Any;

use tracing::{debug, error, info, warn};

use super::accumulator::Accumulator;
use crate::component::{Component, ComponentBase, SubComponent};
use crate::eli::{Category, ComponentElement, ParamSpec, PortSpec, StatSpec};
use crate::kernel::KernelServices;
use crate::link::{HandlerId, LinkEvent};
use crate::params::{ConfigError, Params};
use crate::sim::SimTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ping(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pong(pub u32);

const PONG: HandlerId = HandlerId(0);
const CLOCK: HandlerId = HandlerId(1);

#[derive(Debug)]
pub struct Pinger {
    base: ComponentBase,
    rounds: u32,
    clock: String,
    delay: u64,
    sent: u32,
    received: u32,
    finished_at: Option<SimTime>,
}

impl Pinger {
    pub fn sent(&self) -> u32 {
        self.sent
    }

    pub fn received(&self) -> u32 {
        self.received
    }

    /// 最后一个 pong 到达的时刻
    pub fn finished_at(&self) -> Option<SimTime> {
        self.finished_at
    }

    fn send_ping(&mut self, kernel: &mut dyn KernelServices) {
        match self.base.send("out", self.delay, Ping(self.sent), kernel) {
            Ok(at) => {
                debug!(component = %self.base.name(), round = self.sent, arrive = %at, "🏓 ping");
                self.sent += 1;
            }
            Err(e) => {
                error!(component = %self.base.name(), error = %e, "ping 发送失败，放弃");
                self.finish_rounds(kernel);
            }
        }
    }

    fn finish_rounds(&mut self, kernel: &mut dyn KernelServices) {
        self.finished_at = Some(kernel.core_tick());
        self.base.unregister_exit(kernel);
    }
}

impl Component for Pinger {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn setup(&mut self, kernel: &mut dyn KernelServices) {
        self.base.register_exit(kernel);
        if let Err(e) = self.base.register_clock(&self.clock, CLOCK, true, kernel) {
            error!(component = %self.base.name(), clock = %self.clock, error = %e, "注册时钟失败");
            self.base.unregister_exit(kernel);
        }
    }

    fn clock_tick(&mut self, _handler: HandlerId, _cycle: u64, kernel: &mut dyn KernelServices) -> bool {
        if self.rounds == 0 {
            self.finish_rounds(kernel);
        } else {
            self.send_ping(kernel);
        }
        true
    }

    fn handle_event(&mut self, handler: HandlerId, event: LinkEvent, kernel: &mut dyn KernelServices) {
        if handler != PONG {
            return;
        }
        let Some(Pong(round)) = event.payload::<Pong>().copied() else {
            warn!(component = %self.base.name(), src = %event.src(), "不是 pong，丢弃");
            return;
        };
        self.received += 1;
        debug!(component = %self.base.name(), round, "收到 pong");
        if self.received >= self.rounds {
            self.finish_rounds(kernel);
        } else {
            self.send_ping(kernel);
        }
    }

    fn finish(&mut self, _kernel: &mut dyn KernelServices) {
        info!(
            component = %self.base.name(),
            sent = self.sent,
            received = self.received,
            finished_at = ?self.finished_at,
            "📊 pinger 统计"
        );
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ComponentElement for Pinger {
    const LIBRARY: &'static str = super::DEMO_LIBRARY;
    const NAME: &'static str = "Pinger";
    const DESCRIPTION: &'static str = "Sends pings and waits for the matching pongs";
    const CATEGORY: Category = Category::NETWORK;

    fn params() -> Vec<ParamSpec> {
        vec![
            ParamSpec::optional("rounds", "Number of ping/pong exchanges", "3"),
            ParamSpec::optional("clock", "Clock frequency; also the link time base", "1GHz"),
            ParamSpec::optional("delay", "Extra send delay in clock cycles", "0"),
        ]
    }

    fn stats() -> Vec<StatSpec> {
        vec![
            StatSpec::new("pings_sent")
                .describe("Pings sent")
                .units("events")
                .enable_level(1),
            StatSpec::new("pongs_received")
                .describe("Pongs received")
                .units("events")
                .enable_level(1),
        ]
    }

    fn ports() -> Vec<PortSpec> {
        vec![PortSpec::new("out").describe("Sends Ping, receives Pong")]
    }

    fn new(mut base: ComponentBase, params: &Params) -> Result<Self, ConfigError> {
        let rounds = params.find_or("rounds", 3)?;
        let clock = params.get("clock").unwrap_or("1GHz").to_string();
        let delay = params.find_or("delay", 0)?;
        base.configure_link("out", None, Some(PONG));
        Ok(Self {
            base,
            rounds,
            clock,
            delay,
            sent: 0,
            received: 0,
            finished_at: None,
        })
    }
}

const PING: HandlerId = HandlerId(0);
const SERVICE: HandlerId = HandlerId(1);

pub struct Ponger {
    base: ComponentBase,
    service_ns: u64,
    initial: i64,
    served: u32,
    reducer: Option<Box<dyn SubComponent>>,
}

impl Ponger {
    pub fn served(&self) -> u32 {
        self.served
    }

    /// 子组件中累计的服务次数；子组件未加载时为 `None`
    pub fn accumulated(&self) -> Option<i64> {
        self.accumulator().map(Accumulator::total)
    }

    fn accumulator(&self) -> Option<&Accumulator> {
        self.reducer.as_ref()?.as_any().downcast_ref::<Accumulator>()
    }

    fn accumulator_mut(&mut self) -> Option<&mut Accumulator> {
        self.reducer.as_mut()?.as_any_mut().downcast_mut::<Accumulator>()
    }
}

impl Component for Ponger {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn setup(&mut self, kernel: &mut dyn KernelServices) {
        if let Err(e) = self.base.register_time_base("1ns", true, kernel) {
            error!(component = %self.base.name(), error = %e, "注册时间基准失败");
        }
        let params = Params::new().with("initial", self.initial.to_string());
        match self.base.load_subcomponent("demo.Accumulator", &params, &*kernel) {
            Ok(sub) => self.reducer = Some(sub),
            Err(e) => warn!(component = %self.base.name(), error = %e, "加载子组件失败"),
        }
    }

    fn handle_event(&mut self, handler: HandlerId, event: LinkEvent, kernel: &mut dyn KernelServices) {
        let Some(ping) = event.payload::<Ping>().copied() else {
            warn!(component = %self.base.name(), src = %event.src(), "不是 ping，丢弃");
            return;
        };
        let sent = match handler {
            PING => self.base.send("service", self.service_ns, ping, kernel),
            SERVICE => {
                self.served += 1;
                if let Some(acc) = self.accumulator_mut() {
                    acc.add(1);
                }
                self.base.send("in", 0, Pong(ping.0), kernel)
            }
            _ => return,
        };
        if let Err(e) = sent {
            warn!(component = %self.base.name(), error = %e, "发送失败");
        }
    }

    fn finish(&mut self, _kernel: &mut dyn KernelServices) {
        info!(
            component = %self.base.name(),
            served = self.served,
            accumulated = ?self.accumulated(),
            "📊 ponger 统计"
        );
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ComponentElement for Ponger {
    const LIBRARY: &'static str = super::DEMO_LIBRARY;
    const NAME: &'static str = "Ponger";
    const DESCRIPTION: &'static str = "Answers every ping with a pong after a service delay";
    const CATEGORY: Category = Category::NETWORK;

    fn params() -> Vec<ParamSpec> {
        vec![
            ParamSpec::optional("service_ns", "Service time before replying, in ns", "0"),
            ParamSpec::optional("initial", "Initial value of the accumulator", "0"),
        ]
    }

    fn stats() -> Vec<StatSpec> {
        vec![StatSpec::new("pongs_sent").describe("Pongs sent").units("events")]
    }

    fn ports() -> Vec<PortSpec> {
        vec![PortSpec::new("in").describe("Receives Ping, sends Pong")]
    }

    fn new(mut base: ComponentBase, params: &Params) -> Result<Self, ConfigError> {
        let service_ns = params.find_or("service_ns", 0)?;
        let initial = params.find_or("initial", 0)?;
        base.configure_link("in", None, Some(PING));
        base.configure_self_link("service", None, Some(SERVICE));
        Ok(Self {
            base,
            service_ns,
            initial,
            served: 0,
            reducer: None,
        })
    }
}
