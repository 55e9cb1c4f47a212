//! 累加器子组件

use std::any::Any;

use crate::component::{ComponentBase, ComponentId, SubComponent};
use crate::eli::{ParamSpec, StatSpec, SubComponentElement};
use crate::params::{ConfigError, Params};

use super::DEMO_LIBRARY;

#[derive(Debug)]
pub struct Accumulator {
    owner: ComponentId,
    total: i64,
    samples: u64,
}

impl Accumulator {
    pub fn add(&mut self, value: i64) {
        self.total = self.total.saturating_add(value);
        self.samples += 1;
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }
}

impl SubComponent for Accumulator {
    fn owner(&self) -> ComponentId {
        self.owner
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl SubComponentElement for Accumulator {
    const LIBRARY: &'static str = DEMO_LIBRARY;
    const NAME: &'static str = "Accumulator";
    const DESCRIPTION: &'static str = "Sums the values reported by its owner";
    const INTERFACE: &'static str = "demo.Reducer";

    fn params() -> Vec<ParamSpec> {
        vec![ParamSpec::optional("initial", "Starting value of the sum", "0")]
    }

    fn stats() -> Vec<StatSpec> {
        vec![
            StatSpec::new("total")
                .describe("Running sum")
                .units("count"),
        ]
    }

    fn new(owner: &mut ComponentBase, params: &Params) -> Result<Self, ConfigError> {
        Ok(Self {
            owner: owner.id(),
            total: params.find_or("initial", 0)?,
            samples: 0,
        })
    }
}
