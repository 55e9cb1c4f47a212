//! 时间换算
//!
//! 单位解析、`TimeConverter` 与负责缓存换算器的 `TimeLord`。

mod converter;
mod error;
mod lord;
mod unit;

pub use converter::TimeConverter;
pub use error::TimeError;
pub use lord::{DEFAULT_CORE_TICK, TimeLord};
pub use unit::{Period, UnitKind, parse_period};
