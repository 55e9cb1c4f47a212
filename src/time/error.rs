use thiserror::Error;

/// 时间单位与换算相关错误
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimeError {
    #[error("empty time specification")]
    Empty,
    #[error("invalid number in time specification `{0}`")]
    InvalidNumber(String),
    #[error("unknown time unit in `{0}` (expected <n>[f|p|n|u|m|k|M|G|T](s|Hz))")]
    UnknownUnit(String),
    #[error("time specification `{0}` must be non-zero")]
    ZeroValue(String),
    #[error("time specification `{0}` overflows")]
    Overflow(String),
    #[error("core timebase `{0}` must be a period, not a frequency")]
    CoreNotPeriod(String),
    #[error("`{spec}` is finer than the core tick `{core}`")]
    BelowResolution { spec: String, core: String },
}
