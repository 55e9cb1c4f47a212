//! 调度事件
//!
//! 队列项按 (时间, 优先级, 序列号) 排序：同一 tick 内时钟先于链路投递执行，
//! 同优先级按入队顺序执行。

use super::event::Event;
use super::time::SimTime;
use std::cmp::Ordering;

/// 时钟事件优先级（数值越小越先执行）。
pub const CLOCK_PRIORITY: u8 = 40;
/// 链路事件投递优先级。
pub const DELIVERY_PRIORITY: u8 = 50;
/// 未指定优先级时使用的默认值。
pub const DEFAULT_PRIORITY: u8 = 100;

pub struct ScheduledEvent {
    pub(crate) at: SimTime,
    pub(crate) priority: u8,
    pub(crate) seq: u64,
    pub(crate) ev: Box<dyn Event>,
}

impl ScheduledEvent {
    fn key(&self) -> (SimTime, u8, u64) {
        (self.at, self.priority, self.seq)
    }
}

// BinaryHeap 是 max-heap，反向比较得到最小 key 优先。
impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key()).reverse()
    }
}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ScheduledEvent {}
