//! 仿真器
//!
//! 单 rank 的顺序事件队列：维护当前 core tick 与待执行事件。

use super::event::Event;
use super::scheduled_event::{DEFAULT_PRIORITY, ScheduledEvent};
use super::time::SimTime;
use super::world::World;
use std::collections::BinaryHeap;
use tracing::{debug, info, trace};

/// 事件驱动仿真器：维护当前时间与事件队列。
#[derive(Default)]
pub struct Simulator {
    now: SimTime,
    next_seq: u64,
    stopped: bool,
    q: BinaryHeap<ScheduledEvent>,
}

impl Simulator {
    /// 获取当前仿真时间（core tick）
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// 队列中尚未执行的事件数
    pub fn pending(&self) -> usize {
        self.q.len()
    }

    /// 是否已被请求停止
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// 请求停止：当前事件执行完后 `run`/`run_until` 返回，剩余事件保留在队列中。
    pub fn stop(&mut self) {
        if !self.stopped {
            info!(now = %self.now, "⏹️  收到停止请求");
        }
        self.stopped = true;
    }

    /// 以默认优先级调度事件
    pub fn schedule<E: Event>(&mut self, at: SimTime, ev: E) {
        self.schedule_with_priority(at, DEFAULT_PRIORITY, ev);
    }

    /// 调度事件在指定时间、指定优先级执行
    #[tracing::instrument(skip(self, ev), fields(event_type = std::any::type_name::<E>(), schedule_at = ?at))]
    pub fn schedule_with_priority<E: Event>(&mut self, at: SimTime, priority: u8, ev: E) {
        // 不允许调度到过去：因果序由此保证
        let at = at.max(self.now);
        let seq = self.next_seq;
        trace!(now = ?self.now, seq, priority, "调度事件");

        self.next_seq = self.next_seq.wrapping_add(1);
        self.q.push(ScheduledEvent {
            at,
            priority,
            seq,
            ev: Box::new(ev),
        });

        debug!(queue_size = self.q.len(), "事件已加入队列");
    }

    /// 运行直到事件队列为空、被停止或到达 `until`。
    pub fn run_until(&mut self, until: SimTime, world: &mut dyn World) {
        while !self.stopped {
            match self.q.peek() {
                Some(top) if top.at <= until => {}
                _ => break,
            }
            let item = self.q.pop().expect("peek then pop");
            self.now = item.at;
            item.ev.execute(self, world);
            world.on_tick(self);
        }
        if !self.stopped {
            self.now = self.now.max(until);
        }
    }

    /// 运行所有事件直到队列为空或被停止。
    #[tracing::instrument(skip(self, world))]
    pub fn run(&mut self, world: &mut dyn World) {
        info!("▶️  开始运行仿真");
        debug!(now = ?self.now, queue_size = self.q.len(), "初始状态");

        let mut event_count: u64 = 0;
        while !self.stopped {
            let Some(item) = self.q.pop() else {
                break;
            };
            event_count += 1;
            self.now = item.at;

            trace!(
                event_num = event_count,
                now = ?self.now,
                priority = item.priority,
                seq = item.seq,
                remaining_queue = self.q.len(),
                "执行事件"
            );

            item.ev.execute(self, world);
            world.on_tick(self);
        }

        info!(
            total_events = event_count,
            final_time = ?self.now,
            stopped = self.stopped,
            "✅ 仿真完成"
        );
    }
}
