//! 退出引用计数
//!
//! 组件通过 register/unregister 声明自己是否仍有工作。计数曾经为正、
//! 之后回到零时，本 rank 认为仿真可以结束。跨 rank 的汇总不在此实现。

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::component::ComponentId;

#[derive(Debug, Default)]
pub struct Exit {
    refs: HashMap<ComponentId, u32>,
    total: u64,
    armed: bool,
}

impl Exit {
    pub fn ref_inc(&mut self, id: ComponentId) -> bool {
        *self.refs.entry(id).or_insert(0) += 1;
        self.total += 1;
        self.armed = true;
        debug!(component = %id, total = self.total, "退出计数 +1");
        true
    }

    pub fn ref_dec(&mut self, id: ComponentId) -> bool {
        match self.refs.get_mut(&id) {
            Some(n) if *n > 0 => {
                *n -= 1;
                self.total -= 1;
                debug!(component = %id, total = self.total, "退出计数 -1");
                true
            }
            _ => {
                warn!(component = %id, "退出计数不配对，忽略");
                false
            }
        }
    }

    /// 全局未完成数
    pub fn ref_count(&self) -> u64 {
        self.total
    }

    /// 某组件尚未撤销的注册数
    pub fn refs_for(&self, id: ComponentId) -> u32 {
        self.refs.get(&id).copied().unwrap_or(0)
    }

    /// 计数曾为正且已回到零
    pub fn should_exit(&self) -> bool {
        self.armed && self.total == 0
    }
}
