//! # Lock 模块
//!
//! 每个角色一把的动画互斥锁：同一时刻最多一个运行实例驱动某个角色。

use std::collections::HashMap;

use crate::actor::{ActorId, RunId};
use crate::error::{AnimError, AnimResult};

/// 角色动画锁
///
/// 角色之间互不影响；加锁失败不会修改任何状态。
#[derive(Debug, Default)]
pub struct ActorAnimationLock {
    holders: HashMap<ActorId, RunId>,
}

impl ActorAnimationLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为角色加锁
    ///
    /// 角色已被某个运行实例持有时返回 `ActorBusy`。
    pub fn acquire(&mut self, actor: &ActorId, run: RunId) -> AnimResult<()> {
        if let Some(&holder) = self.holders.get(actor) {
            return Err(AnimError::ActorBusy {
                actor: actor.clone(),
                run: holder,
            });
        }
        self.holders.insert(actor.clone(), run);
        Ok(())
    }

    /// 释放角色的锁，返回原持有者
    ///
    /// 对空闲角色调用是无操作。
    pub fn release(&mut self, actor: &ActorId) -> Option<RunId> {
        self.holders.remove(actor)
    }

    /// 当前持有角色的运行实例
    pub fn holder(&self, actor: &ActorId) -> Option<RunId> {
        self.holders.get(actor).copied()
    }

    pub fn is_locked(&self, actor: &ActorId) -> bool {
        self.holders.contains_key(actor)
    }

    /// 被锁定的角色数量
    pub fn len(&self) -> usize {
        self.holders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }

    pub fn clear(&mut self) {
        self.holders.clear();
    }
}
