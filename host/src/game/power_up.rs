//! # PowerUp 模块
//!
//! 键盘触发的限时增益：超级掌掴、连击掌掴。

use tracing::debug;

use super::SlapKind;
use crate::config::GameRules;

/// 单个增益的计时状态
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUp {
    /// 持续时间（秒）
    pub window: f64,
    /// 激活时刻，未激活时为 None
    started_at: Option<f64>,
}

impl PowerUp {
    pub fn new(window: f64) -> Self {
        Self {
            window,
            started_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    /// 剩余时间（秒），未激活时为 None
    pub fn remaining(&self, now: f64) -> Option<f64> {
        self.started_at
            .map(|start| (self.window - (now - start)).max(0.0))
    }
}

/// 增益集合
#[derive(Debug, Clone)]
pub struct PowerUps {
    super_slap: PowerUp,
    combo_slap: PowerUp,
}

impl PowerUps {
    pub fn new(rules: &GameRules) -> Self {
        Self {
            super_slap: PowerUp::new(rules.super_window_ms as f64 / 1000.0),
            combo_slap: PowerUp::new(rules.combo_window_ms as f64 / 1000.0),
        }
    }

    fn slot(&self, kind: SlapKind) -> Option<&PowerUp> {
        match kind {
            SlapKind::Super => Some(&self.super_slap),
            SlapKind::Combo => Some(&self.combo_slap),
            SlapKind::Normal => None,
        }
    }

    fn slot_mut(&mut self, kind: SlapKind) -> Option<&mut PowerUp> {
        match kind {
            SlapKind::Super => Some(&mut self.super_slap),
            SlapKind::Combo => Some(&mut self.combo_slap),
            SlapKind::Normal => None,
        }
    }

    /// 激活增益
    ///
    /// 已激活时忽略（不刷新计时），返回 false。`Normal` 没有对应增益。
    pub fn activate(&mut self, kind: SlapKind, now: f64) -> bool {
        match self.slot_mut(kind) {
            Some(slot) if !slot.is_active() => {
                slot.started_at = Some(now);
                debug!(kind = %kind, now, "增益激活");
                true
            }
            _ => false,
        }
    }

    pub fn is_active(&self, kind: SlapKind) -> bool {
        self.slot(kind).is_some_and(PowerUp::is_active)
    }

    pub fn get(&self, kind: SlapKind) -> Option<&PowerUp> {
        self.slot(kind)
    }

    /// 检查到期，返回本次到期的增益
    ///
    /// 经过时间严格大于持续时间才算到期。
    pub fn update(&mut self, now: f64) -> Vec<SlapKind> {
        let mut expired = Vec::new();
        for kind in [SlapKind::Super, SlapKind::Combo] {
            let Some(slot) = self.slot_mut(kind) else {
                continue;
            };
            let due = slot.started_at.is_some_and(|start| now - start > slot.window);
            if due {
                slot.started_at = None;
                debug!(kind = %kind, now, "增益到期");
                expired.push(kind);
            }
        }
        expired
    }

    /// 本次掌掴的实际类型：超级增益优先，其次连击增益，否则为玩家选择的类型
    pub fn effective_kind(&self, selected: SlapKind) -> SlapKind {
        if self.super_slap.is_active() {
            SlapKind::Super
        } else if self.combo_slap.is_active() {
            SlapKind::Combo
        } else {
            selected
        }
    }
}
