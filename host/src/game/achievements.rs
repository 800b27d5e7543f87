//! # Achievements 模块
//!
//! 成就定义与解锁记录。成就只在当前会话内有效，不写入存档。

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// 成就
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Achievement {
    FirstSlap,
    SlapMaster,
    SuperSlapper,
    ComboMaster,
    SpeedDemon,
    Survivor,
}

impl Achievement {
    /// 全部成就（展示顺序）
    pub const ALL: [Achievement; 6] = [
        Achievement::FirstSlap,
        Achievement::SlapMaster,
        Achievement::SuperSlapper,
        Achievement::ComboMaster,
        Achievement::SpeedDemon,
        Achievement::Survivor,
    ];

    /// 显示名
    pub fn name(&self) -> &'static str {
        match self {
            Achievement::FirstSlap => "First Slap",
            Achievement::SlapMaster => "Slap Master",
            Achievement::SuperSlapper => "Super Slapper",
            Achievement::ComboMaster => "Combo Master",
            Achievement::SpeedDemon => "Speed Demon",
            Achievement::Survivor => "Survivor",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Achievement::FirstSlap => "Slap your boss for the first time",
            Achievement::SlapMaster => "Slap your boss 10 times",
            Achievement::SuperSlapper => "Use a super slap",
            Achievement::ComboMaster => "Use a combo slap",
            Achievement::SpeedDemon => "Complete time attack mode",
            Achievement::Survivor => "Complete survival mode",
        }
    }

    /// 解锁提示文本
    pub fn unlock_message(&self) -> String {
        format!("Achievement Unlocked: {}!", self.name())
    }
}

impl fmt::Display for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 已解锁成就集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AchievementBook {
    unlocked: BTreeSet<Achievement>,
}

impl AchievementBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// 解锁成就，返回是否为首次解锁
    pub fn unlock(&mut self, achievement: Achievement) -> bool {
        self.unlocked.insert(achievement)
    }

    pub fn is_unlocked(&self, achievement: Achievement) -> bool {
        self.unlocked.contains(&achievement)
    }

    /// 按展示顺序列出所有成就及其解锁状态
    pub fn entries(&self) -> Vec<(Achievement, bool)> {
        Achievement::ALL
            .iter()
            .map(|a| (*a, self.is_unlocked(*a)))
            .collect()
    }

    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }
}
