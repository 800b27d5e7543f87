//! # Game 模块
//!
//! 游戏规则层：老板血量、掌掴计数、最高分、成就、游戏模式与增益。
//!
//! 本模块不接触动画；`app` 在接受一次掌掴后调用 [`GameState::record_slap`]，
//! 每帧调用 [`GameState::update`] 推进模式计时。

mod achievements;
mod power_up;

pub use achievements::{Achievement, AchievementBook};
pub use power_up::{PowerUp, PowerUps};

use serde::{Deserialize, Serialize};
use slap_runtime::{Color, SwingStyle};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

use crate::config::GameRules;

/// 游戏模式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// 自由模式
    #[default]
    Normal,
    /// 限时模式（倒计时结束即完成）
    Time,
    /// 生存模式（老板血量归零即完成）
    Survival,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Normal => "normal",
            GameMode::Time => "time",
            GameMode::Survival => "survival",
        }
    }

    /// 模式完成提示，自由模式没有完成条件
    pub fn completion_message(&self) -> Option<&'static str> {
        match self {
            GameMode::Normal => None,
            GameMode::Time => Some("Time Attack Complete!"),
            GameMode::Survival => Some("Survival Mode Complete!"),
        }
    }

    fn completion_achievement(&self) -> Option<Achievement> {
        match self {
            GameMode::Normal => None,
            GameMode::Time => Some(Achievement::SpeedDemon),
            GameMode::Survival => Some(Achievement::Survivor),
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(GameMode::Normal),
            "time" => Ok(GameMode::Time),
            "survival" => Ok(GameMode::Survival),
            other => Err(format!("未知游戏模式 '{other}'（可选 normal / time / survival）")),
        }
    }
}

/// 掌掴类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlapKind {
    #[default]
    Normal,
    Combo,
    Super,
}

impl SlapKind {
    pub const ALL: [SlapKind; 3] = [SlapKind::Normal, SlapKind::Combo, SlapKind::Super];

    pub fn as_str(&self) -> &'static str {
        match self {
            SlapKind::Normal => "normal",
            SlapKind::Combo => "combo",
            SlapKind::Super => "super",
        }
    }

    /// 伤害倍率
    pub fn power(&self, rules: &GameRules) -> f32 {
        match self {
            SlapKind::Normal => 1.0,
            SlapKind::Combo => rules.combo_power,
            SlapKind::Super => rules.super_power,
        }
    }

    /// 命中音效名
    pub fn sound(&self) -> &'static str {
        match self {
            SlapKind::Normal => "slap",
            SlapKind::Combo => "combo-slap",
            SlapKind::Super => "super-slap",
        }
    }

    /// 命中粒子颜色
    pub fn color(&self) -> Color {
        match self {
            SlapKind::Normal => Color::WHITE,
            SlapKind::Combo => Color::GREEN,
            SlapKind::Super => Color::RED,
        }
    }

    /// 挥臂动画风格
    pub fn swing_style(&self) -> SwingStyle {
        SwingStyle::new(self.as_str(), self.sound(), self.color())
    }

    /// 选择提示文本，例如 `Super Slap Selected!`
    pub fn selected_message(&self) -> String {
        format!("{} Slap Selected!", self.title())
    }

    /// 增益激活提示文本
    pub fn activated_message(&self) -> String {
        format!("{} Slap Activated!", self.title())
    }

    fn title(&self) -> &'static str {
        match self {
            SlapKind::Normal => "Normal",
            SlapKind::Combo => "Combo",
            SlapKind::Super => "Super",
        }
    }
}

impl fmt::Display for SlapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlapKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(SlapKind::Normal),
            "combo" => Ok(SlapKind::Combo),
            "super" => Ok(SlapKind::Super),
            other => Err(format!("未知掌掴类型 '{other}'（可选 normal / combo / super）")),
        }
    }
}

/// 血条档位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthBand {
    /// 60% 以上
    Healthy,
    /// 30% - 60%
    Wounded,
    /// 30% 及以下
    Critical,
}

impl HealthBand {
    pub fn from_fraction(fraction: f32) -> Self {
        if fraction > 0.6 {
            HealthBand::Healthy
        } else if fraction > 0.3 {
            HealthBand::Wounded
        } else {
            HealthBand::Critical
        }
    }

    /// 血条颜色
    pub fn color(&self) -> &'static str {
        match self {
            HealthBand::Healthy => "#2ecc71",
            HealthBand::Wounded => "#f1c40f",
            HealthBand::Critical => "#e74c3c",
        }
    }
}

/// 规则层事件，由 `app` 转换为提示消息与存档写入
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// 老板受到伤害
    Damaged { amount: f32, health: f32 },
    /// 成就首次解锁
    AchievementUnlocked(Achievement),
    /// 刷新最高分
    NewHighScore(u32),
    /// 模式完成（状态已重置）
    ModeCompleted(GameMode),
}

/// 游戏状态
#[derive(Debug, Clone)]
pub struct GameState {
    rules: GameRules,
    mode: GameMode,
    boss_health: f32,
    time_remaining: f64,
    slap_count: u32,
    high_score: u32,
    achievements: AchievementBook,
}

impl GameState {
    pub fn new(rules: GameRules, high_score: u32) -> Self {
        Self {
            mode: GameMode::Normal,
            boss_health: rules.max_health,
            time_remaining: rules.time_limit_secs,
            slap_count: 0,
            high_score,
            achievements: AchievementBook::new(),
            rules,
        }
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn boss_health(&self) -> f32 {
        self.boss_health
    }

    /// 血量比例 (0.0 - 1.0)
    pub fn health_fraction(&self) -> f32 {
        (self.boss_health / self.rules.max_health).clamp(0.0, 1.0)
    }

    pub fn health_band(&self) -> HealthBand {
        HealthBand::from_fraction(self.health_fraction())
    }

    /// 限时模式剩余时间，其他模式为 None
    pub fn time_remaining(&self) -> Option<f64> {
        (self.mode == GameMode::Time).then_some(self.time_remaining)
    }

    pub fn slap_count(&self) -> u32 {
        self.slap_count
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn achievements(&self) -> &AchievementBook {
        &self.achievements
    }

    /// 切换模式并重置血量与计时
    pub fn set_mode(&mut self, mode: GameMode) {
        info!(from = %self.mode, to = %mode, "切换游戏模式");
        self.mode = mode;
        self.reset();
    }

    /// 重置血量与计时（掌掴计数与成就保留）
    pub fn reset(&mut self) {
        self.boss_health = self.rules.max_health;
        self.time_remaining = self.rules.time_limit_secs;
    }

    /// 记录一次被接受的掌掴
    pub fn record_slap(&mut self, kind: SlapKind) -> Vec<GameEvent> {
        let mut events = Vec::new();

        self.slap_count += 1;
        let amount = self.rules.base_damage * kind.power(&self.rules);
        self.boss_health = (self.boss_health - amount).max(0.0);
        debug!(
            kind = %kind,
            amount,
            health = self.boss_health,
            count = self.slap_count,
            "掌掴命中"
        );
        events.push(GameEvent::Damaged {
            amount,
            health: self.boss_health,
        });

        if self.slap_count == 1 {
            self.unlock(Achievement::FirstSlap, &mut events);
        }
        if self.slap_count == self.rules.slap_master_count {
            self.unlock(Achievement::SlapMaster, &mut events);
        }
        match kind {
            SlapKind::Super => self.unlock(Achievement::SuperSlapper, &mut events),
            SlapKind::Combo => self.unlock(Achievement::ComboMaster, &mut events),
            SlapKind::Normal => {}
        }

        if self.slap_count > self.high_score {
            self.high_score = self.slap_count;
            events.push(GameEvent::NewHighScore(self.high_score));
        }

        events
    }

    /// 推进模式计时并检查完成条件
    pub fn update(&mut self, dt: f64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let completed = match self.mode {
            GameMode::Normal => false,
            GameMode::Time => {
                self.time_remaining = (self.time_remaining - dt.max(0.0)).max(0.0);
                self.time_remaining <= 0.0
            }
            GameMode::Survival => self.boss_health <= 0.0,
        };

        if completed {
            info!(mode = %self.mode, slaps = self.slap_count, "模式完成");
            events.push(GameEvent::ModeCompleted(self.mode));
            if let Some(achievement) = self.mode.completion_achievement() {
                self.unlock(achievement, &mut events);
            }
            self.reset();
        }
        events
    }

    fn unlock(&mut self, achievement: Achievement, events: &mut Vec<GameEvent>) {
        if self.achievements.unlock(achievement) {
            info!(achievement = %achievement, "成就解锁");
            events.push(GameEvent::AchievementUnlocked(achievement));
        }
    }
}
