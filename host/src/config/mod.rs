//! # Config 模块
//!
//! 运行时配置管理，集中管理所有配置项。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (config.json)
//! 3. 默认值（最低）

use serde::{Deserialize, Serialize};
use slap_runtime::RigLayout;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{HostError, HostResult};

/// 掌掴动画风格
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SlapAnimation {
    /// 整条手臂旋转挥出（按掌掴类型区分音效与粒子颜色）
    #[default]
    ArmSwing,
    /// 手部位移伸出（固定红色粒子）
    Reach,
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 最高分存档路径
    #[serde(default = "default_high_score_path")]
    pub high_score_path: PathBuf,

    /// 额外动画定义（JSON 数组）路径，会与内置动画一起注册
    #[serde(default)]
    pub animations_path: Option<PathBuf>,

    /// 掌掴使用的动画
    #[serde(default)]
    pub slap_animation: SlapAnimation,

    /// 游戏规则
    #[serde(default)]
    pub rules: GameRules,

    /// 音频配置
    #[serde(default)]
    pub audio: AudioConfig,

    /// 场景布局
    #[serde(default)]
    pub rig: RigLayout,
}

/// 游戏规则
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRules {
    /// 单次掌掴基础伤害
    #[serde(default = "default_base_damage")]
    pub base_damage: f32,

    /// 老板最大生命值
    #[serde(default = "default_max_health")]
    pub max_health: f32,

    /// 连击掌掴倍率
    #[serde(default = "default_combo_power")]
    pub combo_power: f32,

    /// 超级掌掴倍率
    #[serde(default = "default_super_power")]
    pub super_power: f32,

    /// 超级掌掴增益持续时间（毫秒）
    #[serde(default = "default_super_window_ms")]
    pub super_window_ms: u64,

    /// 连击掌掴增益持续时间（毫秒）
    #[serde(default = "default_combo_window_ms")]
    pub combo_window_ms: u64,

    /// 限时模式时长（秒）
    #[serde(default = "default_time_limit")]
    pub time_limit_secs: f64,

    /// 提示消息显示时长（秒）
    #[serde(default = "default_message_secs")]
    pub message_secs: f64,

    /// 解锁 Slap Master 所需掌掴次数
    #[serde(default = "default_slap_master_count")]
    pub slap_master_count: u32,
}

/// 音频配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// 音效文件根目录
    #[serde(default = "default_sounds_root")]
    pub sounds_root: PathBuf,

    /// 主音量 (0.0 - 1.0)
    #[serde(default = "default_master_volume")]
    pub master_volume: f32,

    /// SFX 音量 (0.0 - 1.0)
    #[serde(default = "default_sfx_volume")]
    pub sfx_volume: f32,

    /// 环境音音量 (0.0 - 1.0)
    #[serde(default = "default_ambient_volume")]
    pub ambient_volume: f32,

    /// 是否静音
    #[serde(default)]
    pub muted: bool,

    /// 音效名 -> 文件名（相对于 sounds_root）
    #[serde(default = "default_sounds")]
    pub sounds: BTreeMap<String, String>,
}

// ============ 默认值函数 ============

fn default_high_score_path() -> PathBuf {
    PathBuf::from("saves/highscore.json")
}

fn default_base_damage() -> f32 {
    10.0
}

fn default_max_health() -> f32 {
    100.0
}

fn default_combo_power() -> f32 {
    1.5
}

fn default_super_power() -> f32 {
    2.0
}

fn default_super_window_ms() -> u64 {
    5000
}

fn default_combo_window_ms() -> u64 {
    3000
}

fn default_time_limit() -> f64 {
    60.0
}

fn default_message_secs() -> f64 {
    2.0
}

fn default_slap_master_count() -> u32 {
    10
}

fn default_sounds_root() -> PathBuf {
    PathBuf::from("assets/sounds")
}

fn default_master_volume() -> f32 {
    1.0
}

fn default_sfx_volume() -> f32 {
    0.5
}

fn default_ambient_volume() -> f32 {
    0.2
}

fn default_sounds() -> BTreeMap<String, String> {
    [
        ("slap", "slap.mp3"),
        ("combo-slap", "combo-slap.mp3"),
        ("super-slap", "super-slap.mp3"),
        ("hurt", "hurt.mp3"),
        ("impact", "impact.mp3"),
        ("eating", "eating.mp3"),
        ("burp", "burp.mp3"),
        ("ambient", "office-ambient.mp3"),
    ]
    .into_iter()
    .map(|(name, file)| (name.to_string(), file.to_string()))
    .collect()
}

// ============ Default 实现 ============

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            high_score_path: default_high_score_path(),
            animations_path: None,
            slap_animation: SlapAnimation::default(),
            rules: GameRules::default(),
            audio: AudioConfig::default(),
            rig: RigLayout::default(),
        }
    }
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            base_damage: default_base_damage(),
            max_health: default_max_health(),
            combo_power: default_combo_power(),
            super_power: default_super_power(),
            super_window_ms: default_super_window_ms(),
            combo_window_ms: default_combo_window_ms(),
            time_limit_secs: default_time_limit(),
            message_secs: default_message_secs(),
            slap_master_count: default_slap_master_count(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sounds_root: default_sounds_root(),
            master_volume: default_master_volume(),
            sfx_volume: default_sfx_volume(),
            ambient_volume: default_ambient_volume(),
            muted: false,
            sounds: default_sounds(),
        }
    }
}

impl AudioConfig {
    /// 实际 SFX 音量（静音时为 0）
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// 实际环境音音量（静音时为 0）
    pub fn effective_ambient_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.ambient_volume).clamp(0.0, 1.0)
        }
    }

    /// 解析音效名对应的文件路径
    pub fn sound_path(&self, name: &str) -> HostResult<PathBuf> {
        self.sounds
            .get(name)
            .map(|file| self.sounds_root.join(file))
            .ok_or_else(|| HostError::UnknownSound(name.to_string()))
    }
}

// ============ 加载与验证 ============

impl AppConfig {
    /// 从文件加载配置
    pub fn load(path: impl AsRef<Path>) -> HostResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// 加载配置，文件不存在或无效时使用默认值
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "配置文件不存在，使用默认值");
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "加载配置失败，使用默认值");
                Self::default()
            }
        }
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> HostResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 验证配置
    pub fn validate(&self) -> HostResult<()> {
        let rules = &self.rules;
        if !rules.base_damage.is_finite() || rules.base_damage < 0.0 {
            return Err(HostError::Config("base_damage 不能为负".to_string()));
        }
        if !is_positive(rules.max_health) {
            return Err(HostError::Config("max_health 必须大于 0".to_string()));
        }
        if !is_positive(rules.combo_power) || !is_positive(rules.super_power) {
            return Err(HostError::Config("掌掴倍率必须大于 0".to_string()));
        }
        if !rules.time_limit_secs.is_finite() || rules.time_limit_secs <= 0.0 {
            return Err(HostError::Config("time_limit_secs 必须大于 0".to_string()));
        }
        if !rules.message_secs.is_finite() || rules.message_secs <= 0.0 {
            return Err(HostError::Config("message_secs 必须大于 0".to_string()));
        }
        if rules.slap_master_count == 0 {
            return Err(HostError::Config("slap_master_count 必须大于 0".to_string()));
        }
        for (name, volume) in [
            ("master_volume", self.audio.master_volume),
            ("sfx_volume", self.audio.sfx_volume),
            ("ambient_volume", self.audio.ambient_volume),
        ] {
            if !(0.0..=1.0).contains(&volume) {
                return Err(HostError::Config(format!("{name} 必须在 0.0 - 1.0 之间")));
            }
        }
        Ok(())
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
