//! # Effect 模块
//!
//! 动画核心发出的副作用请求。
//!
//! 核心只**产生** `Effect` 值，从不播放声音或生成粒子；
//! 由宿主层的分发器按类型交给音频 / 粒子子系统处理。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pose::Vec3;

/// 粒子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleKind {
    /// 掌掴命中
    Slap,
    /// 进食碎屑
    Eating,
    /// 冲击
    Impact,
}

impl ParticleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slap => "slap",
            Self::Eating => "eating",
            Self::Impact => "impact",
        }
    }
}

/// RGB 颜色（`0xRRGGBB`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Self = Self(0xffffff);
    pub const RED: Self = Self(0xff0000);
    pub const GREEN: Self = Self(0x00ff00);
    /// 粒子默认颜色
    pub const EMBER: Self = Self(0xff6b31);
}

impl Default for Color {
    fn default() -> Self {
        Self::EMBER
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// 副作用请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// 播放音效
    PlaySound {
        /// 音效名（由音频层映射到文件）
        name: String,
        /// 延迟播放（秒）
        #[serde(default)]
        delay: f32,
    },
    /// 生成一次粒子爆发
    SpawnParticles {
        kind: ParticleKind,
        position: Vec3,
        #[serde(default)]
        color: Color,
    },
    /// 应用层事件（例如 `slap_landed`），由游戏状态层自行解释
    Signal { name: String },
}

impl Effect {
    /// 立即播放的音效
    pub fn sound(name: impl Into<String>) -> Self {
        Self::PlaySound {
            name: name.into(),
            delay: 0.0,
        }
    }

    /// 延迟播放的音效
    pub fn sound_after(name: impl Into<String>, delay: f32) -> Self {
        Self::PlaySound {
            name: name.into(),
            delay: delay.max(0.0),
        }
    }

    pub fn particles(kind: ParticleKind, position: Vec3, color: Color) -> Self {
        Self::SpawnParticles {
            kind,
            position,
            color,
        }
    }

    pub fn signal(name: impl Into<String>) -> Self {
        Self::Signal { name: name.into() }
    }

    /// 简短描述（用于日志与测试断言）
    pub fn label(&self) -> String {
        match self {
            Self::PlaySound { name, delay } if *delay > 0.0 => format!("sound:{name}+{delay}s"),
            Self::PlaySound { name, .. } => format!("sound:{name}"),
            Self::SpawnParticles { kind, color, .. } => {
                format!("particles:{}:{color}", kind.as_str())
            }
            Self::Signal { name } => format!("signal:{name}"),
        }
    }
}
