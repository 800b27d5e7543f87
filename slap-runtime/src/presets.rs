//! # Presets 模块
//!
//! 游戏内置的动画定义：掌掴、进食、挥臂、老板受击后仰。
//!
//! 所有姿态都是相对肢体静止姿态的偏移；粒子位置是世界坐标。

use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::easing::EasingFunction;
use crate::effect::{Color, Effect, ParticleKind};
use crate::error::AnimResult;
use crate::phase::{AnimationSpec, Phase};
use crate::pose::{PoseDelta, Vec3};

/// 掌掴（手部位移版）
pub const SLAP: &str = "slap";
/// 手到嘴边进食
pub const EAT: &str = "eat";
/// 老板头部受击后仰
pub const HEAD_RECOIL: &str = "head_recoil";
/// 挥臂掌掴（旋转版）名称前缀，完整名称为 `arm_swing.<style>`
pub const ARM_SWING_PREFIX: &str = "arm_swing";

/// 命中时发出的应用层信号
pub const SLAP_LANDED: &str = "slap_landed";

/// 预设动画依赖的场景布局
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigLayout {
    /// 掌掴目标相对手部静止位置的偏移
    #[serde(default = "default_slap_target")]
    pub slap_target: Vec3,
    /// 命中点（世界坐标，粒子生成位置）
    #[serde(default = "default_impact_point")]
    pub impact_point: Vec3,
    /// 嘴部相对手部静止位置的偏移
    #[serde(default = "default_mouth_offset")]
    pub mouth_offset: Vec3,
    /// 嘴部（世界坐标，进食粒子位置）
    #[serde(default = "default_mouth_point")]
    pub mouth_point: Vec3,
}

impl Default for RigLayout {
    fn default() -> Self {
        Self {
            slap_target: default_slap_target(),
            impact_point: default_impact_point(),
            mouth_offset: default_mouth_offset(),
            mouth_point: default_mouth_point(),
        }
    }
}

fn default_slap_target() -> Vec3 {
    Vec3::new(1.0, 0.7, 0.0)
}

fn default_impact_point() -> Vec3 {
    Vec3::new(0.5, 0.0, 0.3)
}

fn default_mouth_offset() -> Vec3 {
    Vec3::new(-0.6, 1.2, 0.5)
}

fn default_mouth_point() -> Vec3 {
    Vec3::new(-1.5, 0.5, 0.5)
}

/// 挥臂掌掴的音效与粒子颜色
#[derive(Debug, Clone, PartialEq)]
pub struct SwingStyle {
    /// 风格名（normal / combo / super）
    pub name: String,
    /// 命中音效
    pub sound: String,
    /// 命中粒子颜色
    pub color: Color,
}

impl SwingStyle {
    pub fn new(name: impl Into<String>, sound: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            sound: sound.into(),
            color,
        }
    }

    /// 对应的动画名
    pub fn animation_name(&self) -> String {
        arm_swing_name(&self.name)
    }
}

pub fn arm_swing_name(style: &str) -> String {
    format!("{ARM_SWING_PREFIX}.{style}")
}

/// 掌掴：windup 0–0.3 / strike 0.3–0.7 / return 0.7–1.0，共 0.8 秒
///
/// strike 阶段进度到 0.95 时发出掌掴音效、冲击音效、红色碎屑、白色冲击火花和命中信号。
pub fn slap(layout: &RigLayout) -> AnimResult<AnimationSpec> {
    let rest = PoseDelta::IDENTITY;
    let windup = PoseDelta::at(Vec3::new(0.5, 0.3, 0.0));
    let target = PoseDelta::at(layout.slap_target);

    AnimationSpec::new(
        SLAP,
        0.8,
        vec![
            Phase::new("windup", 0.0, 0.3)
                .with_easing(EasingFunction::EaseOutQuad)
                .with_pose(rest, windup),
            Phase::new("strike", 0.3, 0.7)
                .with_easing(EasingFunction::EaseInQuad)
                .with_pose(windup, target)
                .at_progress(0.95, Effect::sound("slap"))
                .at_progress(0.95, Effect::sound("impact"))
                .at_progress(
                    0.95,
                    Effect::particles(ParticleKind::Slap, layout.impact_point, Color::RED),
                )
                .at_progress(
                    0.95,
                    Effect::particles(ParticleKind::Impact, layout.impact_point, Color::WHITE),
                )
                .at_progress(0.95, Effect::signal(SLAP_LANDED)),
            Phase::new("return", 0.7, 1.0)
                .with_easing(EasingFunction::EaseInOutSine)
                .with_pose(target, rest),
        ],
    )
}

/// 进食：approach 0–0.4 / eat 0.4–0.6 / return 0.6–1.0，共 1 秒
///
/// 进入 eat 时播放咀嚼音效并生成碎屑粒子，离开 eat 时打嗝。
pub fn eat(layout: &RigLayout) -> AnimResult<AnimationSpec> {
    let rest = PoseDelta::IDENTITY;
    let mouth = PoseDelta::at(layout.mouth_offset);
    let bob = PoseDelta::at(layout.mouth_offset + Vec3::new(0.0, 0.05, 0.0));

    AnimationSpec::new(
        EAT,
        1.0,
        vec![
            Phase::new("approach", 0.0, 0.4)
                .with_easing(EasingFunction::EaseInOut)
                .with_pose(rest, mouth),
            Phase::new("eat", 0.4, 0.6)
                .with_easing(EasingFunction::Wave)
                .with_pose(mouth, bob)
                .on_enter(Effect::sound("eating"))
                .on_enter(Effect::particles(
                    ParticleKind::Eating,
                    layout.mouth_point,
                    Color::EMBER,
                ))
                .on_exit(Effect::sound("burp")),
            Phase::new("return", 0.6, 1.0)
                .with_easing(EasingFunction::EaseInOut)
                .with_pose(mouth, rest),
        ],
    )
}

/// 挥臂掌掴：windup 0–0.5 / swing 0.5–1.0，共 0.5 秒
///
/// 手臂先后摆蓄力，再向前甩过；总进度 0.75（swing 中点）命中：
/// 播放风格音效，0.2 秒后播放受伤音效，生成风格颜色的粒子并发出命中信号。
pub fn arm_swing(style: &SwingStyle, layout: &RigLayout) -> AnimResult<AnimationSpec> {
    let rest = PoseDelta::IDENTITY;
    let cocked = PoseDelta::rotated(Vec3::new(FRAC_PI_4, 0.0, -FRAC_PI_2));
    let follow_through = PoseDelta::rotated(Vec3::new(0.0, 0.0, FRAC_PI_2));

    AnimationSpec::new(
        style.animation_name(),
        0.5,
        vec![
            Phase::new("windup", 0.0, 0.5).with_pose(rest, cocked),
            Phase::new("swing", 0.5, 1.0)
                .with_pose(cocked, follow_through)
                .at_progress(0.5, Effect::sound(style.sound.clone()))
                .at_progress(0.5, Effect::sound_after("hurt", 0.2))
                .at_progress(
                    0.5,
                    Effect::particles(ParticleKind::Slap, layout.impact_point, style.color),
                )
                .at_progress(0.5, Effect::signal(SLAP_LANDED))
                .on_exit(Effect::signal("swing_finished")),
        ],
    )
}

/// 老板头部受击后仰：recoil 0–0.6 / settle 0.6–1.0，共 0.25 秒
pub fn head_recoil() -> AnimResult<AnimationSpec> {
    let turned = PoseDelta::rotated(Vec3::new(0.0, FRAC_PI_4, 0.0));

    AnimationSpec::new(
        HEAD_RECOIL,
        0.25,
        vec![
            Phase::new("recoil", 0.0, 0.6)
                .with_easing(EasingFunction::EaseOut)
                .with_pose(PoseDelta::IDENTITY, turned),
            Phase::new("settle", 0.6, 1.0)
                .with_easing(EasingFunction::EaseOutBounce)
                .with_pose(turned, PoseDelta::IDENTITY),
        ],
    )
}
