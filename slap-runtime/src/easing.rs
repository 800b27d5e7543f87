//! # Easing 模块
//!
//! 阶段内进度的缓动函数。输入在 [0, 1] 区间内；除 `Wave` 外输出也在 [0, 1]。

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// 缓动函数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    /// 匀速
    #[default]
    Linear,
    /// 三次缓入
    EaseIn,
    /// 三次缓出
    EaseOut,
    /// 三次缓入缓出
    EaseInOut,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    /// 弹性缓出
    EaseOutElastic,
    /// 弹跳缓出
    EaseOutBounce,
    /// 往返：0 → 1 → 0（`sin(πt)`），用于原地晃动
    PingPong,
    /// 整周期正弦：0 → 1 → 0 → -1 → 0（`sin(2πt)`），用于上下晃动
    Wave,
}

impl EasingFunction {
    /// 计算缓动值
    ///
    /// `t` 会先被限制在 [0, 1]。
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::EaseIn => t * t * t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::EaseInQuad => t * t,
            Self::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            Self::EaseOutSine => (t * PI / 2.0).sin(),
            Self::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Self::EaseOutElastic => ease_out_elastic(t),
            Self::EaseOutBounce => ease_out_bounce(t),
            Self::PingPong => (PI * t).sin().max(0.0),
            Self::Wave => (2.0 * PI * t).sin(),
        }
    }

    /// 终点值是否回到 0（往返型缓动）
    pub fn returns_to_start(&self) -> bool {
        matches!(self, Self::PingPong | Self::Wave)
    }
}

fn ease_out_elastic(t: f32) -> f32 {
    if t == 0.0 || t == 1.0 {
        return t;
    }
    let c4 = (2.0 * PI) / 3.0;
    2.0_f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
}

fn ease_out_bounce(t: f32) -> f32 {
    let n1 = 7.5625;
    let d1 = 2.75;

    if t < 1.0 / d1 {
        n1 * t * t
    } else if t < 2.0 / d1 {
        let t = t - 1.5 / d1;
        n1 * t * t + 0.75
    } else if t < 2.5 / d1 {
        let t = t - 2.25 / d1;
        n1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / d1;
        n1 * t * t + 0.984375
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        for easing in [
            EasingFunction::Linear,
            EasingFunction::EaseIn,
            EasingFunction::EaseOut,
            EasingFunction::EaseInOut,
            EasingFunction::EaseInOutQuad,
            EasingFunction::EaseOutSine,
            EasingFunction::EaseOutElastic,
        ] {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-5, "{easing:?}");
        }
        assert!((EasingFunction::EaseOutBounce.apply(1.0) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_clamp() {
        let easing = EasingFunction::Linear;
        assert_eq!(easing.apply(-0.5), 0.0);
        assert_eq!(easing.apply(1.5), 1.0);
    }

    #[test]
    fn test_ping_pong() {
        let easing = EasingFunction::PingPong;
        assert_eq!(easing.apply(0.0), 0.0);
        assert!((easing.apply(0.5) - 1.0).abs() < 1e-6);
        assert!(easing.apply(1.0).abs() < 1e-6);
        assert!(easing.returns_to_start());
        assert!(!EasingFunction::EaseOut.returns_to_start());
    }

    #[test]
    fn test_wave_dips_below_start() {
        let easing = EasingFunction::Wave;
        assert_eq!(easing.apply(0.0), 0.0);
        assert!((easing.apply(0.25) - 1.0).abs() < 1e-6);
        assert!((easing.apply(0.75) + 1.0).abs() < 1e-6);
        assert!(easing.apply(1.0).abs() < 1e-5);
        assert!(easing.returns_to_start());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&EasingFunction::EaseOutQuad).unwrap();
        assert_eq!(json, "\"ease_out_quad\"");
        let parsed: EasingFunction = serde_json::from_str("\"ping_pong\"").unwrap();
        assert_eq!(parsed, EasingFunction::PingPong);
    }
}
