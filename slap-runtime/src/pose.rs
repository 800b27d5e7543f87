//! # Pose 模块
//!
//! 三维向量与肢体姿态偏移。
//!
//! 姿态偏移是相对于肢体静止姿态的位移和旋转（欧拉角，弧度），
//! 渲染层把它叠加到肢体的原始变换上。

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// 三维向量
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// 线性插值
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    /// 与另一个向量的距离
    pub fn distance(self, other: Self) -> f32 {
        let d = other - self;
        (d.x * d.x + d.y * d.y + d.z * d.z).sqrt()
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl From<(f32, f32, f32)> for Vec3 {
    fn from((x, y, z): (f32, f32, f32)) -> Self {
        Self { x, y, z }
    }
}

/// 姿态偏移
///
/// 既用作阶段的起止锚点，也是每一帧 `tick` 的输出。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseDelta {
    /// 位置偏移
    #[serde(default)]
    pub position: Vec3,
    /// 旋转偏移（弧度）
    #[serde(default)]
    pub rotation: Vec3,
}

impl PoseDelta {
    /// 无偏移
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
    };

    /// 只有位置偏移
    pub const fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
        }
    }

    /// 只有旋转偏移
    pub const fn rotated(rotation: Vec3) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation,
        }
    }

    /// 线性插值到另一个姿态
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            rotation: self.rotation.lerp(other.rotation, t),
        }
    }
}
