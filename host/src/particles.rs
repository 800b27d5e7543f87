//! # Particles 模块
//!
//! 一次性粒子爆发（掌掴碎屑、进食碎屑、冲击火花）。
//!
//! 粒子与动画驱动器相互独立：生成后按自身速度与重力推进，
//! 到达寿命后整组移除，不影响任何游戏逻辑。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slap_runtime::{Color, ParticleKind, Vec3};
use tracing::trace;

/// y 方向重力加速度（单位/秒²）
pub const GRAVITY: f32 = 0.01;

/// 每组粒子的寿命（秒）
pub const BURST_LIFETIME: f32 = 1.5;

/// 每种粒子的生成数量
pub fn burst_size(kind: ParticleKind) -> usize {
    match kind {
        ParticleKind::Slap => 100,
        ParticleKind::Eating | ParticleKind::Impact => 50,
    }
}

/// 每种粒子的绘制尺寸
pub fn point_size(kind: ParticleKind) -> f32 {
    match kind {
        ParticleKind::Slap => 0.03,
        ParticleKind::Eating | ParticleKind::Impact => 0.05,
    }
}

/// 单个粒子
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
}

/// 一组同时生成的粒子
#[derive(Debug, Clone)]
pub struct ParticleBurst {
    pub kind: ParticleKind,
    pub color: Color,
    /// 绘制尺寸
    pub size: f32,
    pub particles: Vec<Particle>,
    /// 已存活时间（秒）
    pub age: f32,
}

impl ParticleBurst {
    /// 透明度，最后 30% 寿命线性淡出
    pub fn opacity(&self) -> f32 {
        let fade_start = BURST_LIFETIME * 0.7;
        if self.age <= fade_start {
            0.8
        } else {
            0.8 * (1.0 - (self.age - fade_start) / (BURST_LIFETIME - fade_start)).max(0.0)
        }
    }

    /// 推进一帧，返回是否应该移除
    fn update(&mut self, dt: f32) -> bool {
        for p in &mut self.particles {
            p.position = p.position
                + Vec3::new(p.velocity.x * dt, p.velocity.y * dt, p.velocity.z * dt);
            p.velocity.y -= GRAVITY * dt;
        }
        self.age += dt;
        self.age >= BURST_LIFETIME
    }
}

/// 粒子系统
#[derive(Debug)]
pub struct ParticleSystem {
    bursts: Vec<ParticleBurst>,
    rng: StdRng,
    spawned_total: usize,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// 使用固定种子（测试与回放）
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            bursts: Vec::new(),
            rng,
            spawned_total: 0,
        }
    }

    /// 在指定位置生成一组粒子
    ///
    /// 初速度：x、z ∈ [-0.1, 0.1)，y ∈ [0, 0.2)。
    pub fn spawn(&mut self, kind: ParticleKind, position: Vec3, color: Color) {
        let count = burst_size(kind);
        let particles = (0..count)
            .map(|_| Particle {
                position,
                velocity: Vec3::new(
                    self.rng.gen_range(-0.1..0.1),
                    self.rng.gen_range(0.0..0.2),
                    self.rng.gen_range(-0.1..0.1),
                ),
            })
            .collect();

        trace!(kind = kind.as_str(), count, color = %color, "生成粒子");
        self.bursts.push(ParticleBurst {
            kind,
            color,
            size: point_size(kind),
            particles,
            age: 0.0,
        });
        self.spawned_total += count;
    }

    /// 推进所有粒子，移除到期的粒子组
    pub fn update(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.bursts.retain_mut(|burst| !burst.update(dt));
    }

    pub fn bursts(&self) -> &[ParticleBurst] {
        &self.bursts
    }

    /// 当前存活的粒子数
    pub fn live_particles(&self) -> usize {
        self.bursts.iter().map(|b| b.particles.len()).sum()
    }

    /// 累计生成的粒子数
    pub fn spawned_total(&self) -> usize {
        self.spawned_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_sizes() {
        let mut system = ParticleSystem::with_seed(1);
        system.spawn(ParticleKind::Slap, Vec3::ZERO, Color::RED);
        system.spawn(ParticleKind::Eating, Vec3::ZERO, Color::EMBER);
        assert_eq!(system.live_particles(), 150);
        assert_eq!(system.bursts().len(), 2);
        assert_eq!(system.bursts()[0].size, 0.03);
        assert_eq!(system.bursts()[1].size, 0.05);
    }

    #[test]
    fn test_initial_velocity_ranges() {
        let mut system = ParticleSystem::with_seed(7);
        system.spawn(ParticleKind::Slap, Vec3::new(1.0, 2.0, 3.0), Color::WHITE);
        for p in &system.bursts()[0].particles {
            assert_eq!(p.position, Vec3::new(1.0, 2.0, 3.0));
            assert!((-0.1..0.1).contains(&p.velocity.x));
            assert!((0.0..0.2).contains(&p.velocity.y));
            assert!((-0.1..0.1).contains(&p.velocity.z));
        }
    }

    #[test]
    fn test_gravity_pulls_velocity_down() {
        let mut system = ParticleSystem::with_seed(3);
        system.spawn(ParticleKind::Impact, Vec3::ZERO, Color::WHITE);
        let before: Vec<f32> = system.bursts()[0].particles.iter().map(|p| p.velocity.y).collect();
        system.update(0.5);
        for (p, vy) in system.bursts()[0].particles.iter().zip(before) {
            assert!((p.velocity.y - (vy - GRAVITY * 0.5)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_bursts_expire_after_lifetime() {
        let mut system = ParticleSystem::with_seed(5);
        system.spawn(ParticleKind::Slap, Vec3::ZERO, Color::RED);
        system.update(1.2);
        assert_eq!(system.bursts().len(), 1);
        assert!(system.bursts()[0].opacity() < 0.8);
        system.update(0.4);
        assert!(system.bursts().is_empty());
        assert_eq!(system.spawned_total(), 100);
    }
}
