//! # Dispatch 模块
//!
//! 把动画核心产生的 [`Effect`] 分发到具体的宿主设施。
//!
//! ```text
//! TickResult.effects
//!   → EffectDispatcher::dispatch()
//!   → PlaySound       → AudioSink（delay > 0 时进入等待队列）
//!   → SpawnParticles  → ParticleSystem
//!   → Signal          → 返回给游戏循环
//! ```
//!
//! 分发失败（未知音效、设备错误）只记录日志，从不影响动画推进。

use slap_runtime::Effect;
use tracing::{trace, warn};

use crate::audio::AudioSink;
use crate::particles::ParticleSystem;

/// 等待播放的延迟音效
#[derive(Debug, Clone, PartialEq)]
struct PendingSound {
    due: f64,
    name: String,
}

/// 效果分发器
pub struct EffectDispatcher<A: AudioSink> {
    audio: A,
    particles: ParticleSystem,
    pending: Vec<PendingSound>,
    sfx_volume: f32,
    failures: usize,
}

impl<A: AudioSink> EffectDispatcher<A> {
    pub fn new(audio: A, particles: ParticleSystem, sfx_volume: f32) -> Self {
        Self {
            audio,
            particles,
            pending: Vec::new(),
            sfx_volume,
            failures: 0,
        }
    }

    /// 分发单个效果，信号效果返回信号名
    pub fn dispatch(&mut self, effect: &Effect, now: f64) -> Option<String> {
        trace!(effect = %effect.label(), now, "分发效果");
        match effect {
            Effect::PlaySound { name, delay } => {
                if *delay > 0.0 {
                    self.pending.push(PendingSound {
                        due: now + f64::from(*delay),
                        name: name.clone(),
                    });
                } else {
                    self.play_now(name);
                }
                None
            }
            Effect::SpawnParticles {
                kind,
                position,
                color,
            } => {
                self.particles.spawn(*kind, *position, *color);
                None
            }
            Effect::Signal { name } => Some(name.clone()),
        }
    }

    /// 按顺序分发一组效果，返回其中的信号
    pub fn dispatch_all(&mut self, effects: &[Effect], now: f64) -> Vec<String> {
        effects
            .iter()
            .filter_map(|effect| self.dispatch(effect, now))
            .collect()
    }

    /// 每帧调用：播放到期的延迟音效并推进粒子
    pub fn update(&mut self, now: f64, dt: f32) {
        if !self.pending.is_empty() {
            let (mut due, waiting): (Vec<_>, Vec<_>) =
                self.pending.drain(..).partition(|p| p.due <= now);
            self.pending = waiting;
            due.sort_by(|a, b| a.due.total_cmp(&b.due));
            for sound in due {
                self.play_now(&sound.name);
            }
        }
        self.particles.update(dt);
    }

    /// 循环播放环境音
    pub fn start_ambient(&mut self, name: &str, volume: f32) {
        if let Err(e) = self.audio.play_loop(name, volume) {
            self.failures += 1;
            warn!(name, error = %e, "环境音播放失败");
        }
    }

    fn play_now(&mut self, name: &str) {
        if let Err(e) = self.audio.play(name, self.sfx_volume) {
            self.failures += 1;
            warn!(name, error = %e, "音效播放失败");
        }
    }

    pub fn pending_sounds(&self) -> usize {
        self.pending.len()
    }

    /// 累计分发失败次数
    pub fn failures(&self) -> usize {
        self.failures
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::HeadlessAudio;
    use crate::config::AudioConfig;
    use slap_runtime::{Color, ParticleKind, Vec3};

    fn dispatcher() -> EffectDispatcher<HeadlessAudio> {
        EffectDispatcher::new(
            HeadlessAudio::new(&AudioConfig::default()),
            ParticleSystem::with_seed(11),
            0.5,
        )
    }

    fn played(d: &EffectDispatcher<HeadlessAudio>) -> Vec<&str> {
        d.audio().history().iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_routes_each_effect_kind() {
        let mut d = dispatcher();
        let signals = d.dispatch_all(
            &[
                Effect::sound("slap"),
                Effect::particles(ParticleKind::Slap, Vec3::ZERO, Color::RED),
                Effect::signal("slap_landed"),
            ],
            1.0,
        );
        assert_eq!(signals, vec!["slap_landed".to_string()]);
        assert_eq!(played(&d), vec!["slap"]);
        assert_eq!(d.audio().history()[0].volume, 0.5);
        assert_eq!(d.particles().live_particles(), 100);
    }

    #[test]
    fn test_delayed_sound_waits_for_due_time() {
        let mut d = dispatcher();
        d.dispatch(&Effect::sound("super-slap"), 1.0);
        d.dispatch(&Effect::sound_after("hurt", 0.2), 1.0);
        assert_eq!(played(&d), vec!["super-slap"]);
        assert_eq!(d.pending_sounds(), 1);

        d.update(1.1, 0.1);
        assert_eq!(played(&d), vec!["super-slap"]);

        d.update(1.25, 0.15);
        assert_eq!(played(&d), vec!["super-slap", "hurt"]);
        assert_eq!(d.pending_sounds(), 0);
    }

    #[test]
    fn test_late_frame_releases_in_due_order() {
        let mut d = dispatcher();
        d.dispatch(&Effect::sound_after("burp", 0.5), 0.0);
        d.dispatch(&Effect::sound_after("hurt", 0.2), 0.0);
        d.update(2.0, 2.0);
        assert_eq!(played(&d), vec!["hurt", "burp"]);
    }

    #[test]
    fn test_unknown_sound_is_counted_not_fatal() {
        let mut d = dispatcher();
        let signals = d.dispatch_all(
            &[Effect::sound("kazoo"), Effect::signal("slap_landed")],
            0.0,
        );
        assert_eq!(signals.len(), 1);
        assert_eq!(d.failures(), 1);
        assert!(played(&d).is_empty());
    }
}
