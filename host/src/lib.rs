//! # Host 层
//!
//! Slap-the-Boss 的宿主层实现。
//!
//! ## 架构说明
//!
//! Host 层负责：
//! - 游戏规则（血量、计数、成就、模式、增益）
//! - 把动画核心产生的效果分发到音频、粒子与游戏循环
//! - 输入映射与提示消息
//! - 配置加载与最高分存档
//!
//! Host 层不包含动画时间线逻辑，只负责驱动 `slap-runtime` 并执行它产生的效果。
//! 渲染层通过 [`SlapGame::update`] 返回的姿态偏移驱动场景。

pub mod app;
pub mod audio;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod game;
pub mod input;
pub mod messages;
pub mod particles;
pub mod score_store;

pub use app::{BOSS, CommandOutcome, EMPLOYEE, Frame, Hud, SessionStats, SlapGame};
pub use audio::{AudioSink, HeadlessAudio, PlayedSound};
pub use config::{AppConfig, AudioConfig, GameRules, SlapAnimation};
pub use dispatch::EffectDispatcher;
pub use error::{HostError, HostResult};
pub use game::{Achievement, GameEvent, GameMode, GameState, HealthBand, PowerUps, SlapKind};
pub use input::{Button, GameCommand, InputEvent, InputMapper};
pub use messages::{Message, MessageKind, MessageQueue};
pub use particles::ParticleSystem;
pub use score_store::HighScoreStore;

#[cfg(feature = "audio")]
pub use audio::RodioAudio;
