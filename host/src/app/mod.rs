//! # App 模块
//!
//! 游戏主对象 [`SlapGame`]：把动画驱动器、游戏规则、效果分发、提示消息与存档串起来。
//!
//! ## 每帧流程
//!
//! ```text
//! 输入事件 → InputMapper → GameCommand → SlapGame::execute()
//!   → PhaseSequencer::start()（员工忙碌时返回 Busy，不改变任何状态）
//!
//! SlapGame::update(now)
//!   → PowerUps::update()            增益到期
//!   → PhaseSequencer::tick_all()    姿态 + 到期效果
//!   → EffectDispatcher              音效 / 粒子 / 信号
//!   → 信号 slap_landed              老板头部后仰
//!   → GameState::update()           模式计时与完成判定
//!   → MessageQueue::update()
//! ```

mod commands;
mod frame;

pub use commands::CommandOutcome;
pub use frame::Frame;

use serde::Serialize;
use slap_runtime::{ActorId, AnimationLibrary, PhaseSequencer, PoseDelta};
use std::collections::HashMap;
use std::fs;
use tracing::{info, warn};

use crate::audio::{self, AudioSink};
use crate::config::AppConfig;
use crate::dispatch::EffectDispatcher;
use crate::error::HostResult;
use crate::game::{Achievement, GameEvent, GameMode, GameState, PowerUps, SlapKind};
use crate::input::InputMapper;
use crate::messages::MessageQueue;
use crate::particles::ParticleSystem;
use crate::score_store::HighScoreStore;

/// 挥掌的员工
pub const EMPLOYEE: &str = "employee";
/// 挨打的老板
pub const BOSS: &str = "boss";

/// 环境音音效名
const AMBIENT_SOUND: &str = "ambient";

/// 会话统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    /// 被接受的掌掴
    pub slaps_started: u32,
    /// 因角色忙碌被拒绝的请求
    pub rejected_busy: u32,
    /// 命中信号次数
    pub slaps_landed: u32,
    /// 进食次数
    pub meals: u32,
}

/// 界面状态快照
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub mode: GameMode,
    pub boss_health: f32,
    pub health_fraction: f32,
    pub health_color: &'static str,
    pub time_remaining: Option<f64>,
    pub slap_count: u32,
    pub high_score: u32,
    pub selected_kind: SlapKind,
    pub active_power_ups: Vec<SlapKind>,
    pub achievements: Vec<(Achievement, bool)>,
    pub message: Option<String>,
    pub instructions_visible: bool,
}

/// 游戏主对象
pub struct SlapGame<A: AudioSink = Box<dyn AudioSink>> {
    config: AppConfig,
    library: AnimationLibrary,
    sequencer: PhaseSequencer,
    state: GameState,
    power_ups: PowerUps,
    selected_kind: SlapKind,
    dispatcher: EffectDispatcher<A>,
    messages: MessageQueue,
    store: HighScoreStore,
    input: InputMapper,
    employee: ActorId,
    boss: ActorId,
    /// 各角色最近一帧的姿态偏移
    poses: HashMap<ActorId, PoseDelta>,
    last_frame: Option<f64>,
    instructions_visible: bool,
    stats: SessionStats,
}

impl SlapGame {
    /// 使用默认音频后端创建游戏
    pub fn new(config: AppConfig) -> HostResult<Self> {
        let audio = audio::default_backend(&config.audio);
        Self::with_audio(config, audio, ParticleSystem::new())
    }
}

impl<A: AudioSink> SlapGame<A> {
    /// 使用指定音频后端与粒子系统创建游戏
    pub fn with_audio(config: AppConfig, audio: A, particles: ParticleSystem) -> HostResult<Self> {
        config.validate()?;

        let styles: Vec<_> = SlapKind::ALL.iter().map(SlapKind::swing_style).collect();
        let mut library = AnimationLibrary::with_presets(&config.rig, &styles)?;
        if let Some(path) = &config.animations_path {
            let json = fs::read_to_string(path)?;
            let count = library.load_json(&json)?;
            info!(path = %path.display(), count, "已加载额外动画");
        }

        let store = HighScoreStore::new(&config.high_score_path);
        let high_score = store.load();
        info!(
            high_score,
            path = %store.path().display(),
            animations = library.len(),
            "游戏初始化完成"
        );

        Ok(Self {
            library,
            sequencer: PhaseSequencer::new(),
            state: GameState::new(config.rules.clone(), high_score),
            power_ups: PowerUps::new(&config.rules),
            selected_kind: SlapKind::Normal,
            dispatcher: EffectDispatcher::new(
                audio,
                particles,
                config.audio.effective_sfx_volume(),
            ),
            messages: MessageQueue::new(config.rules.message_secs),
            store,
            input: InputMapper::new(),
            employee: ActorId::new(EMPLOYEE)?,
            boss: ActorId::new(BOSS)?,
            poses: HashMap::new(),
            last_frame: None,
            instructions_visible: false,
            stats: SessionStats::default(),
            config,
        })
    }

    /// 开始循环播放环境音
    pub fn start_ambient(&mut self) {
        let volume = self.config.audio.effective_ambient_volume();
        self.dispatcher.start_ambient(AMBIENT_SOUND, volume);
    }

    /// 把规则层事件转换为提示消息与存档写入
    fn apply_events(&mut self, events: Vec<GameEvent>) {
        for event in events {
            match event {
                GameEvent::Damaged { .. } => {}
                GameEvent::AchievementUnlocked(achievement) => {
                    self.messages.achievement(achievement.unlock_message());
                }
                GameEvent::NewHighScore(score) => {
                    if let Err(e) = self.store.save(score) {
                        warn!(score, error = %e, "保存最高分失败");
                    }
                }
                GameEvent::ModeCompleted(mode) => {
                    if let Some(text) = mode.completion_message() {
                        self.messages.complete(text);
                    }
                }
            }
        }
    }

    /// 当前界面状态
    pub fn hud(&self) -> Hud {
        Hud {
            mode: self.state.mode(),
            boss_health: self.state.boss_health(),
            health_fraction: self.state.health_fraction(),
            health_color: self.state.health_band().color(),
            time_remaining: self.state.time_remaining(),
            slap_count: self.state.slap_count(),
            high_score: self.state.high_score(),
            selected_kind: self.selected_kind,
            active_power_ups: [SlapKind::Super, SlapKind::Combo]
                .into_iter()
                .filter(|kind| self.power_ups.is_active(*kind))
                .collect(),
            achievements: self.state.achievements().entries(),
            message: self.messages.current().map(|m| m.text.clone()),
            instructions_visible: self.instructions_visible,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn library(&self) -> &AnimationLibrary {
        &self.library
    }

    pub fn sequencer(&self) -> &PhaseSequencer {
        &self.sequencer
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn power_ups(&self) -> &PowerUps {
        &self.power_ups
    }

    pub fn selected_kind(&self) -> SlapKind {
        self.selected_kind
    }

    pub fn dispatcher(&self) -> &EffectDispatcher<A> {
        &self.dispatcher
    }

    pub fn messages(&self) -> &MessageQueue {
        &self.messages
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn employee(&self) -> &ActorId {
        &self.employee
    }

    pub fn boss(&self) -> &ActorId {
        &self.boss
    }

    /// 角色最近一帧的姿态偏移，未动过的角色处于静止姿态
    pub fn pose_of(&self, actor: &ActorId) -> PoseDelta {
        self.poses
            .get(actor)
            .copied()
            .unwrap_or(PoseDelta::IDENTITY)
    }

    /// 员工是否正在播放动画
    pub fn is_employee_busy(&self) -> bool {
        self.sequencer.is_busy(&self.employee)
    }
}
