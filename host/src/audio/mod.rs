//! # Audio 模块
//!
//! 音效输出。动画核心只产生 `PlaySound` 效果，真正的播放由实现 [`AudioSink`] 的后端完成：
//!
//! - [`HeadlessAudio`]：无设备后端，只记录与输出日志（默认）
//! - `RodioAudio`：rodio 播放后端（需要启用 `audio` feature）
//!
//! 播放失败只返回错误，由调用方记录日志，不影响动画推进。

use std::collections::BTreeSet;
use tracing::debug;

use crate::config::AudioConfig;
use crate::error::{HostError, HostResult};

#[cfg(feature = "audio")]
mod rodio_backend;

#[cfg(feature = "audio")]
pub use rodio_backend::RodioAudio;

/// 音效输出后端
pub trait AudioSink {
    /// 播放一次性音效
    fn play(&mut self, name: &str, volume: f32) -> HostResult<()>;

    /// 循环播放环境音
    fn play_loop(&mut self, name: &str, volume: f32) -> HostResult<()>;
}

impl<T: AudioSink + ?Sized> AudioSink for Box<T> {
    fn play(&mut self, name: &str, volume: f32) -> HostResult<()> {
        (**self).play(name, volume)
    }

    fn play_loop(&mut self, name: &str, volume: f32) -> HostResult<()> {
        (**self).play_loop(name, volume)
    }
}

/// 一次播放记录
#[derive(Debug, Clone, PartialEq)]
pub struct PlayedSound {
    pub name: String,
    pub volume: f32,
    pub looped: bool,
}

/// 无设备音频后端
///
/// 只接受配置中登记过的音效名，按顺序记录每次播放。
#[derive(Debug, Clone, Default)]
pub struct HeadlessAudio {
    known: BTreeSet<String>,
    history: Vec<PlayedSound>,
}

impl HeadlessAudio {
    pub fn new(config: &AudioConfig) -> Self {
        Self {
            known: config.sounds.keys().cloned().collect(),
            history: Vec::new(),
        }
    }

    /// 已播放的音效（按播放顺序）
    pub fn history(&self) -> &[PlayedSound] {
        &self.history
    }

    fn record(&mut self, name: &str, volume: f32, looped: bool) -> HostResult<()> {
        if !self.known.contains(name) {
            return Err(HostError::UnknownSound(name.to_string()));
        }
        debug!(name, volume, looped, "播放音效");
        self.history.push(PlayedSound {
            name: name.to_string(),
            volume,
            looped,
        });
        Ok(())
    }
}

impl AudioSink for HeadlessAudio {
    fn play(&mut self, name: &str, volume: f32) -> HostResult<()> {
        self.record(name, volume, false)
    }

    fn play_loop(&mut self, name: &str, volume: f32) -> HostResult<()> {
        self.record(name, volume, true)
    }
}

/// 按配置选择后端：启用 `audio` feature 且设备可用时使用 rodio，否则退回无设备后端
pub fn default_backend(config: &AudioConfig) -> Box<dyn AudioSink> {
    #[cfg(feature = "audio")]
    {
        match RodioAudio::new(config.clone()) {
            Ok(audio) => return Box::new(audio),
            Err(e) => tracing::warn!(error = %e, "音频设备初始化失败，使用无设备后端"),
        }
    }
    Box::new(HeadlessAudio::new(config))
}
