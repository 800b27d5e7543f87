//! rodio 播放后端

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

use super::AudioSink;
use crate::config::AudioConfig;
use crate::error::{HostError, HostResult};

/// rodio 音频后端
pub struct RodioAudio {
    /// 音频输出流（必须保持存活）
    stream: OutputStream,
    config: AudioConfig,
    /// 环境音播放器
    ambient: Option<Sink>,
}

impl RodioAudio {
    pub fn new(config: AudioConfig) -> HostResult<Self> {
        let stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| HostError::Audio(format!("无法初始化音频输出: {e}")))?;
        Ok(Self {
            stream,
            config,
            ambient: None,
        })
    }

    fn decode(path: &Path) -> HostResult<Decoder<BufReader<File>>> {
        let file = File::open(path)?;
        Decoder::new(BufReader::new(file))
            .map_err(|e| HostError::Audio(format!("无法解码 {}: {e}", path.display())))
    }
}

impl AudioSink for RodioAudio {
    fn play(&mut self, name: &str, volume: f32) -> HostResult<()> {
        let path = self.config.sound_path(name)?;
        let source = Self::decode(&path)?;

        // 一次性播放器，分离后自动播放完毕
        let sink = Sink::connect_new(self.stream.mixer());
        sink.set_volume(volume);
        sink.append(source);
        sink.detach();
        debug!(name, path = %path.display(), volume, "播放音效");
        Ok(())
    }

    fn play_loop(&mut self, name: &str, volume: f32) -> HostResult<()> {
        let path = self.config.sound_path(name)?;
        let source = Self::decode(&path)?;

        if let Some(old) = self.ambient.take() {
            old.stop();
        }
        let sink = Sink::connect_new(self.stream.mixer());
        sink.set_volume(volume);
        sink.append(source.repeat_infinite());
        self.ambient = Some(sink);
        debug!(name, path = %path.display(), volume, "循环播放环境音");
        Ok(())
    }
}
