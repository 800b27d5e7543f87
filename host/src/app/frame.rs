//! 帧更新

use slap_runtime::{ActorId, PoseDelta, presets};
use tracing::{debug, trace};

use super::SlapGame;
use crate::audio::AudioSink;

/// 单帧输出，交给渲染层
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// 本帧有动画驱动的角色及其姿态偏移
    pub poses: Vec<(ActorId, PoseDelta)>,
    /// 本帧收到的应用层信号
    pub signals: Vec<String>,
    /// 本帧动画结束的角色
    pub finished: Vec<ActorId>,
}

impl<A: AudioSink> SlapGame<A> {
    /// 推进一帧
    ///
    /// `now` 为单调递增的秒数；第一帧的 dt 视为 0。
    pub fn update(&mut self, now: f64) -> Frame {
        let dt = self.last_frame.map_or(0.0, |last| (now - last).max(0.0));
        self.last_frame = Some(now);

        for kind in self.power_ups.update(now) {
            debug!(kind = %kind, "增益结束");
        }

        let mut frame = Frame::default();
        for (_handle, actor, result) in self.sequencer.tick_all(now) {
            let signals = self.dispatcher.dispatch_all(&result.effects, now);
            for signal in signals {
                self.on_signal(&signal, now);
                frame.signals.push(signal);
            }

            self.poses.insert(actor.clone(), result.pose);
            if result.done {
                frame.finished.push(actor.clone());
            }
            frame.poses.push((actor, result.pose));
        }

        self.dispatcher.update(now, dt as f32);

        let events = self.state.update(dt);
        self.apply_events(events);
        self.messages.update(dt);

        frame
    }

    fn on_signal(&mut self, signal: &str, now: f64) {
        trace!(signal, now, "收到信号");
        if signal != presets::SLAP_LANDED {
            return;
        }
        self.stats.slaps_landed += 1;

        let recoil = match self.library.get(presets::HEAD_RECOIL) {
            Ok(spec) => spec,
            Err(e) => {
                debug!(error = %e, "没有后仰动画");
                return;
            }
        };
        if let Err(e) = self.sequencer.start(recoil, self.boss.clone(), now) {
            debug!(error = %e, "老板后仰动画未启动");
        }
    }
}
