//! 命令处理

use slap_runtime::{ActorId, presets};
use tracing::{debug, info};

use super::SlapGame;
use crate::audio::AudioSink;
use crate::config::SlapAnimation;
use crate::error::HostResult;
use crate::game::SlapKind;
use crate::input::{GameCommand, InputEvent};

/// 命令执行结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// 命令已生效
    Applied,
    /// 角色正在播放动画，请求被丢弃
    Busy,
    /// 命令无效果（例如增益已激活）
    Ignored,
}

impl<A: AudioSink> SlapGame<A> {
    /// 处理原始输入事件，没有对应命令时返回 None
    pub fn handle_input(&mut self, event: InputEvent, now: f64) -> HostResult<Option<CommandOutcome>> {
        match self.input.map(event) {
            Some(command) => self.execute(command, now).map(Some),
            None => Ok(None),
        }
    }

    /// 执行游戏命令
    pub fn execute(&mut self, command: GameCommand, now: f64) -> HostResult<CommandOutcome> {
        match command {
            GameCommand::Slap => self.slap(now),
            GameCommand::Eat => self.eat(now),
            GameCommand::SelectSlapKind(kind) => {
                self.selected_kind = kind;
                self.messages.info(kind.selected_message());
                Ok(CommandOutcome::Applied)
            }
            GameCommand::ActivatePowerUp(kind) => {
                if self.power_ups.activate(kind, now) {
                    self.messages.info(kind.activated_message());
                    Ok(CommandOutcome::Applied)
                } else {
                    Ok(CommandOutcome::Ignored)
                }
            }
            GameCommand::SelectMode(mode) => {
                self.state.set_mode(mode);
                Ok(CommandOutcome::Applied)
            }
            GameCommand::ShowInstructions(visible) => {
                self.instructions_visible = visible;
                Ok(CommandOutcome::Applied)
            }
        }
    }

    /// 在角色上播放动画库中的动画
    ///
    /// 角色正在播放其它动画时返回 `Busy`，不改变任何状态。
    pub fn play(&mut self, animation: &str, actor: &ActorId, now: f64) -> HostResult<CommandOutcome> {
        let spec = self.library.get(animation)?;
        match self.sequencer.start(spec, actor.clone(), now) {
            Ok(handle) => {
                debug!(animation, %actor, run = %handle.id(), now, "播放动画");
                Ok(CommandOutcome::Applied)
            }
            Err(e) if e.is_busy() => {
                self.stats.rejected_busy += 1;
                debug!(animation, %actor, now, "角色正在动画中，忽略请求");
                Ok(CommandOutcome::Busy)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn slap_animation(&self, kind: SlapKind) -> String {
        match self.config.slap_animation {
            SlapAnimation::ArmSwing => kind.swing_style().animation_name(),
            SlapAnimation::Reach => presets::SLAP.to_string(),
        }
    }

    fn slap(&mut self, now: f64) -> HostResult<CommandOutcome> {
        let kind = self.power_ups.effective_kind(self.selected_kind);
        let animation = self.slap_animation(kind);
        let employee = self.employee.clone();

        let outcome = self.play(&animation, &employee, now)?;
        if outcome == CommandOutcome::Applied {
            self.stats.slaps_started += 1;
            info!(kind = %kind, now, "掌掴开始");
            let events = self.state.record_slap(kind);
            self.apply_events(events);
        }
        Ok(outcome)
    }

    fn eat(&mut self, now: f64) -> HostResult<CommandOutcome> {
        let employee = self.employee.clone();
        let outcome = self.play(presets::EAT, &employee, now)?;
        if outcome == CommandOutcome::Applied {
            self.stats.meals += 1;
            info!(now, "进食开始");
        }
        Ok(outcome)
    }
}
