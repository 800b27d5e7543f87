//! # Input 模块
//!
//! 输入映射：把原始输入事件（按键、按钮点击）转换为 [`GameCommand`]。
//!
//! ## 按键
//!
//! | 按键 | 命令 |
//! |------|------|
//! | `1` | 激活超级掌掴增益 |
//! | `2` | 激活连击掌掴增益 |
//!
//! 其他交互都来自按钮点击。事件也可以从文本解析（无界面驱动脚本使用），
//! 格式为 `key:<字符>` 或 `click:<按钮>`，例如 `click:slap_mode:super`。

use std::str::FromStr;
use thiserror::Error;
use tracing::trace;

use crate::game::{GameMode, SlapKind};

/// 界面按钮
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Slap,
    Eat,
    /// 掌掴类型选择按钮
    SlapMode(SlapKind),
    /// 游戏模式选择按钮
    GameMode(GameMode),
    /// 打开说明面板
    Instructions,
    /// 关闭说明面板
    CloseInstructions,
}

/// 原始输入事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyPressed(char),
    Clicked(Button),
}

/// 游戏命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCommand {
    Slap,
    Eat,
    SelectSlapKind(SlapKind),
    ActivatePowerUp(SlapKind),
    SelectMode(GameMode),
    ShowInstructions(bool),
}

/// 输入映射器
#[derive(Debug, Default, Clone, Copy)]
pub struct InputMapper;

impl InputMapper {
    pub fn new() -> Self {
        Self
    }

    /// 映射单个事件，无对应命令时返回 None
    pub fn map(&self, event: InputEvent) -> Option<GameCommand> {
        let command = match event {
            InputEvent::KeyPressed('1') => Some(GameCommand::ActivatePowerUp(SlapKind::Super)),
            InputEvent::KeyPressed('2') => Some(GameCommand::ActivatePowerUp(SlapKind::Combo)),
            InputEvent::KeyPressed(_) => None,
            InputEvent::Clicked(button) => Some(match button {
                Button::Slap => GameCommand::Slap,
                Button::Eat => GameCommand::Eat,
                Button::SlapMode(kind) => GameCommand::SelectSlapKind(kind),
                Button::GameMode(mode) => GameCommand::SelectMode(mode),
                Button::Instructions => GameCommand::ShowInstructions(true),
                Button::CloseInstructions => GameCommand::ShowInstructions(false),
            }),
        };
        trace!(?event, ?command, "输入映射");
        command
    }
}

/// 输入事件解析错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("无法解析输入事件 '{0}'")]
pub struct ParseInputError(String);

impl FromStr for Button {
    type Err = ParseInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseInputError(s.to_string());
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };
        match (name, arg) {
            ("slap", None) => Ok(Button::Slap),
            ("eat", None) => Ok(Button::Eat),
            ("instructions", None) => Ok(Button::Instructions),
            ("close_instructions", None) => Ok(Button::CloseInstructions),
            ("slap_mode", Some(kind)) => kind.parse().map(Button::SlapMode).map_err(|_| err()),
            ("mode", Some(mode)) => mode.parse().map(Button::GameMode).map_err(|_| err()),
            _ => Err(err()),
        }
    }
}

impl FromStr for InputEvent {
    type Err = ParseInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseInputError(s.to_string());
        let (source, rest) = s.split_once(':').ok_or_else(err)?;
        match source {
            "key" => {
                let mut chars = rest.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(InputEvent::KeyPressed(c)),
                    _ => Err(err()),
                }
            }
            "click" => rest.parse().map(InputEvent::Clicked).map_err(|_| err()),
            _ => Err(err()),
        }
    }
}
