//! # Messages 模块
//!
//! 屏幕中央提示消息（模式选择、增益激活、成就解锁、模式完成）。
//!
//! 同一时刻只展示最新的一条，旧消息到期前仍保留在队列中用于日志回放。

use tracing::debug;

/// 消息类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// 普通提示（选择、增益）
    Info,
    /// 成就解锁
    Achievement,
    /// 模式完成
    Complete,
}

/// 单条消息
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
    /// 剩余显示时间（秒）
    pub remaining: f64,
}

impl Message {
    pub fn new(text: impl Into<String>, kind: MessageKind, duration: f64) -> Self {
        Self {
            text: text.into(),
            kind,
            remaining: duration,
        }
    }

    /// 更新状态，返回是否应该移除
    pub fn update(&mut self, dt: f64) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }
}

/// 消息队列
#[derive(Debug, Clone)]
pub struct MessageQueue {
    messages: Vec<Message>,
    duration: f64,
    /// 累计推送数量，用于区分新消息
    pushed: usize,
}

impl Default for MessageQueue {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl MessageQueue {
    pub fn new(duration: f64) -> Self {
        Self {
            messages: Vec::new(),
            duration,
            pushed: 0,
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.show(text, MessageKind::Info);
    }

    pub fn achievement(&mut self, text: impl Into<String>) {
        self.show(text, MessageKind::Achievement);
    }

    pub fn complete(&mut self, text: impl Into<String>) {
        self.show(text, MessageKind::Complete);
    }

    pub fn show(&mut self, text: impl Into<String>, kind: MessageKind) {
        let message = Message::new(text, kind, self.duration);
        debug!(text = %message.text, kind = ?kind, "显示提示");
        self.messages.push(message);
        self.pushed += 1;
    }

    /// 更新所有消息
    pub fn update(&mut self, dt: f64) {
        self.messages.retain_mut(|m| !m.update(dt));
    }

    /// 当前显示的消息（最新一条）
    pub fn current(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// 仍在显示期内的全部消息（旧到新）
    pub fn visible(&self) -> &[Message] {
        &self.messages
    }

    /// 累计推送数量
    pub fn pushed(&self) -> usize {
        self.pushed
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
