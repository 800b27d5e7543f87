//! # Error 模块
//!
//! 定义 slap-runtime 中使用的错误类型。

use thiserror::Error;

use crate::actor::{ActorId, RunId};

/// 动画核心错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimError {
    /// 角色正在被另一个动画驱动
    #[error("角色 '{actor}' 正在播放动画 {run}，请求被丢弃")]
    ActorBusy { actor: ActorId, run: RunId },

    /// 运行实例不存在（已完成、已取消或从未创建）
    #[error("动画运行实例 {run} 不存在")]
    RunNotFound { run: RunId },

    /// 动画定义不满足阶段划分约束
    #[error("动画 '{name}' 定义无效: {reason}")]
    InvalidSpec { name: String, reason: String },

    /// 角色标识为空
    #[error("角色标识不能为空")]
    InvalidActor,

    /// 动画库中已存在同名动画
    #[error("动画 '{name}' 已注册")]
    DuplicateAnimation { name: String },

    /// 动画库中不存在该动画
    #[error("动画 '{name}' 未注册")]
    UnknownAnimation { name: String },
}

impl AnimError {
    pub(crate) fn invalid_spec(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSpec {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// 是否为可恢复的拒绝（调用方直接丢弃请求即可）
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::ActorBusy { .. })
    }
}

/// Result 类型别名
pub type AnimResult<T> = Result<T, AnimError>;
