//! # Error 模块
//!
//! 宿主层错误类型。

use slap_runtime::AnimError;
use thiserror::Error;

/// 宿主层统一错误类型
#[derive(Error, Debug)]
pub enum HostError {
    /// 文件读写失败
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 解析 / 序列化失败
    #[error("JSON 错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 动画核心错误
    #[error("动画错误: {0}")]
    Anim(#[from] AnimError),

    /// 配置内容无效
    #[error("配置错误: {0}")]
    Config(String),

    /// 音效名未在配置中登记
    #[error("未知音效 '{0}'")]
    UnknownSound(String),

    /// 音频设备或解码失败
    #[error("音频错误: {0}")]
    Audio(String),
}

/// Result 类型别名
pub type HostResult<T> = Result<T, HostError>;
