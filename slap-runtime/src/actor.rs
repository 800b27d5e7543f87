//! # Actor 模块
//!
//! 角色标识与动画运行实例标识。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AnimError, AnimResult};

/// 角色标识
///
/// 每个被动画驱动的角色（员工、老板……）都有一个非空的字符串标识。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActorId(String);

impl ActorId {
    /// 创建角色标识，空字符串（或纯空白）会被拒绝
    pub fn new(id: impl Into<String>) -> AnimResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(AnimError::InvalidActor);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ActorId {
    type Error = AnimError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ActorId> for String {
    fn from(id: ActorId) -> Self {
        id.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 动画运行实例 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(pub u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RunId({})", self.0)
    }
}

/// 运行句柄
///
/// 由 `PhaseSequencer::start` 返回，用于后续 `tick` / `cancel`。
/// 运行结束或被取消后句柄失效。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunHandle(pub(crate) RunId);

impl RunHandle {
    /// 获取内部运行 ID
    pub fn id(&self) -> RunId {
        self.0
    }
}
