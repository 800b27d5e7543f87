//! # ScoreStore 模块
//!
//! 最高分持久化。文件是一个小型 JSON 键值表：
//!
//! ```text
//! { "highScore": 12 }
//! ```
//!
//! 其他键原样保留，写入时只覆盖 `highScore`。

use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::HostResult;

const HIGH_SCORE_KEY: &str = "highScore";

/// 最高分存储
#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取最高分
    ///
    /// 文件不存在时返回 0；内容损坏时记录警告并返回 0。
    pub fn load(&self) -> u32 {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "最高分文件不存在");
            return 0;
        }
        match self.read_table() {
            Ok(table) => match table.get(HIGH_SCORE_KEY) {
                Some(value) => parse_score(value).unwrap_or_else(|| {
                    warn!(path = %self.path.display(), value = %value, "最高分格式无效，按 0 处理");
                    0
                }),
                None => 0,
            },
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "读取最高分失败，按 0 处理");
                0
            }
        }
    }

    /// 写入最高分
    pub fn save(&self, score: u32) -> HostResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // 保留文件中的其他键；旧文件损坏时直接覆盖
        let mut table = self.read_table().unwrap_or_default();
        table.insert(HIGH_SCORE_KEY.to_string(), Value::from(score));
        fs::write(&self.path, serde_json::to_string_pretty(&table)?)?;

        debug!(path = %self.path.display(), score, "最高分已保存");
        Ok(())
    }

    fn read_table(&self) -> HostResult<Map<String, Value>> {
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// 兼容数字与数字字符串两种写法
fn parse_score(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = HighScoreStore::new(dir.path().join("highscore.json"));
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn test_save_creates_parent_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = HighScoreStore::new(dir.path().join("saves/highscore.json"));
        store.save(7).unwrap();
        assert_eq!(store.load(), 7);
        store.save(9).unwrap();
        assert_eq!(store.load(), 9);
    }

    #[test]
    fn test_corrupt_file_is_zero_and_overwritable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highscore.json");
        fs::write(&path, "not json at all").unwrap();

        let store = HighScoreStore::new(&path);
        assert_eq!(store.load(), 0);
        store.save(3).unwrap();
        assert_eq!(store.load(), 3);
    }

    #[test]
    fn test_string_score_and_other_keys_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highscore.json");
        fs::write(&path, r#"{ "highScore": "12", "volume": 0.5 }"#).unwrap();

        let store = HighScoreStore::new(&path);
        assert_eq!(store.load(), 12);
        store.save(13).unwrap();

        let table: Map<String, Value> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(table["highScore"], Value::from(13));
        assert_eq!(table["volume"], Value::from(0.5));
    }
}
