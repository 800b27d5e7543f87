//! # Library 模块
//!
//! 动画库：按名称保存已校验的动画定义。
//!
//! 动画定义属于配置，由动画库持有；运行实例只共享 `Arc` 引用。

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::error::{AnimError, AnimResult};
use crate::phase::AnimationSpec;
use crate::presets::{self, RigLayout, SwingStyle};

/// 动画库
#[derive(Debug, Default, Clone)]
pub struct AnimationLibrary {
    specs: HashMap<String, Arc<AnimationSpec>>,
}

impl AnimationLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建包含全部内置动画的动画库
    ///
    /// 每个挥臂风格注册为一个 `arm_swing.<style>` 动画。
    pub fn with_presets(layout: &RigLayout, styles: &[SwingStyle]) -> AnimResult<Self> {
        let mut library = Self::new();
        library.register(presets::slap(layout)?)?;
        library.register(presets::eat(layout)?)?;
        library.register(presets::head_recoil()?)?;
        for style in styles {
            library.register(presets::arm_swing(style, layout)?)?;
        }
        Ok(library)
    }

    /// 注册动画
    ///
    /// 同名动画已存在时返回 `DuplicateAnimation`。
    pub fn register(&mut self, spec: AnimationSpec) -> AnimResult<Arc<AnimationSpec>> {
        if self.specs.contains_key(spec.name()) {
            return Err(AnimError::DuplicateAnimation {
                name: spec.name().to_string(),
            });
        }
        let spec = Arc::new(spec);
        self.specs.insert(spec.name().to_string(), Arc::clone(&spec));
        Ok(spec)
    }

    /// 从 JSON 数组加载动画定义，返回加载数量
    ///
    /// 任何一个定义无效都会导致整体失败，动画库保持不变。
    pub fn load_json(&mut self, json: &str) -> AnimResult<usize> {
        let specs: Vec<AnimationSpec> =
            serde_json::from_str(json).map_err(|e| AnimError::InvalidSpec {
                name: "<json>".to_string(),
                reason: e.to_string(),
            })?;

        if let Some(dup) = specs.iter().enumerate().find_map(|(i, spec)| {
            let clash = self.specs.contains_key(spec.name())
                || specs[..i].iter().any(|s| s.name() == spec.name());
            clash.then(|| spec.name().to_string())
        }) {
            return Err(AnimError::DuplicateAnimation { name: dup });
        }

        let count = specs.len();
        for spec in specs {
            self.register(spec)?;
        }
        info!(count, "从 JSON 加载动画定义");
        Ok(count)
    }

    /// 获取动画定义
    pub fn get(&self, name: &str) -> AnimResult<Arc<AnimationSpec>> {
        self.specs
            .get(name)
            .cloned()
            .ok_or_else(|| AnimError::UnknownAnimation {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    /// 所有动画名（排序后）
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.specs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::Color;
    use crate::phase::Phase;

    fn simple(name: &str) -> AnimationSpec {
        AnimationSpec::new(name, 1.0, vec![Phase::new("only", 0.0, 1.0)]).unwrap()
    }

    #[test]
    fn test_register_and_get() {
        let mut library = AnimationLibrary::new();
        let spec = library.register(simple("wave")).unwrap();
        assert!(Arc::ptr_eq(&spec, &library.get("wave").unwrap()));
        assert_eq!(
            library.get("missing").unwrap_err(),
            AnimError::UnknownAnimation {
                name: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut library = AnimationLibrary::new();
        library.register(simple("wave")).unwrap();
        assert!(matches!(
            library.register(simple("wave")),
            Err(AnimError::DuplicateAnimation { .. })
        ));
    }

    #[test]
    fn test_with_presets() {
        let styles = [
            SwingStyle::new("normal", "slap", Color::WHITE),
            SwingStyle::new("combo", "combo-slap", Color::GREEN),
        ];
        let library = AnimationLibrary::with_presets(&RigLayout::default(), &styles).unwrap();
        assert_eq!(
            library.names(),
            vec![
                "arm_swing.combo",
                "arm_swing.normal",
                "eat",
                "head_recoil",
                "slap"
            ]
        );
    }

    #[test]
    fn test_load_json_all_or_nothing() {
        let mut library = AnimationLibrary::new();
        let json = r#"[
            { "name": "nod", "duration": 0.4, "phases": [
                { "name": "down", "start": 0.0, "end": 0.5 },
                { "name": "up", "start": 0.5, "end": 1.0 }
            ]},
            { "name": "nod", "duration": 0.4, "phases": [
                { "name": "only", "start": 0.0, "end": 1.0 }
            ]}
        ]"#;
        assert!(library.load_json(json).is_err());
        assert!(library.is_empty());

        let broken = r#"[{ "name": "bad", "duration": -1.0, "phases": [] }]"#;
        assert!(matches!(
            library.load_json(broken),
            Err(AnimError::InvalidSpec { .. })
        ));

        let ok = r#"[{ "name": "shrug", "duration": 0.5, "phases": [
            { "name": "only", "start": 0.0, "end": 1.0, "easing": "ease_in_out" }
        ]}]"#;
        assert_eq!(library.load_json(ok).unwrap(), 1);
        assert!(library.contains("shrug"));
    }
}
