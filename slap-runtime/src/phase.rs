//! # Phase 模块
//!
//! 阶段表与动画定义。
//!
//! 一个动画由若干**阶段**组成，每个阶段占据总时长的一段分数区间
//! `[start, end)`，各阶段首尾相接地划分 [0, 1]：
//!
//! ```text
//! slap (0.8s)
//! |-- windup --|------ strike ------|-- return --|
//! 0           0.3                  0.7          1.0
//! ```
//!
//! 阶段可以声明进入 / 离开时的副作用，以及阶段内进度越过某个阈值时的副作用。
//! 动画定义在构造时校验，校验失败返回 `InvalidSpec`，之后不可变。

use serde::{Deserialize, Serialize};

use crate::easing::EasingFunction;
use crate::effect::Effect;
use crate::error::{AnimError, AnimResult};
use crate::pose::PoseDelta;

/// 阶段内进度阈值触发器
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressTrigger {
    /// 阶段内进度阈值 (0.0 - 1.0)
    pub threshold: f32,
    /// 越过阈值时发出的副作用
    pub effects: Vec<Effect>,
}

/// 动画阶段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    /// 阶段名
    pub name: String,
    /// 起始分数（含）
    pub start: f32,
    /// 结束分数（不含；最后一个阶段含 1.0）
    pub end: f32,
    /// 阶段内缓动
    #[serde(default)]
    pub easing: EasingFunction,
    /// 阶段起点姿态
    #[serde(default)]
    pub from: PoseDelta,
    /// 阶段终点姿态
    #[serde(default)]
    pub to: PoseDelta,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub on_enter: Vec<Effect>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub on_exit: Vec<Effect>,
    /// 按阈值升序排列（由 `AnimationSpec::new` 保证）
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<ProgressTrigger>,
}

impl Phase {
    /// 创建阶段，默认线性缓动、无姿态变化、无副作用
    pub fn new(name: impl Into<String>, start: f32, end: f32) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            easing: EasingFunction::Linear,
            from: PoseDelta::IDENTITY,
            to: PoseDelta::IDENTITY,
            on_enter: Vec::new(),
            on_exit: Vec::new(),
            triggers: Vec::new(),
        }
    }

    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// 设置起止姿态
    pub fn with_pose(mut self, from: PoseDelta, to: PoseDelta) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// 进入阶段时发出的副作用
    pub fn on_enter(mut self, effect: Effect) -> Self {
        self.on_enter.push(effect);
        self
    }

    /// 离开阶段时发出的副作用
    pub fn on_exit(mut self, effect: Effect) -> Self {
        self.on_exit.push(effect);
        self
    }

    /// 阶段内进度首次达到 `threshold` 时发出的副作用
    ///
    /// 同一阈值多次调用会合并到同一个触发器。
    pub fn at_progress(mut self, threshold: f32, effect: Effect) -> Self {
        match self.triggers.iter_mut().find(|t| t.threshold == threshold) {
            Some(trigger) => trigger.effects.push(effect),
            None => self.triggers.push(ProgressTrigger {
                threshold,
                effects: vec![effect],
            }),
        }
        self
    }

    /// 阶段宽度（分数）
    pub fn span(&self) -> f32 {
        self.end - self.start
    }

    /// 把总进度映射为阶段内进度，限制在 [0, 1]
    pub fn local_progress(&self, total: f32) -> f32 {
        ((total - self.start) / self.span()).clamp(0.0, 1.0)
    }

    /// 根据阶段内进度计算姿态
    pub fn pose_at(&self, local: f32) -> PoseDelta {
        self.from.lerp(&self.to, self.easing.apply(local))
    }

    /// 阶段结束时的姿态（往返型缓动回到起点）
    pub fn end_pose(&self) -> PoseDelta {
        if self.easing.returns_to_start() {
            self.from
        } else {
            self.to
        }
    }
}

/// 动画定义
///
/// 不可变；通常放在 `Arc` 里由动画库和所有运行实例共享。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AnimationSpecDef")]
pub struct AnimationSpec {
    name: String,
    duration: f64,
    phases: Vec<Phase>,
}

/// 反序列化中间结构，转换时做校验
#[derive(Deserialize)]
struct AnimationSpecDef {
    name: String,
    duration: f64,
    phases: Vec<Phase>,
}

impl TryFrom<AnimationSpecDef> for AnimationSpec {
    type Error = AnimError;

    fn try_from(def: AnimationSpecDef) -> Result<Self, Self::Error> {
        Self::new(def.name, def.duration, def.phases)
    }
}

impl AnimationSpec {
    /// 创建并校验动画定义
    ///
    /// # 校验规则
    /// - 名称非空，时长为正的有限值
    /// - 至少一个阶段；第一个阶段从 0 开始，最后一个阶段在 1 结束
    /// - 相邻阶段首尾相接，每个阶段宽度为正
    /// - 触发阈值在 [0, 1] 内
    pub fn new(name: impl Into<String>, duration: f64, mut phases: Vec<Phase>) -> AnimResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AnimError::invalid_spec(&name, "名称为空"));
        }
        if !duration.is_finite() || duration <= 0.0 {
            return Err(AnimError::invalid_spec(
                &name,
                format!("时长必须为正数，实际 {duration}"),
            ));
        }
        let (Some(first), Some(last)) = (phases.first(), phases.last()) else {
            return Err(AnimError::invalid_spec(&name, "没有任何阶段"));
        };
        if first.start != 0.0 {
            return Err(AnimError::invalid_spec(
                &name,
                format!("第一个阶段 '{}' 必须从 0 开始", first.name),
            ));
        }
        if last.end != 1.0 {
            return Err(AnimError::invalid_spec(
                &name,
                format!("最后一个阶段 '{}' 必须在 1 结束", last.name),
            ));
        }

        for (i, phase) in phases.iter().enumerate() {
            if phase.name.trim().is_empty() {
                return Err(AnimError::invalid_spec(&name, format!("第 {i} 个阶段没有名称")));
            }
            if !(phase.start.is_finite() && phase.end.is_finite()) || phase.start >= phase.end {
                return Err(AnimError::invalid_spec(
                    &name,
                    format!(
                        "阶段 '{}' 的区间 [{}, {}) 无效",
                        phase.name, phase.start, phase.end
                    ),
                ));
            }
            if i > 0 && phases[i - 1].end != phase.start {
                return Err(AnimError::invalid_spec(
                    &name,
                    format!(
                        "阶段 '{}' 结束于 {}，但下一个阶段 '{}' 开始于 {}",
                        phases[i - 1].name,
                        phases[i - 1].end,
                        phase.name,
                        phase.start
                    ),
                ));
            }
            if let Some(bad) = phase
                .triggers
                .iter()
                .find(|t| !(0.0..=1.0).contains(&t.threshold))
            {
                return Err(AnimError::invalid_spec(
                    &name,
                    format!("阶段 '{}' 的触发阈值 {} 超出 [0, 1]", phase.name, bad.threshold),
                ));
            }
        }

        for phase in &mut phases {
            phase
                .triggers
                .sort_by(|a, b| a.threshold.total_cmp(&b.threshold));
        }

        Ok(Self {
            name,
            duration,
            phases,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 总时长（秒）
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn phase(&self, index: usize) -> Option<&Phase> {
        self.phases.get(index)
    }

    /// 按名称查找阶段索引
    pub fn phase_index(&self, name: &str) -> Option<usize> {
        self.phases.iter().position(|p| p.name == name)
    }

    /// 总进度对应的阶段索引
    ///
    /// 线性扫描：阶段 `i` 在 `start <= total < end` 时生效，恰好落在边界上的
    /// 进度属于后一个阶段；最后一个阶段在 1.0 处闭合。
    pub fn phase_at(&self, total: f32) -> usize {
        let last = self.phases.len() - 1;
        self.phases
            .iter()
            .position(|p| total < p.end)
            .unwrap_or(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_phase(name: &str) -> AnimResult<AnimationSpec> {
        AnimationSpec::new(
            name,
            0.8,
            vec![
                Phase::new("windup", 0.0, 0.3),
                Phase::new("strike", 0.3, 0.7),
                Phase::new("return", 0.7, 1.0),
            ],
        )
    }

    #[test]
    fn test_valid_spec() {
        let spec = three_phase("slap").unwrap();
        assert_eq!(spec.name(), "slap");
        assert_eq!(spec.phases().len(), 3);
        assert_eq!(spec.phase_index("strike"), Some(1));
    }

    #[test]
    fn test_phase_lookup_partitions_unit_interval() {
        let spec = three_phase("slap").unwrap();
        assert_eq!(spec.phase_at(0.0), 0);
        assert_eq!(spec.phase_at(0.29), 0);
        assert_eq!(spec.phase_at(0.3), 1);
        assert_eq!(spec.phase_at(0.69), 1);
        assert_eq!(spec.phase_at(0.7), 2);
        assert_eq!(spec.phase_at(1.0), 2);

        let mut t = 0.0;
        while t <= 1.0 {
            let index = spec.phase_at(t);
            let phase = spec.phase(index).unwrap();
            assert!(phase.start <= t);
            assert!(t < phase.end || (index == 2 && t == 1.0));
            t += 0.01;
        }
    }

    #[test]
    fn test_rejects_gap() {
        let err = AnimationSpec::new(
            "gap",
            1.0,
            vec![Phase::new("a", 0.0, 0.4), Phase::new("b", 0.5, 1.0)],
        )
        .unwrap_err();
        assert!(matches!(err, AnimError::InvalidSpec { .. }));
    }

    #[test]
    fn test_rejects_bad_bounds_and_duration() {
        assert!(AnimationSpec::new("a", 1.0, vec![Phase::new("x", 0.1, 1.0)]).is_err());
        assert!(AnimationSpec::new("a", 1.0, vec![Phase::new("x", 0.0, 0.9)]).is_err());
        assert!(AnimationSpec::new("a", 0.0, vec![Phase::new("x", 0.0, 1.0)]).is_err());
        assert!(AnimationSpec::new("a", f64::NAN, vec![Phase::new("x", 0.0, 1.0)]).is_err());
        assert!(AnimationSpec::new("a", 1.0, vec![]).is_err());
        assert!(AnimationSpec::new("", 1.0, vec![Phase::new("x", 0.0, 1.0)]).is_err());
        assert!(
            AnimationSpec::new(
                "a",
                1.0,
                vec![
                    Phase::new("x", 0.0, 0.5),
                    Phase::new("empty", 0.5, 0.5),
                    Phase::new("y", 0.5, 1.0)
                ]
            )
            .is_err()
        );
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        let phase = Phase::new("x", 0.0, 1.0).at_progress(1.5, Effect::sound("late"));
        assert!(AnimationSpec::new("a", 1.0, vec![phase]).is_err());
    }

    #[test]
    fn test_triggers_sorted_and_merged() {
        let phase = Phase::new("x", 0.0, 1.0)
            .at_progress(0.9, Effect::sound("b"))
            .at_progress(0.2, Effect::sound("a"))
            .at_progress(0.9, Effect::sound("c"));
        let spec = AnimationSpec::new("a", 1.0, vec![phase]).unwrap();
        let triggers = &spec.phases()[0].triggers;
        assert_eq!(triggers.len(), 2);
        assert_eq!(triggers[0].threshold, 0.2);
        assert_eq!(triggers[1].effects.len(), 2);
    }

    #[test]
    fn test_json_validated_on_load() {
        let json = r#"{
            "name": "wave",
            "duration": 1.0,
            "phases": [
                { "name": "up", "start": 0.0, "end": 0.5, "easing": "ease_out" },
                { "name": "down", "start": 0.5, "end": 1.0 }
            ]
        }"#;
        let spec: AnimationSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.phases()[0].easing, EasingFunction::EaseOut);

        let broken = json.replace("\"start\": 0.5", "\"start\": 0.6");
        assert!(serde_json::from_str::<AnimationSpec>(&broken).is_err());
    }
}
