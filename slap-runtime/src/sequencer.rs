//! # Sequencer 模块
//!
//! 分阶段关键帧动画驱动器。
//!
//! ## 时间模型
//!
//! 每个运行实例只有一个时间基准 `start_time`，每帧由调用方传入单调时间
//! `now`，当前阶段由 `elapsed / duration` 查表得到，而不是在阶段切换时重启
//! 计时器，因此阶段边界不会累积调度抖动。
//!
//! ## 副作用保证
//!
//! 阶段边界的推进只发生在 `AnimationRun::advance` 一处：从当前阶段走到目标
//! 阶段时，依次补发离开阶段未触发的阈值、`on_exit`，被整段跳过的阶段的全部
//! 副作用，以及新阶段的 `on_enter`。无论帧间隔多大，每个副作用在一次运行中
//! 恰好发出一次。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! let mut sequencer = PhaseSequencer::new();
//! let handle = sequencer.start(spec, ActorId::new("employee")?, now)?;
//!
//! // 每帧
//! let result = sequencer.tick(handle, now)?;
//! renderer.apply_pose("employee", result.pose);
//! dispatcher.dispatch_all(result.effects, now);
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::actor::{ActorId, RunHandle, RunId};
use crate::effect::Effect;
use crate::error::{AnimError, AnimResult};
use crate::lock::ActorAnimationLock;
use crate::phase::AnimationSpec;
use crate::pose::PoseDelta;


/// 单帧推进结果
#[derive(Debug, Clone, PartialEq)]
pub struct TickResult {
    /// 当前阶段索引
    pub phase_index: usize,
    /// 当前阶段名
    pub phase: String,
    /// 总进度 (0.0 - 1.0)
    pub progress: f32,
    /// 阶段内进度 (0.0 - 1.0，未应用缓动)
    pub phase_progress: f32,
    /// 本帧姿态偏移
    pub pose: PoseDelta,
    /// 本帧到期的副作用（按发生顺序）
    pub effects: Vec<Effect>,
    /// 运行是否已结束（结束后句柄失效）
    pub done: bool,
}

/// 一次动画运行的可变状态
#[derive(Debug)]
struct AnimationRun {
    spec: Arc<AnimationSpec>,
    actor: ActorId,
    start_time: f64,
    /// 已进入的阶段，首帧之前为 `None`
    current_phase: Option<usize>,
    /// 当前阶段已触发的阈值个数（阈值升序，等价于已触发的最高阈值）
    fired_triggers: usize,
}

impl AnimationRun {
    fn new(spec: Arc<AnimationSpec>, actor: ActorId, start_time: f64) -> Self {
        Self {
            spec,
            actor,
            start_time,
            current_phase: None,
            fired_triggers: 0,
        }
    }

    fn advance(&mut self, now: f64) -> TickResult {
        let spec = Arc::clone(&self.spec);
        let elapsed = (now - self.start_time).max(0.0);
        let done = elapsed >= spec.duration();
        let total = (elapsed / spec.duration()).clamp(0.0, 1.0) as f32;
        let target = spec.phase_at(total);
        let mut effects = Vec::new();

        let mut current = match self.current_phase {
            Some(index) => index,
            None => {
                self.enter(&spec, 0, &mut effects);
                0
            }
        };
        while current < target {
            self.finish(&spec, current, &mut effects);
            current += 1;
            self.enter(&spec, current, &mut effects);
        }

        let phase = &spec.phases()[current];
        let local = phase.local_progress(total);
        self.fire_due(&spec, current, local, &mut effects);
        let pose = phase.pose_at(local);

        if done {
            self.finish(&spec, current, &mut effects);
        }

        TickResult {
            phase_index: current,
            phase: phase.name.clone(),
            progress: total,
            phase_progress: local,
            pose,
            effects,
            done,
        }
    }

    fn enter(&mut self, spec: &AnimationSpec, index: usize, effects: &mut Vec<Effect>) {
        let phase = &spec.phases()[index];
        trace!(animation = spec.name(), actor = %self.actor, phase = %phase.name, "进入阶段");
        self.current_phase = Some(index);
        self.fired_triggers = 0;
        effects.extend(phase.on_enter.iter().cloned());
    }

    /// 阶段走完：补发剩余阈值，再发 `on_exit`
    fn finish(&mut self, spec: &AnimationSpec, index: usize, effects: &mut Vec<Effect>) {
        self.fire_due(spec, index, 1.0, effects);
        effects.extend(spec.phases()[index].on_exit.iter().cloned());
    }

    fn fire_due(&mut self, spec: &AnimationSpec, index: usize, local: f32, effects: &mut Vec<Effect>) {
        let triggers = &spec.phases()[index].triggers;
        while let Some(trigger) = triggers.get(self.fired_triggers) {
            if trigger.threshold > local {
                break;
            }
            effects.extend(trigger.effects.iter().cloned());
            self.fired_triggers += 1;
        }
    }
}

/// 分阶段动画驱动器
///
/// 持有所有运行实例和角色锁。单线程、由外部帧循环驱动，自身不持有计时器。
#[derive(Debug)]
pub struct PhaseSequencer {
    lock: ActorAnimationLock,
    runs: BTreeMap<RunId, AnimationRun>,
    next_run_id: u64,
}

impl Default for PhaseSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseSequencer {
    pub fn new() -> Self {
        Self {
            lock: ActorAnimationLock::new(),
            runs: BTreeMap::new(),
            next_run_id: 1,
        }
    }

    fn next_run_id(&mut self) -> RunId {
        let id = RunId(self.next_run_id);
        self.next_run_id += 1;
        id
    }

    /// 在角色上启动动画
    ///
    /// 角色正被其它运行实例驱动时返回 `ActorBusy`，且不改变任何状态；
    /// 调用方通常直接丢弃该请求。
    pub fn start(
        &mut self,
        spec: Arc<AnimationSpec>,
        actor: ActorId,
        now: f64,
    ) -> AnimResult<RunHandle> {
        if let Some(holder) = self.lock.holder(&actor) {
            debug!(animation = spec.name(), %actor, %holder, "角色忙，丢弃动画请求");
            return Err(AnimError::ActorBusy { actor, run: holder });
        }

        let id = self.next_run_id();
        self.lock.acquire(&actor, id)?;
        debug!(animation = spec.name(), %actor, run = %id, now, "动画开始");
        self.runs.insert(id, AnimationRun::new(spec, actor, now));
        Ok(RunHandle(id))
    }

    /// 推进一个运行实例
    ///
    /// 返回 `done = true` 的那一帧是该运行的最后一帧：锁已释放、句柄失效，
    /// 之后再 `tick` 会得到 `RunNotFound`。
    pub fn tick(&mut self, handle: RunHandle, now: f64) -> AnimResult<TickResult> {
        let run = self
            .runs
            .get_mut(&handle.0)
            .ok_or(AnimError::RunNotFound { run: handle.0 })?;
        let result = run.advance(now);

        if result.done {
            if let Some(run) = self.runs.remove(&handle.0) {
                self.lock.release(&run.actor);
                debug!(animation = run.spec.name(), actor = %run.actor, run = %handle.0, "动画完成");
            }
        }
        Ok(result)
    }

    /// 按启动顺序推进所有运行实例
    pub fn tick_all(&mut self, now: f64) -> Vec<(RunHandle, ActorId, TickResult)> {
        let ids: Vec<RunId> = self.runs.keys().copied().collect();
        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(actor) = self.runs.get(&id).map(|run| run.actor.clone()) else {
                continue;
            };
            if let Ok(result) = self.tick(RunHandle(id), now) {
                results.push((RunHandle(id), actor, result));
            }
        }
        results
    }

    /// 取消运行实例
    ///
    /// 立即释放角色锁，不发出任何副作用。幂等：返回是否真的取消了一个运行。
    pub fn cancel(&mut self, handle: RunHandle) -> bool {
        match self.runs.remove(&handle.0) {
            Some(run) => {
                self.lock.release(&run.actor);
                debug!(animation = run.spec.name(), actor = %run.actor, run = %handle.0, "动画取消");
                true
            }
            None => false,
        }
    }

    /// 取消驱动该角色的运行实例（如有）
    pub fn cancel_actor(&mut self, actor: &ActorId) -> bool {
        match self.lock.holder(actor) {
            Some(id) => self.cancel(RunHandle(id)),
            None => false,
        }
    }

    /// 角色是否正在被动画驱动
    pub fn is_busy(&self, actor: &ActorId) -> bool {
        self.lock.is_locked(actor)
    }

    /// 驱动该角色的运行句柄
    pub fn active_run(&self, actor: &ActorId) -> Option<RunHandle> {
        self.lock.holder(actor).map(RunHandle)
    }

    /// 运行实例正在播放的动画名
    pub fn animation_of(&self, handle: RunHandle) -> Option<&str> {
        self.runs.get(&handle.0).map(|run| run.spec.name())
    }

    /// 活跃运行实例数量
    pub fn active_count(&self) -> usize {
        self.runs.len()
    }

    /// 取消全部运行实例
    pub fn clear(&mut self) {
        self.runs.clear();
        self.lock.clear();
    }
}
