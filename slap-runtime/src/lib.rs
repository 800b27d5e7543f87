//! # Slap Runtime
//!
//! 分阶段关键帧动画核心。
//!
//! ## 架构概述
//!
//! `slap-runtime` 是纯逻辑核心，不依赖任何渲染、音频或 IO。
//! 宿主层每帧把单调时间传进来，拿回姿态偏移和副作用请求：
//!
//! ```text
//! Host                               Runtime
//!   │                                   │
//!   │──── start(spec, actor, now) ────►│  ActorAnimationLock
//!   │                                   │
//!   │──── tick(handle, now) ─────────►│  PhaseSequencer
//!   │◄─── TickResult { pose, effects, done }
//!   │                                   │
//! ```
//!
//! ## 核心类型
//!
//! - [`AnimationSpec`] / [`Phase`]：不可变的阶段表
//! - [`PhaseSequencer`]：推进运行实例，发出 [`Effect`]
//! - [`ActorAnimationLock`]：每个角色至多一个运行实例
//! - [`AnimationLibrary`]：按名称管理动画定义
//!
//! ## 模块结构
//!
//! - [`actor`]：角色与运行实例标识
//! - [`easing`]：缓动函数
//! - [`effect`]：副作用请求
//! - [`error`]：错误类型定义
//! - [`library`]：动画库
//! - [`lock`]：角色动画锁
//! - [`phase`]：阶段与动画定义
//! - [`pose`]：向量与姿态偏移
//! - [`presets`]：内置动画
//! - [`sequencer`]：动画驱动器

pub mod actor;
pub mod easing;
pub mod effect;
pub mod error;
pub mod library;
pub mod lock;
pub mod phase;
pub mod pose;
pub mod presets;
pub mod sequencer;

// 重导出核心类型
pub use actor::{ActorId, RunHandle, RunId};
pub use easing::EasingFunction;
pub use effect::{Color, Effect, ParticleKind};
pub use error::{AnimError, AnimResult};
pub use library::AnimationLibrary;
pub use lock::ActorAnimationLock;
pub use phase::{AnimationSpec, Phase, ProgressTrigger};
pub use pose::{PoseDelta, Vec3};
pub use presets::{RigLayout, SwingStyle};
pub use sequencer::{PhaseSequencer, TickResult};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_public_api_accessible() {
        let library = AnimationLibrary::with_presets(&RigLayout::default(), &[]).unwrap();
        let mut sequencer = PhaseSequencer::new();
        let employee = ActorId::new("employee").unwrap();

        let handle = sequencer
            .start(library.get(presets::EAT).unwrap(), employee, 0.0)
            .unwrap();
        let result = sequencer.tick(handle, 1.0).unwrap();
        assert!(result.done);
        assert!(result.effects.contains(&Effect::sound("burp")));

        let spec: Arc<AnimationSpec> = library.get(presets::SLAP).unwrap();
        assert_eq!(spec.phases()[0].name, "windup");
    }
}
