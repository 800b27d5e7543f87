//! # 游戏会话集成测试
//!
//! 测试 输入 → SlapGame → PhaseSequencer → EffectDispatcher → GameState 的完整链路。
//! 这些测试不依赖真实的音频设备，时间由测试按固定帧率推进。

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};
use std::path::Path;

use slap_host::{
    Achievement, AppConfig, Button, CommandOutcome, Frame, GameCommand, GameMode, HeadlessAudio,
    HighScoreStore, HostError, InputEvent, ParticleSystem, SlapAnimation, SlapGame, SlapKind,
};

const FPS: f64 = 60.0;

fn config_in(dir: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.high_score_path = dir.join("highscore.json");
    config
}

fn game_with(config: AppConfig) -> SlapGame<HeadlessAudio> {
    let audio = HeadlessAudio::new(&config.audio);
    SlapGame::with_audio(config, audio, ParticleSystem::with_seed(42)).unwrap()
}

fn game_in(dir: &Path) -> SlapGame<HeadlessAudio> {
    game_with(config_in(dir))
}

/// 按 60 fps 推进 [from, to] 帧，返回每帧输出
fn run_frames(game: &mut SlapGame<HeadlessAudio>, from: u32, to: u32) -> Vec<Frame> {
    (from..=to).map(|i| game.update(f64::from(i) / FPS)).collect()
}

fn played(game: &SlapGame<HeadlessAudio>) -> Vec<&str> {
    game.dispatcher()
        .audio()
        .history()
        .iter()
        .map(|s| s.name.as_str())
        .collect()
}

fn signals(frames: &[Frame]) -> Vec<&str> {
    frames
        .iter()
        .flat_map(|f| f.signals.iter().map(String::as_str))
        .collect()
}

// ----------------------------------------------------------------------------
// 掌掴主流程
// ----------------------------------------------------------------------------

#[test]
fn test_normal_slap_flow() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = game_in(dir.path());

    assert_eq!(
        game.execute(GameCommand::Slap, 0.0).unwrap(),
        CommandOutcome::Applied
    );
    assert_eq!(game.state().slap_count(), 1);
    assert_eq!(game.state().boss_health(), 90.0);
    assert_eq!(
        game.hud().message.as_deref(),
        Some("Achievement Unlocked: First Slap!")
    );

    let mut frames = run_frames(&mut game, 0, 5);

    // 动画进行中再次掌掴：被丢弃，状态不变
    assert_eq!(
        game.execute(GameCommand::Slap, 0.1).unwrap(),
        CommandOutcome::Busy
    );
    assert_eq!(game.state().slap_count(), 1);
    assert_eq!(game.stats().rejected_busy, 1);

    frames.extend(run_frames(&mut game, 6, 60));

    assert_eq!(signals(&frames), vec!["slap_landed", "swing_finished"]);
    assert_eq!(played(&game), vec!["slap", "hurt"]);
    assert!(game.dispatcher().audio().history().iter().all(|s| s.volume == 0.5));
    assert_eq!(game.dispatcher().particles().spawned_total(), 100);
    assert_eq!(game.stats().slaps_landed, 1);

    // 员工在 0.5 秒结束动画，老板受击后仰随后结束
    let employee_done = frames
        .iter()
        .position(|f| f.finished.contains(game.employee()))
        .unwrap();
    assert_eq!(employee_done, 30);
    assert!(frames.iter().any(|f| f.finished.contains(game.boss())));
    assert!(!game.is_employee_busy());
    assert!(!game.sequencer().is_busy(game.boss()));

    assert_eq!(
        game.execute(GameCommand::Slap, 1.0).unwrap(),
        CommandOutcome::Applied
    );
}

#[test]
fn test_arm_pose_follows_phases() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = game_in(dir.path());
    game.execute(GameCommand::Slap, 0.0).unwrap();

    // 0.25 秒正好是 swing 阶段起点：手臂处于蓄力姿态
    run_frames(&mut game, 0, 15);
    let pose = game.pose_of(game.employee());
    assert!((pose.rotation.x - FRAC_PI_4).abs() < 1e-4);
    assert!((pose.rotation.z + FRAC_PI_2).abs() < 1e-4);

    // 未受击的老板保持静止
    assert_eq!(
        game.pose_of(game.boss()),
        slap_runtime::PoseDelta::IDENTITY
    );
}

#[test]
fn test_reach_animation_variant() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.slap_animation = SlapAnimation::Reach;
    let mut game = game_with(config);

    game.execute(GameCommand::Slap, 0.0).unwrap();
    let frames = run_frames(&mut game, 0, 60);

    assert_eq!(signals(&frames), vec!["slap_landed"]);
    assert_eq!(played(&game), vec!["slap", "impact"]);
    // 红色碎屑 100 + 冲击火花 50
    assert_eq!(game.dispatcher().particles().spawned_total(), 150);
    let sizes: Vec<f32> = game
        .dispatcher()
        .particles()
        .bursts()
        .iter()
        .map(|b| b.size)
        .collect();
    assert_eq!(sizes, vec![0.03, 0.05]);
    assert_eq!(game.stats().slaps_landed, 1);
    assert!(!game.is_employee_busy());
}

#[test]
fn test_recoil_skipped_while_boss_busy() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.animations_path = Some(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../assets/animations/boss_reactions.json"),
    );
    let mut game = game_with(config);
    let boss = game.boss().clone();

    game.execute(GameCommand::Slap, 0.0).unwrap();
    run_frames(&mut game, 0, 17);
    // 0.3 秒起老板耸肩 0.6 秒，覆盖两次命中（约 0.383 与 0.883 秒）
    assert_eq!(
        game.play("boss_shrug", &boss, 0.3).unwrap(),
        CommandOutcome::Applied
    );
    assert_eq!(
        game.play("boss_stagger", &boss, 0.3).unwrap(),
        CommandOutcome::Busy
    );

    let mut frames = run_frames(&mut game, 18, 30);
    assert!(!game.is_employee_busy());
    game.execute(GameCommand::Slap, 0.5).unwrap();
    frames.extend(run_frames(&mut game, 31, 53));

    assert_eq!(game.stats().slaps_landed, 2);
    assert_eq!(signals(&frames).iter().filter(|s| **s == "slap_landed").count(), 2);
    let shrug = game.sequencer().active_run(&boss).unwrap();
    assert_eq!(game.sequencer().animation_of(shrug), Some("boss_shrug"));
    assert!(frames.iter().all(|f| !f.finished.contains(&boss)));

    // 耸肩结束后老板空闲，没有补播后仰
    let frames = run_frames(&mut game, 54, 60);
    assert!(frames[0].finished.contains(&boss));
    assert!(!game.sequencer().is_busy(&boss));
    assert_eq!(game.sequencer().active_count(), 0);
}

#[test]
fn test_play_unknown_animation_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = game_in(dir.path());
    let boss = game.boss().clone();
    assert!(matches!(
        game.play("moonwalk", &boss, 0.0),
        Err(HostError::Anim(_))
    ));
    assert!(!game.sequencer().is_busy(&boss));
}

// ----------------------------------------------------------------------------
// 增益与掌掴类型
// ----------------------------------------------------------------------------

#[test]
fn test_power_up_overrides_selection_until_expiry() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = game_in(dir.path());

    assert_eq!(
        game.handle_input(InputEvent::KeyPressed('1'), 0.0).unwrap(),
        Some(CommandOutcome::Applied)
    );
    assert_eq!(game.hud().message.as_deref(), Some("Super Slap Activated!"));
    assert_eq!(
        game.handle_input(InputEvent::KeyPressed('1'), 0.5).unwrap(),
        Some(CommandOutcome::Ignored)
    );
    assert_eq!(game.handle_input(InputEvent::KeyPressed('x'), 0.5).unwrap(), None);

    game.execute(GameCommand::Slap, 0.0).unwrap();
    assert_eq!(game.state().boss_health(), 80.0);
    assert!(game.state().achievements().is_unlocked(Achievement::SuperSlapper));

    run_frames(&mut game, 0, 60);
    assert_eq!(played(&game), vec!["super-slap", "hurt"]);
    assert_eq!(game.hud().active_power_ups, vec![SlapKind::Super]);

    // 5 秒窗口：恰好 5 秒时仍有效，之后到期
    game.update(5.0);
    assert!(game.power_ups().is_active(SlapKind::Super));
    game.update(5.1);
    assert!(game.hud().active_power_ups.is_empty());

    game.execute(GameCommand::Slap, 5.1).unwrap();
    assert_eq!(game.state().boss_health(), 70.0);
}

#[test]
fn test_selected_slap_kind() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = game_in(dir.path());

    game.handle_input(InputEvent::Clicked(Button::SlapMode(SlapKind::Combo)), 0.0)
        .unwrap();
    assert_eq!(game.selected_kind(), SlapKind::Combo);
    assert_eq!(game.hud().message.as_deref(), Some("Combo Slap Selected!"));

    game.handle_input(InputEvent::Clicked(Button::Slap), 0.0)
        .unwrap();
    run_frames(&mut game, 0, 60);
    assert_eq!(game.state().boss_health(), 85.0);
    assert_eq!(played(&game), vec!["combo-slap", "hurt"]);
    assert!(game.state().achievements().is_unlocked(Achievement::ComboMaster));
}

// ----------------------------------------------------------------------------
// 进食
// ----------------------------------------------------------------------------

#[test]
fn test_eat_blocks_slap_and_plays_sounds() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = game_in(dir.path());

    assert_eq!(
        game.execute(GameCommand::Eat, 0.0).unwrap(),
        CommandOutcome::Applied
    );
    run_frames(&mut game, 0, 12);
    assert_eq!(
        game.execute(GameCommand::Slap, 0.2).unwrap(),
        CommandOutcome::Busy
    );

    let frames = run_frames(&mut game, 13, 70);
    assert!(signals(&frames).is_empty());
    assert_eq!(played(&game), vec!["eating", "burp"]);
    assert_eq!(game.dispatcher().particles().spawned_total(), 50);
    assert_eq!(game.state().slap_count(), 0);
    assert_eq!(game.state().boss_health(), 100.0);
    assert_eq!(game.stats().meals, 1);
    assert!(!game.is_employee_busy());
}

// ----------------------------------------------------------------------------
// 游戏模式
// ----------------------------------------------------------------------------

#[test]
fn test_time_attack_completes() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = game_in(dir.path());
    game.handle_input(InputEvent::Clicked(Button::GameMode(GameMode::Time)), 0.0)
        .unwrap();
    assert_eq!(game.hud().time_remaining, Some(60.0));

    run_frames(&mut game, 0, 3630);

    assert!(game.state().achievements().is_unlocked(Achievement::SpeedDemon));
    let texts: Vec<&str> = game
        .messages()
        .visible()
        .iter()
        .map(|m| m.text.as_str())
        .collect();
    assert_eq!(
        texts,
        vec!["Time Attack Complete!", "Achievement Unlocked: Speed Demon!"]
    );
    let remaining = game.hud().time_remaining.unwrap();
    assert!(remaining > 59.0 && remaining < 60.0);
}

#[test]
fn test_survival_completes_and_persists_high_score() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = game_in(dir.path());
    game.execute(GameCommand::SelectMode(GameMode::Survival), 0.0)
        .unwrap();
    game.execute(GameCommand::SelectSlapKind(SlapKind::Super), 0.0)
        .unwrap();

    for i in 0..=600 {
        let now = f64::from(i) / FPS;
        if game.stats().slaps_started < 5 && !game.is_employee_busy() {
            game.execute(GameCommand::Slap, now).unwrap();
        }
        game.update(now);
    }

    let hud = game.hud();
    assert!(game.state().achievements().is_unlocked(Achievement::Survivor));
    assert_eq!(hud.slap_count, 5);
    assert_eq!(hud.boss_health, 100.0);
    assert_eq!(hud.high_score, 5);
    assert_eq!(
        HighScoreStore::new(dir.path().join("highscore.json")).load(),
        5
    );
}

#[test]
fn test_high_score_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut game = game_in(dir.path());
        for n in 0..3u32 {
            let start = n * 60;
            game.execute(GameCommand::Slap, f64::from(start) / FPS)
                .unwrap();
            run_frames(&mut game, start, start + 59);
        }
        assert_eq!(game.state().slap_count(), 3);
    }

    let game = game_in(dir.path());
    let hud = game.hud();
    assert_eq!(hud.high_score, 3);
    assert_eq!(hud.slap_count, 0);
}

// ----------------------------------------------------------------------------
// 配置与资源
// ----------------------------------------------------------------------------

#[test]
fn test_ambient_uses_ambient_volume() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = game_in(dir.path());
    game.start_ambient();

    let history = game.dispatcher().audio().history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].name, "ambient");
    assert!(history[0].looped);
    assert_eq!(history[0].volume, 0.2);
}

#[test]
fn test_extra_animations_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("animations.json");
    std::fs::write(
        &path,
        r#"[{
            "name": "wave",
            "duration": 1.0,
            "phases": [
                { "name": "up", "start": 0.0, "end": 0.5, "easing": "ease_out" },
                { "name": "down", "start": 0.5, "end": 1.0 }
            ]
        }]"#,
    )
    .unwrap();

    let mut config = config_in(dir.path());
    config.animations_path = Some(path.clone());
    let game = game_with(config.clone());
    assert!(game.library().contains("wave"));
    assert!(game.library().contains("arm_swing.super"));

    std::fs::write(&path, r#"[{ "name": "wave", "duration": 0, "phases": [] }]"#).unwrap();
    let audio = HeadlessAudio::new(&config.audio);
    let result = SlapGame::with_audio(config.clone(), audio, ParticleSystem::with_seed(1));
    assert!(matches!(result, Err(HostError::Anim(_))));

    config.animations_path = Some(dir.path().join("missing.json"));
    let audio = HeadlessAudio::new(&config.audio);
    let result = SlapGame::with_audio(config, audio, ParticleSystem::with_seed(1));
    assert!(matches!(result, Err(HostError::Io(_))));
}
