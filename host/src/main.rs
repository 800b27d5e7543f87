//! # slap-host
//!
//! 无界面驱动：按固定帧率模拟一局游戏，输出日志与最终界面状态。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p slap-host -- --mode survival --seconds 20
//! cargo run -p slap-host -- --script "0.5:key:1,1.0:click:slap,2.0:click:eat"
//! cargo run -p slap-host -- --config config.json --verbose
//! cargo run -p slap-host -- --config config.json --write-config
//! ```

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;

use slap_host::{
    AppConfig, Button, CommandOutcome, GameCommand, GameMode, InputEvent, SlapGame, SlapKind,
};

#[derive(Parser)]
#[command(name = "slap-host")]
#[command(about = "Slap-the-Boss 无界面驱动")]
#[command(version)]
struct Cli {
    /// 配置文件路径（默认：config.json，不存在时使用默认值）
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// 游戏模式（normal / time / survival）
    #[arg(short, long, default_value = "normal")]
    mode: GameMode,

    /// 选择的掌掴类型（normal / combo / super）
    #[arg(short = 'k', long, default_value = "normal")]
    slap_kind: SlapKind,

    /// 帧率
    #[arg(long, default_value = "60")]
    fps: u32,

    /// 模拟时长（秒）
    #[arg(short, long, default_value = "10")]
    seconds: f64,

    /// 自动掌掴间隔（秒），0 表示关闭
    #[arg(long, default_value = "0.6")]
    slap_every: f64,

    /// 输入脚本：逗号分隔的 `<秒>:<事件>`，例如 `0.5:key:1,1.0:click:slap`
    #[arg(long)]
    script: Option<String>,

    /// 覆盖最高分存档路径
    #[arg(long)]
    high_score: Option<PathBuf>,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,

    /// 把当前生效的配置写入 --config 指定的文件后退出
    #[arg(long)]
    write_config: bool,
}

/// 解析输入脚本，按时间排序
fn parse_script(script: &str) -> Result<Vec<(f64, InputEvent)>> {
    let mut events = Vec::new();
    for entry in script.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (time, event) = entry
            .split_once(':')
            .with_context(|| format!("脚本条目缺少时间: '{entry}'"))?;
        let time: f64 = time
            .trim()
            .parse()
            .with_context(|| format!("无效的时间: '{time}'"))?;
        let event: InputEvent = event.parse()?;
        events.push((time, event));
    }
    events.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(events)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        })
        .with_target(false)
        .init();

    if cli.fps == 0 {
        bail!("fps 必须大于 0");
    }

    let mut config = AppConfig::load_or_default(&cli.config);
    if let Some(path) = cli.high_score {
        config.high_score_path = path;
    }
    if cli.write_config {
        config
            .save(&cli.config)
            .with_context(|| format!("写入配置失败: {}", cli.config.display()))?;
        info!(path = %cli.config.display(), "配置已写入");
        return Ok(());
    }

    let mut script = match &cli.script {
        Some(script) => parse_script(script)?,
        None => Vec::new(),
    }
    .into_iter()
    .peekable();

    let mut game = SlapGame::new(config).context("初始化游戏失败")?;
    game.start_ambient();
    game.execute(GameCommand::SelectMode(cli.mode), 0.0)?;
    game.execute(GameCommand::SelectSlapKind(cli.slap_kind), 0.0)?;

    let dt = 1.0 / f64::from(cli.fps);
    let frames = (cli.seconds * f64::from(cli.fps)).ceil() as u64;
    let mut next_auto_slap = 0.0;
    let mut last_message = None;

    info!(mode = %cli.mode, fps = cli.fps, seconds = cli.seconds, "开始模拟");
    for frame in 0..=frames {
        let now = frame as f64 * dt;

        while let Some((_, event)) = script.next_if(|(time, _)| *time <= now) {
            match game.handle_input(event, now)? {
                Some(outcome) => info!(?event, ?outcome, now, "脚本输入"),
                None => warn!(?event, now, "输入没有对应命令"),
            }
        }

        let slap_due = cli.slap_every > 0.0 && now >= next_auto_slap;
        if slap_due
            && game.handle_input(InputEvent::Clicked(Button::Slap), now)?
                == Some(CommandOutcome::Applied)
        {
            next_auto_slap = now + cli.slap_every;
        }

        let output = game.update(now);
        for signal in &output.signals {
            info!(signal = %signal, now, "信号");
        }

        let message = game.hud().message;
        if message.is_some() && message != last_message {
            info!(text = message.as_deref().unwrap_or_default(), "提示");
        }
        last_message = message;
    }

    let hud = game.hud();
    info!(
        slaps = hud.slap_count,
        high_score = hud.high_score,
        boss_health = hud.boss_health,
        stats = ?game.stats(),
        particles = game.dispatcher().particles().spawned_total(),
        "模拟结束"
    );
    println!("{}", serde_json::to_string_pretty(&hud)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script_sorts_by_time() {
        let events = parse_script("1.0:click:slap, 0.5:key:1").unwrap();
        assert_eq!(
            events,
            vec![
                (0.5, InputEvent::KeyPressed('1')),
                (1.0, InputEvent::Clicked(Button::Slap)),
            ]
        );
    }

    #[test]
    fn test_parse_script_rejects_bad_entries() {
        assert!(parse_script("soon:click:slap").is_err());
        assert!(parse_script("1.0").is_err());
        assert!(parse_script("1.0:click:dance").is_err());
    }
}
