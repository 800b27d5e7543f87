//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-runtime`: 运行 slap-runtime 覆盖率
//! - `anim-check`: 检查动画定义文件（JSON 格式、阶段划分、重名）

use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use slap_runtime::{AnimationLibrary, AnimationSpec, Effect};
use walkdir::WalkDir;

fn run(step: &str, cmd: &mut Command) -> anyhow::Result<()> {
    eprintln!("\n==> {step}");
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("{step} failed with {status}");
    }
    Ok(())
}

fn ensure_cargo_llvm_cov_available() -> anyhow::Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["llvm-cov", "--version"]);
    match cmd.status() {
        Ok(s) if s.success() => Ok(()),
        _ => anyhow::bail!(
            "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
        ),
    }
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let sub = args.next().unwrap_or_else(|| "help".to_string());

    match sub.as_str() {
        "check-all" => {
            let mut fmt = Command::new("cargo");
            fmt.args(["fmt", "--all", "--", "--check"]);
            run("cargo fmt --all -- --check", &mut fmt)?;

            let mut clippy = Command::new("cargo");
            clippy.args(["clippy", "--workspace", "--all-targets"]);
            run("cargo clippy --workspace --all-targets", &mut clippy)?;

            let mut test = Command::new("cargo");
            test.args(["test", "--workspace"]);
            run("cargo test --workspace", &mut test)?;
        }
        "cov-runtime" => {
            ensure_cargo_llvm_cov_available()?;

            let mut cov = Command::new("cargo");
            cov.args(["llvm-cov", "-p", "slap-runtime", "--html"]);
            run("cargo llvm-cov -p slap-runtime --html", &mut cov)?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "anim-check" => {
            let path = args.next();
            anim_check(path.as_deref())?;
        }
        "help" | "-h" | "--help" => {
            print_help();
        }
        other => anyhow::bail!("unknown xtask subcommand: {other}"),
    }

    Ok(())
}

fn print_help() {
    eprintln!(
        r#"xtask - 开发辅助工具

USAGE:
  cargo xtask <command>

COMMANDS:
  check-all       运行 fmt、clippy、test 门禁检查
  cov-runtime     运行 slap-runtime 覆盖率报告
  anim-check      检查动画定义文件

ANIM-CHECK:
  cargo xtask anim-check [path]

  不带参数：检查 assets/animations/ 下所有 .json 文件
  带路径参数：检查指定文件或目录

  检查内容：
    - JSON 格式与字段
    - 阶段从 0 开始、到 1 结束、首尾相接
    - 触发阈值范围
    - 跨文件的动画重名

ALIASES (in .cargo/config.toml):
  cargo check-all     -> cargo xtask check-all
  cargo cov-runtime   -> cargo xtask cov-runtime
  cargo anim-check    -> cargo xtask anim-check
"#
    );
}

//=============================================================================
// anim-check 命令实现
//=============================================================================

/// 默认动画目录（相对于 workspace root）
const DEFAULT_ANIMATIONS_DIR: &str = "assets/animations";

/// 检查结果
#[derive(Default)]
struct AnimCheckResult {
    files_checked: usize,
    animations: usize,
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// 执行动画定义检查
fn anim_check(path: Option<&str>) -> anyhow::Result<()> {
    let files = match path {
        Some(p) => {
            let path = PathBuf::from(p);
            if path.is_file() {
                vec![path]
            } else if path.is_dir() {
                collect_json_files(&path)
            } else {
                anyhow::bail!("路径不存在: {}", p);
            }
        }
        None => {
            let dir = Path::new(DEFAULT_ANIMATIONS_DIR);
            if !dir.exists() {
                anyhow::bail!(
                    "默认动画目录不存在: {}\n请在 workspace 根目录运行，或指定文件路径",
                    dir.display()
                );
            }
            collect_json_files(dir)
        }
    };

    if files.is_empty() {
        eprintln!("未找到动画文件（.json）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个动画文件...\n", files.len());

    // 所有文件共用一个动画库，用于发现跨文件重名
    let mut library = AnimationLibrary::new();
    let mut result = AnimCheckResult::default();
    for file in &files {
        check_file(file, &mut library, &mut result);
    }

    print_check_result(&result);

    if !result.errors.is_empty() {
        anyhow::bail!("动画检查发现错误");
    }
    Ok(())
}

/// 收集目录下的所有 JSON 文件
fn collect_json_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files
}

/// 检查单个文件
fn check_file(file: &Path, library: &mut AnimationLibrary, result: &mut AnimCheckResult) {
    let file_id = file.display().to_string();
    result.files_checked += 1;

    let content = match std::fs::read_to_string(file) {
        Ok(c) => c,
        Err(e) => {
            result.errors.push(format!("{file_id}: 无法读取文件 - {e}"));
            return;
        }
    };

    // 反序列化时即完成校验
    let specs: Vec<AnimationSpec> = match serde_json::from_str(&content) {
        Ok(specs) => specs,
        Err(e) => {
            result.errors.push(format!("{file_id}: {e}"));
            return;
        }
    };

    for spec in specs {
        result.warnings.extend(
            lint_spec(&spec)
                .into_iter()
                .map(|w| format!("{file_id}: {w}")),
        );
        let name = spec.name().to_string();
        match library.register(spec) {
            Ok(spec) => {
                result.animations += 1;
                eprintln!(
                    "  {name}: {:.2}s, {} 个阶段",
                    spec.duration(),
                    spec.phases().len()
                );
            }
            Err(e) => result.errors.push(format!("{file_id}: {e}")),
        }
    }
}

/// 相邻阶段姿态允许的误差
const POSE_TOLERANCE: f32 = 1e-3;

/// 合法但可疑的写法
fn lint_spec(spec: &AnimationSpec) -> Vec<String> {
    let mut warnings = Vec::new();
    for pair in spec.phases().windows(2) {
        let (end, start) = (pair[0].end_pose(), pair[1].from);
        if end.position.distance(start.position) > POSE_TOLERANCE
            || end.rotation.distance(start.rotation) > POSE_TOLERANCE
        {
            warnings.push(format!(
                "动画 '{}' 阶段 '{}' → '{}' 姿态不连续",
                spec.name(),
                pair[0].name,
                pair[1].name
            ));
        }
    }
    for phase in spec.phases() {
        let effects = phase
            .on_enter
            .iter()
            .chain(&phase.on_exit)
            .chain(phase.triggers.iter().flat_map(|t| &t.effects));
        for effect in effects {
            if let Effect::PlaySound { name, .. } | Effect::Signal { name } = effect
                && name.trim().is_empty()
            {
                warnings.push(format!(
                    "动画 '{}' 阶段 '{}' 含空名称效果",
                    spec.name(),
                    phase.name
                ));
            }
        }
        if phase.from == phase.to && phase.on_enter.is_empty() && phase.triggers.is_empty() {
            warnings.push(format!(
                "动画 '{}' 阶段 '{}' 没有姿态变化也没有效果",
                spec.name(),
                phase.name
            ));
        }
    }
    warnings
}

/// 输出检查结果
fn print_check_result(result: &AnimCheckResult) {
    eprintln!("─────────────────────────────────────────────────────");
    eprintln!(
        "检查完成: {} 个文件, {} 个动画",
        result.files_checked, result.animations
    );
    eprintln!();

    for error in &result.errors {
        eprintln!("[ERROR] {error}");
    }
    for warning in &result.warnings {
        eprintln!("[WARN] {warning}");
    }

    eprintln!();
    if !result.errors.is_empty() {
        eprintln!(
            "❌ {} 个错误, {} 个警告",
            result.errors.len(),
            result.warnings.len()
        );
    } else if !result.warnings.is_empty() {
        eprintln!("⚠️  0 个错误, {} 个警告", result.warnings.len());
    } else {
        eprintln!("✅ 检查通过，无错误");
    }
}
