//! 终端回放
//!
//! 从 stdin 逐行读取命令驱动播放器，每条渲染指令打印为一行：
//!
//! ```text
//! n | next        前进一帧
//! p | prev        后退一帧
//! j <index>       跳到指定帧
//! t <seconds>     跳到该时刻之前的最后一帧
//! play / pause    自动播放 / 暂停
//! q | quit        退出
//! ```

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use clap::Parser;
use quack_viz::config::VizConfig;
use quack_viz::error::RenderError;
use quack_viz::player::{Player, RenderEffect, RenderHost, RenderState};
use quack_viz::timeline::build_timeline;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

#[derive(Debug, Parser)]
#[command(
    name = "quack-replay",
    about = "Step through a quack_log capture frame by frame"
)]
struct Args {
    /// Path to the captured log
    #[arg(long)]
    log: PathBuf,

    /// JSON config (merge_epsilon / autoplay_scale / series_keys)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Merge tolerance in seconds
    #[arg(long)]
    epsilon: Option<f64>,

    /// Autoplay delay in milliseconds per second of log time (1000 = real time)
    #[arg(long)]
    scale: Option<f64>,

    /// Numeric series to align (repeatable); replaces the configured keys
    #[arg(long = "series")]
    series: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Command {
    Next,
    Prev,
    Jump(usize),
    Time(f64),
    Play,
    Pause,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let cmd = parts.next().unwrap_or_default();
        let arg = parts.next();
        match (cmd, arg) {
            ("n" | "next", None) => Ok(Command::Next),
            ("p" | "prev", None) => Ok(Command::Prev),
            ("j" | "jump", Some(idx)) => idx
                .parse()
                .map(Command::Jump)
                .map_err(|_| format!("bad index: {idx}")),
            ("t" | "time", Some(t)) => t
                .parse()
                .map(Command::Time)
                .map_err(|_| format!("bad time: {t}")),
            ("play", None) => Ok(Command::Play),
            ("pause", None) => Ok(Command::Pause),
            ("q" | "quit", None) => Ok(Command::Quit),
            _ => Err(format!(
                "unknown command `{}` (n, p, j <index>, t <seconds>, play, pause, q)",
                line.trim()
            )),
        }
    }
}

/// 打印每条指令，同时维护内存渲染状态以发现非法撤销。
#[derive(Default)]
struct TerminalHost {
    state: RenderState,
}

impl RenderHost for TerminalHost {
    fn apply(&mut self, effect: &RenderEffect) -> Result<(), RenderError> {
        self.state.apply(effect)?;
        println!("{effect}");
        Ok(())
    }
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let base = match &args.config {
        Some(path) => VizConfig::load(path)?,
        None => VizConfig::default(),
    };
    let cfg = base.with_overrides(args.epsilon, args.scale, args.series)?;

    let text = fs::read_to_string(&args.log)
        .map_err(|e| format!("failed to read {}: {e}", args.log.display()))?;
    let timeline = build_timeline(&text, &cfg)?;
    let frames = timeline.len();

    let mut player = Player::new(TerminalHost::default())
        .with_autoplay_scale(cfg.autoplay_scale)
        .with_merge_epsilon(cfg.merge_epsilon);
    player.load_timeline(timeline)?;
    println!("# loaded {frames} frames");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let cmd = match line.parse::<Command>() {
            Ok(cmd) => cmd,
            Err(msg) => {
                println!("# {msg}");
                continue;
            }
        };
        debug!(?cmd, "命令");

        let res = match cmd {
            Command::Next => player.step_forward().map(|_| ()),
            Command::Prev => player.step_backward().map(|_| ()),
            Command::Jump(idx) => player.jump_to(idx).map(|_| ()),
            Command::Time(t) => player.jump_to_time(t).map(|_| ()),
            Command::Pause => {
                println!("# not playing");
                Ok(())
            }
            Command::Quit => break,
            Command::Play => {
                let handle = player.play_handle();
                let mut quit = false;
                let mut stdin_open = true;
                let outcome = {
                    let play = player.play();
                    tokio::pin!(play);
                    loop {
                        tokio::select! {
                            res = &mut play => break res,
                            line = lines.next_line(), if stdin_open => match line {
                                Ok(Some(l)) => match l.parse::<Command>() {
                                    Ok(Command::Pause) => handle.pause(),
                                    Ok(Command::Quit) => {
                                        handle.pause();
                                        quit = true;
                                    }
                                    _ => println!("# playing; only `pause` and `q` are accepted"),
                                },
                                // stdin 关闭：播放到结尾
                                _ => stdin_open = false,
                            },
                        }
                    }
                };
                match outcome {
                    Ok(o) => {
                        println!("# {o:?} at {}", player.current_index().unwrap_or_default());
                        if quit || !stdin_open {
                            break;
                        }
                        Ok(())
                    }
                    Err(e) => Err(e),
                }
            }
        };
        if let Err(e) = res {
            println!("# {e}");
        }
    }

    info!(index = ?player.current_index(), "回放结束");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
