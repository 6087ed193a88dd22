//! 日志 → 时间轴
//!
//! 解析一份 quack_log 日志，输出回放用的时间轴 JSON 和汇总统计。

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use quack_viz::config::VizConfig;
use quack_viz::timeline::{TimelineSummary, build_timeline};
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "quack-timeline",
    about = "Parse a quack_log capture into a replay timeline"
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

    /// Numeric series to align (repeatable); replaces the configured keys
    #[arg(long = "series")]
    series: Vec<String>,

    /// Do not extract any numeric series
    #[arg(long, conflicts_with = "series")]
    no_series: bool,

    /// Output timeline JSON file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Print the summary even when writing JSON
    #[arg(long)]
    summary: bool,
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let base = match &args.config {
        Some(path) => VizConfig::load(path)?,
        None => VizConfig::default(),
    };
    let mut cfg = base.with_overrides(args.epsilon, None, args.series.clone())?;
    if args.no_series {
        cfg.series_keys.clear();
    }

    let text = fs::read_to_string(&args.log)
        .map_err(|e| format!("failed to read {}: {e}", args.log.display()))?;
    let timeline = build_timeline(&text, &cfg)?;

    if let Some(path) = &args.json {
        let json = serde_json::to_string_pretty(&timeline)?;
        fs::write(path, json)?;
        info!(path = %path.display(), frames = timeline.len(), "写出时间轴 JSON");
    }

    if args.summary || args.json.is_none() {
        let s = TimelineSummary::from_timeline(&timeline);
        println!(
            "frames={} actions={} sources={} duration_s={:.6}",
            s.frames, s.actions, s.sources, s.duration_s
        );
        for (reason, count) in &s.per_reason {
            println!("reason {reason} {count}");
        }
        for (key, value) in &s.final_metrics {
            println!("metric {key} {value}");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
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
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
