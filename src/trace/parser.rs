//! 逐行扫描日志文本
//!
//! 事件行格式：
//!
//! ```text
//! <前缀>quack_log Instant { tv_sec: 100, tv_nsec: 0 } 1 (sent)<后缀>
//! ```
//!
//! 序列行格式（`key` 由调用方指定）：
//!
//! ```text
//! <前缀>cwnd 14600 Instant { tv_sec: 100, tv_nsec: 0 }<后缀>
//! ```
//!
//! 不匹配的行直接跳过（日志里绝大多数行都与回放无关）。

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::event::{RawEvent, Reason, Series, TimeSample};
use super::instant::LogInstant;
use crate::error::TraceError;

static EVENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"quack_log Instant \{ tv_sec: (\d+), tv_nsec: (\d+) \} (\d+) \((\S+)\)")
        .expect("event pattern is valid")
});

fn series_regex(key: &str) -> Regex {
    let pattern = format!(
        r"(?:^|\s){} (\d+) Instant \{{ tv_sec: (\d+), tv_nsec: (\d+) \}}",
        regex::escape(key)
    );
    Regex::new(&pattern).expect("escaped series pattern is valid")
}

fn cap_u64(caps: &Captures<'_>, idx: usize) -> Option<u64> {
    caps.get(idx)?.as_str().parse().ok()
}

/// 解析选项
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceOptions {
    /// 需要额外提取的数值序列 key（每个 key 扫描一遍）
    pub series_keys: Vec<String>,
}

/// 一次日志解析的结果（时间已归一化）
#[derive(Debug, Clone)]
pub struct ParsedLog {
    pub events: Vec<RawEvent>,
    pub series: Vec<Series>,
    /// 第一条匹配事件的绝对时间（秒）
    pub min_time: f64,
    /// 没有匹配事件格式的行数
    pub skipped_lines: usize,
}

/// 扫描所有事件行，返回绝对时间的事件与跳过的行数。
pub fn scan_events(text: &str) -> (Vec<RawEvent>, usize) {
    let mut events = Vec::new();
    let mut skipped = 0usize;
    for line in text.lines() {
        let parsed = EVENT_RE.captures(line).and_then(|caps| {
            let at = LogInstant::new(cap_u64(&caps, 1)?, cap_u64(&caps, 2)?);
            let source_id = cap_u64(&caps, 3)?;
            let reason = Reason::parse(caps.get(4)?.as_str());
            Some(RawEvent {
                t: at.as_secs_f64(),
                source_id,
                reason,
            })
        });
        match parsed {
            Some(ev) => events.push(ev),
            None => {
                skipped += 1;
                trace!(line, "skip non-event line");
            }
        }
    }
    (events, skipped)
}

/// 扫描某个 key 的序列行，返回绝对时间的采样。
pub fn scan_series(text: &str, key: &str) -> Vec<TimeSample> {
    let re = series_regex(key);
    text.lines()
        .filter_map(|line| {
            let caps = re.captures(line)?;
            let value = cap_u64(&caps, 1)?;
            let at = LogInstant::new(cap_u64(&caps, 2)?, cap_u64(&caps, 3)?);
            Some(TimeSample {
                t: at.as_secs_f64(),
                value,
            })
        })
        .collect()
}

/// 解析整份日志。
///
/// `min_time` 取第一条匹配事件的时间（按日志出现顺序，不重新排序），
/// 事件与所有序列采样都减去它；早于它的采样会得到负的相对时间。
#[tracing::instrument(skip(text, opts), fields(bytes = text.len(), series = opts.series_keys.len()))]
pub fn parse_log(text: &str, opts: &TraceOptions) -> Result<ParsedLog, TraceError> {
    let (mut events, skipped_lines) = scan_events(text);
    let min_time = events.first().map(|ev| ev.t).ok_or(TraceError::EmptyTimeline)?;

    for ev in &mut events {
        ev.t -= min_time;
    }

    let mut series = Vec::with_capacity(opts.series_keys.len());
    for key in &opts.series_keys {
        if series.iter().any(|s: &Series| &s.key == key) {
            continue;
        }
        let mut samples = scan_series(text, key);
        for s in &mut samples {
            s.t -= min_time;
        }
        debug!(key = %key, samples = samples.len(), "解析序列");
        series.push(Series::new(key.clone(), samples));
    }

    debug!(
        events = events.len(),
        skipped_lines,
        min_time,
        "日志解析完成"
    );

    Ok(ParsedLog {
        events,
        series,
        min_time,
        skipped_lines,
    })
}
