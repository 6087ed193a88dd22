//! 日志解析
//!
//! 把一次实验的完整日志文本解析为：
//! - 有序的 `RawEvent`（`quack_log` 行）
//! - 若干条数值序列（如 `cwnd`、`bytes_in_flight`）
//!
//! 所有时间戳都相对于第一条匹配事件的时间。

mod event;
mod instant;
mod parser;

pub use event::{RawEvent, Reason, Series, TimeSample};
pub use instant::LogInstant;
pub use parser::{ParsedLog, TraceOptions, parse_log, scan_events, scan_series};
