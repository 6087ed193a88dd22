//! 时间轴构建
//!
//! `RawEvent` 序列 → 按时间容差分组成 `Frame` → 把数值序列按阶梯函数对齐到每一帧。

mod align;
mod combine;
mod frame;
mod summary;

pub use align::align_series;
pub use combine::combine_actions;
pub use frame::{Action, Frame, Timeline};
pub use summary::TimelineSummary;

use crate::config::VizConfig;
use crate::error::TimelineError;
use crate::trace::{TraceOptions, parse_log};

/// 从原始日志文本直接构建时间轴。
pub fn build_timeline(text: &str, cfg: &VizConfig) -> Result<Timeline, TimelineError> {
    let opts = TraceOptions {
        series_keys: cfg.series_keys.clone(),
    };
    let parsed = parse_log(text, &opts)?;
    Timeline::build(&parsed, cfg.merge_epsilon)
}
