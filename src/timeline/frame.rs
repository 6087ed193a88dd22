use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::align::align_series;
use super::combine::combine_actions;
use crate::error::TimelineError;
use crate::trace::{ParsedLog, Reason};

/// 帧内的一个动作：某个 source id 的一次事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub source_id: u64,
    pub reason: Reason,
}

/// 回放的最小单位
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// 相对时间（秒），取该帧第一条事件的时间
    pub t: f64,
    pub actions: Vec<Action>,
    /// 每条序列在该帧时刻的取值；该时刻之前没有采样的 key 不出现
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metrics: BTreeMap<String, u64>,
}

impl Frame {
    pub fn new(t: f64) -> Frame {
        Frame {
            t,
            actions: Vec::new(),
            metrics: BTreeMap::new(),
        }
    }
}

/// 非空、按时间升序排列的帧序列；构建后不可变。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TimelineRepr")]
pub struct Timeline {
    frames: Vec<Frame>,
    series_keys: Vec<String>,
}

#[derive(Deserialize)]
struct TimelineRepr {
    frames: Vec<Frame>,
    #[serde(default)]
    series_keys: Vec<String>,
}

impl TryFrom<TimelineRepr> for Timeline {
    type Error = TimelineError;

    fn try_from(repr: TimelineRepr) -> Result<Self, Self::Error> {
        Timeline::new(repr.frames, repr.series_keys)
    }
}

impl Timeline {
    /// 空帧序列返回 `EmptyTimeline`。
    pub fn new(frames: Vec<Frame>, series_keys: Vec<String>) -> Result<Timeline, TimelineError> {
        if frames.is_empty() {
            return Err(TimelineError::EmptyTimeline);
        }
        Ok(Timeline {
            frames,
            series_keys,
        })
    }

    /// 分组 + 序列对齐。
    pub fn build(parsed: &ParsedLog, epsilon: f64) -> Result<Timeline, TimelineError> {
        let mut frames = combine_actions(&parsed.events, epsilon)?;
        for series in &parsed.series {
            align_series(&mut frames, series, epsilon);
        }
        let keys = parsed.series.iter().map(|s| s.key.clone()).collect();
        let timeline = Timeline::new(frames, keys)?;
        info!(
            frames = timeline.len(),
            events = parsed.events.len(),
            duration_s = timeline.duration(),
            "时间轴构建完成"
        );
        Ok(timeline)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn series_keys(&self) -> &[String] {
        &self.series_keys
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    // 构造时保证非空
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn last_index(&self) -> usize {
        self.frames.len() - 1
    }

    /// 最后一帧与第一帧的时间差（秒）
    pub fn duration(&self) -> f64 {
        self.frames[self.last_index()].t - self.frames[0].t
    }

    /// 时间戳 ≤ `t`（含容差 `epsilon`）的最大帧下标；`t` 早于所有帧时返回 0。
    pub fn index_at_or_before(&self, t: f64, epsilon: f64) -> usize {
        let mut idx = 0;
        for (i, frame) in self.frames.iter().enumerate() {
            if frame.t <= t + epsilon {
                idx = i;
            } else {
                break;
            }
        }
        idx
    }
}
