//! 时间轴统计

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::frame::Timeline;

/// 一条时间轴的汇总统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineSummary {
    pub frames: usize,
    pub actions: usize,
    /// 出现过的不同 source id 数量
    pub sources: usize,
    pub duration_s: f64,
    /// reason token -> 次数
    pub per_reason: BTreeMap<String, usize>,
    /// 每条序列在最后一帧时的取值
    pub final_metrics: BTreeMap<String, u64>,
}

impl TimelineSummary {
    pub fn from_timeline(timeline: &Timeline) -> TimelineSummary {
        let mut per_reason = BTreeMap::new();
        let mut sources = BTreeSet::new();
        let mut actions = 0usize;

        for frame in timeline.frames() {
            for action in &frame.actions {
                actions += 1;
                sources.insert(action.source_id);
                *per_reason
                    .entry(action.reason.as_str().to_string())
                    .or_insert(0usize) += 1;
            }
        }

        let final_metrics = timeline
            .frame(timeline.last_index())
            .map(|f| f.metrics.clone())
            .unwrap_or_default();

        TimelineSummary {
            frames: timeline.len(),
            actions,
            sources: sources.len(),
            duration_s: timeline.duration(),
            per_reason,
            final_metrics,
        }
    }

    /// 发送了但没有被 ack 的次数（粗略的丢包视图）
    pub fn unacked(&self) -> usize {
        let sent = self.per_reason.get("sent").copied().unwrap_or(0);
        let acked = self.per_reason.get("acked").copied().unwrap_or(0);
        sent.saturating_sub(acked)
    }
}
