use tracing::debug;

use super::frame::{Action, Frame};
use crate::error::TimelineError;
use crate::trace::RawEvent;

/// 把时间相差不超过 `epsilon` 的相邻事件合并为同一帧。
///
/// 第一条事件总是打开第一帧；之后与当前帧时间差 > `epsilon` 时开新帧。
pub fn combine_actions(events: &[RawEvent], epsilon: f64) -> Result<Vec<Frame>, TimelineError> {
    let (first, rest) = events.split_first().ok_or(TimelineError::EmptyTimeline)?;

    let mut frames = Vec::new();
    let mut current = Frame::new(first.t);
    current.actions.push(Action {
        source_id: first.source_id,
        reason: first.reason.clone(),
    });

    for ev in rest {
        if (ev.t - current.t).abs() > epsilon {
            let next = Frame::new(ev.t);
            frames.push(std::mem::replace(&mut current, next));
        }
        current.actions.push(Action {
            source_id: ev.source_id,
            reason: ev.reason.clone(),
        });
    }
    frames.push(current);

    debug!(events = events.len(), frames = frames.len(), epsilon, "事件分组完成");
    Ok(frames)
}
