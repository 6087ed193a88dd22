//! 时间轴播放器
//!
//! 维护当前帧下标，并把前进/后退/跳转翻译成渲染指令。

use tracing::{debug, info, warn};

use super::autoplay::PlayHandle;
use super::render::{Readout, RenderEffect, RenderHost};
use crate::config::{DEFAULT_AUTOPLAY_SCALE, DEFAULT_MERGE_EPSILON};
use crate::error::PlayerError;
use crate::timeline::{Frame, Timeline};

fn readout(index: usize, frame: &Frame) -> RenderEffect {
    RenderEffect::Readout(Readout {
        index,
        t: frame.t,
        metrics: frame.metrics.clone(),
    })
}

/// 叠加式应用一帧：`sent` 加 marker，其余 reason 加 flag。
fn apply_frame<H: RenderHost>(host: &mut H, index: usize, frame: &Frame) -> Result<(), PlayerError> {
    for action in &frame.actions {
        let effect = if action.reason.is_sent() {
            RenderEffect::AddMarker {
                id: action.source_id,
            }
        } else {
            RenderEffect::AddFlag {
                id: action.source_id,
                reason: action.reason.clone(),
            }
        };
        host.apply(&effect)?;
    }
    host.apply(&readout(index, frame))?;
    Ok(())
}

/// 逆序撤销一帧，读数显示为上一帧的值。
fn undo_frame<H: RenderHost>(
    host: &mut H,
    frame: &Frame,
    prev_index: usize,
    prev: &Frame,
) -> Result<(), PlayerError> {
    for action in frame.actions.iter().rev() {
        let effect = if action.reason.is_sent() {
            RenderEffect::RemoveMarker {
                id: action.source_id,
            }
        } else {
            RenderEffect::RemoveFlag {
                id: action.source_id,
                reason: action.reason.clone(),
            }
        };
        host.apply(&effect)?;
    }
    host.apply(&readout(prev_index, prev))?;
    Ok(())
}

/// 时间轴播放器。
///
/// 构造时为空（Idle），`load_timeline` 之后才能步进；
/// 当前下标与播放标志是加载后仅有的可变状态。
pub struct Player<H: RenderHost> {
    timeline: Option<Timeline>,
    current: usize,
    pub(super) playing: PlayHandle,
    pub(super) autoplay_scale: f64,
    merge_epsilon: f64,
    host: H,
}

// 非有限值或负值按 0 处理
fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 { value } else { 0.0 }
}

fn requested(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}

impl<H: RenderHost> Player<H> {
    pub fn new(host: H) -> Player<H> {
        Player {
            timeline: None,
            current: 0,
            playing: PlayHandle::default(),
            autoplay_scale: DEFAULT_AUTOPLAY_SCALE,
            merge_epsilon: DEFAULT_MERGE_EPSILON,
            host,
        }
    }

    /// 自动播放倍率：帧间隔（秒）× scale = 等待毫秒数；负数或 NaN 视为 0
    pub fn with_autoplay_scale(mut self, scale: f64) -> Player<H> {
        if non_negative(scale) != scale {
            warn!(scale, "非法的自动播放倍率，按 0 处理");
        }
        self.autoplay_scale = non_negative(scale);
        self
    }

    /// 按时间跳转时使用的容差，应与构建时间轴时的合帧容差一致
    pub fn with_merge_epsilon(mut self, epsilon: f64) -> Player<H> {
        self.merge_epsilon = non_negative(epsilon);
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    /// 未加载时间轴时为 `None`
    pub fn current_index(&self) -> Option<usize> {
        self.timeline.as_ref().map(|_| self.current)
    }

    pub fn is_playing(&self) -> bool {
        self.playing.is_playing()
    }

    /// 可在其他任务中用来暂停自动播放
    pub fn play_handle(&self) -> PlayHandle {
        self.playing.clone()
    }

    pub fn pause(&self) {
        self.playing.pause();
    }

    pub(super) fn loaded(&self) -> Result<&Timeline, PlayerError> {
        self.timeline.as_ref().ok_or(PlayerError::NotLoaded)
    }

    /// 清空后从第 0 帧重放到 `index`（含）
    fn replay_to(&mut self, index: usize) -> Result<(), PlayerError> {
        let timeline = self.timeline.as_ref().ok_or(PlayerError::NotLoaded)?;
        self.host.apply(&RenderEffect::Clear)?;
        for (i, frame) in timeline.frames()[..=index].iter().enumerate() {
            apply_frame(&mut self.host, i, frame)?;
        }
        Ok(())
    }

    /// 宿主中途拒绝指令后，把渲染状态重建为当前帧的累计状态。
    fn resync(&mut self, err: PlayerError) -> PlayerError {
        warn!(error = %err, index = self.current, "渲染指令被拒绝，重放到当前帧");
        if let Err(e) = self.replay_to(self.current) {
            warn!(error = %e, "重放失败");
        }
        err
    }

    /// 替换时间轴，回到第 0 帧并停止播放。
    #[tracing::instrument(skip(self, timeline), fields(frames = timeline.len()))]
    pub fn load_timeline(&mut self, timeline: Timeline) -> Result<(), PlayerError> {
        self.playing.pause();
        self.current = 0;
        let frames = timeline.len();
        self.timeline = Some(timeline);
        if let Err(e) = self.replay_to(0) {
            return Err(self.resync(e));
        }
        info!(frames, "加载时间轴");
        Ok(())
    }

    /// 前进一帧；已在最后一帧时不做任何事并返回 `IndexOutOfRange`。
    pub fn step_forward(&mut self) -> Result<usize, PlayerError> {
        let timeline = self.timeline.as_ref().ok_or(PlayerError::NotLoaded)?;
        let next = self.current + 1;
        let Some(frame) = timeline.frame(next) else {
            let last = timeline.last_index();
            warn!(current = self.current, last, "已经是最后一帧");
            return Err(PlayerError::IndexOutOfRange {
                requested: requested(next),
                last,
            });
        };
        let (t, actions) = (frame.t, frame.actions.len());
        if let Err(e) = apply_frame(&mut self.host, next, frame) {
            return Err(self.resync(e));
        }
        self.current = next;
        debug!(index = next, t, actions, "前进");
        Ok(next)
    }

    /// 后退一帧：撤销当前帧，读数回到上一帧。
    pub fn step_backward(&mut self) -> Result<usize, PlayerError> {
        let timeline = self.timeline.as_ref().ok_or(PlayerError::NotLoaded)?;
        if self.current == 0 {
            warn!("已经是第一帧");
            return Err(PlayerError::IndexOutOfRange {
                requested: -1,
                last: timeline.last_index(),
            });
        }
        let prev = self.current - 1;
        let frames = timeline.frames();
        let t = frames[prev].t;
        if let Err(e) = undo_frame(&mut self.host, &frames[self.current], prev, &frames[prev]) {
            return Err(self.resync(e));
        }
        self.current = prev;
        debug!(index = prev, t, "后退");
        Ok(prev)
    }

    /// 清空后从第 0 帧重放到 `index`（含）。
    pub fn jump_to(&mut self, index: usize) -> Result<usize, PlayerError> {
        let last = self.loaded()?.last_index();
        if index > last {
            warn!(index, last, "跳转下标越界");
            return Err(PlayerError::IndexOutOfRange {
                requested: requested(index),
                last,
            });
        }
        if let Err(e) = self.replay_to(index) {
            return Err(self.resync(e));
        }
        self.current = index;
        debug!(index, "跳转");
        Ok(index)
    }

    /// 跳到时间戳 ≤ `t`（含合帧容差）的最后一帧。
    pub fn jump_to_time(&mut self, t: f64) -> Result<usize, PlayerError> {
        let index = self.loaded()?.index_at_or_before(t, self.merge_epsilon);
        self.jump_to(index)
    }
}
