//! 自动播放
//!
//! 协作式取消：每次等待前后都检查播放标志，`pause()` 在下一个帧边界生效，
//! 不会打断正在进行的等待。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info};

use super::render::RenderHost;
use super::timeline_player::Player;
use crate::error::PlayerError;

/// 共享的播放标志；克隆后可以在别的任务里暂停播放。
#[derive(Debug, Clone, Default)]
pub struct PlayHandle(Arc<AtomicBool>);

impl PlayHandle {
    pub fn is_playing(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn pause(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub(super) fn start(&self) {
        self.0.store(true, Ordering::Release);
    }
}

/// 自动播放循环的结束原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// 到达最后一帧
    Finished,
    /// 被 `pause()` 打断
    Paused,
}

impl<H: RenderHost> Player<H> {
    /// 从当前帧到下一帧需要等待的时长；已在最后一帧时为 `None`。
    pub fn next_delay(&self) -> Result<Option<Duration>, PlayerError> {
        let timeline = self.loaded()?;
        let Some(current) = self.current_index() else {
            return Err(PlayerError::NotLoaded);
        };
        let (Some(cur), Some(next)) = (timeline.frame(current), timeline.frame(current + 1)) else {
            return Ok(None);
        };
        // 乱序日志可能出现负间隔，按 0 处理
        let millis = (next.t - cur.t).max(0.0) * self.autoplay_scale;
        Ok(Some(
            Duration::try_from_secs_f64(millis / 1000.0).unwrap_or(Duration::ZERO),
        ))
    }

    /// 逐帧自动前进，帧间等待真实时间间隔 × 倍率。
    ///
    /// 到达最后一帧或被暂停时返回；播放器仍可继续单步。
    pub async fn play(&mut self) -> Result<PlayOutcome, PlayerError> {
        self.loaded()?;
        self.playing.start();
        info!(from = ?self.current_index(), scale = self.autoplay_scale, "▶️  开始自动播放");

        let outcome = self.play_loop().await;
        self.playing.pause();

        match &outcome {
            Ok(o) => info!(outcome = ?o, index = ?self.current_index(), "⏸️  自动播放结束"),
            Err(e) => debug!(error = %e, "自动播放出错"),
        }
        outcome
    }

    async fn play_loop(&mut self) -> Result<PlayOutcome, PlayerError> {
        loop {
            if !self.playing.is_playing() {
                return Ok(PlayOutcome::Paused);
            }
            let Some(delay) = self.next_delay()? else {
                return Ok(PlayOutcome::Finished);
            };
            tokio::time::sleep(delay).await;
            if !self.playing.is_playing() {
                return Ok(PlayOutcome::Paused);
            }
            self.step_forward()?;
        }
    }
}
