mod render_state;
mod summary;

use crate::config::VizConfig;
use crate::timeline::{Timeline, build_timeline};

/// 三行日志：t=0 两个 sent，t=1 一个 acked
pub(crate) const SCENARIO_LOG: &str = "\
quack_log Instant { tv_sec: 100, tv_nsec: 0 } 1 (sent)
quack_log Instant { tv_sec: 100, tv_nsec: 0 } 2 (sent)
quack_log Instant { tv_sec: 101, tv_nsec: 0 } 1 (acked)
";

pub(crate) fn timeline_from(text: &str) -> Timeline {
    let cfg = VizConfig {
        series_keys: Vec::new(),
        ..VizConfig::default()
    };
    build_timeline(text, &cfg).expect("timeline")
}
