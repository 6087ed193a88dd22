use crate::config::VizConfig;
use crate::timeline::{TimelineSummary, build_timeline};

use super::{SCENARIO_LOG, timeline_from};

#[test]
fn summary_counts_actions_by_reason() {
    let summary = TimelineSummary::from_timeline(&timeline_from(SCENARIO_LOG));
    assert_eq!(summary.frames, 2);
    assert_eq!(summary.actions, 3);
    assert_eq!(summary.sources, 2);
    assert_eq!(summary.duration_s, 1.0);
    assert_eq!(summary.per_reason["sent"], 2);
    assert_eq!(summary.per_reason["acked"], 1);
    assert_eq!(summary.unacked(), 1);
    assert!(summary.final_metrics.is_empty());
}

#[test]
fn summary_reports_final_metric_values() {
    let text = "\
quack_log Instant { tv_sec: 1, tv_nsec: 0 } 1 (sent)
cwnd 14600 Instant { tv_sec: 1, tv_nsec: 0 }
quack_log Instant { tv_sec: 2, tv_nsec: 0 } 1 (detect_lost_packets)
cwnd 7300 Instant { tv_sec: 2, tv_nsec: 0 }
";
    let cfg = VizConfig {
        series_keys: vec!["cwnd".to_string()],
        ..VizConfig::default()
    };
    let summary = TimelineSummary::from_timeline(&build_timeline(text, &cfg).unwrap());
    assert_eq!(summary.final_metrics["cwnd"], 7300);
    assert_eq!(summary.per_reason["detect_lost_packets"], 1);
    assert_eq!(summary.unacked(), 1);
}
