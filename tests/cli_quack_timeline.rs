use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "quack-viz-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn write_file(dir: &PathBuf, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write temp file");
    path
}

const CAPTURE: &str = "\
[sidecar] listening on h1-eth0
quack_log Instant { tv_sec: 100, tv_nsec: 0 } 1 (sent)
cwnd 14600 Instant { tv_sec: 100, tv_nsec: 0 } (on_packet_sent)
quack_log Instant { tv_sec: 100, tv_nsec: 0 } 2 (sent)
quack_log Instant { tv_sec: 101, tv_nsec: 0 } 1 (acked)
cwnd 29200 Instant { tv_sec: 101, tv_nsec: 0 } (on_ack)
";

#[test]
fn quack_timeline_writes_frames_json() {
    let dir = unique_temp_dir("timeline-json");
    let log = write_file(&dir, "capture.out", CAPTURE);
    let out_json = dir.join("timeline.json");

    let output = Command::new(env!("CARGO_BIN_EXE_quack_timeline"))
        .args([
            "--log",
            log.to_str().unwrap(),
            "--json",
            out_json.to_str().unwrap(),
            "--series",
            "cwnd",
        ])
        .output()
        .expect("run quack_timeline");
    assert!(
        output.status.success(),
        "quack_timeline failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let raw = fs::read_to_string(&out_json).expect("read timeline.json");
    let v: Value = serde_json::from_str(&raw).expect("parse timeline.json");
    let frames = v["frames"].as_array().expect("frames must be an array");
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0]["t"].as_f64(), Some(0.0));
    assert_eq!(frames[0]["actions"].as_array().map(|a| a.len()), Some(2));
    assert_eq!(frames[0]["metrics"]["cwnd"].as_u64(), Some(14600));
    assert_eq!(frames[1]["t"].as_f64(), Some(1.0));
    assert_eq!(frames[1]["actions"][0]["reason"].as_str(), Some("acked"));
    assert_eq!(frames[1]["metrics"]["cwnd"].as_u64(), Some(29200));
    assert_eq!(v["series_keys"][0].as_str(), Some("cwnd"));

    // 只写 JSON 时不打印汇总
    assert!(String::from_utf8_lossy(&output.stdout).trim().is_empty());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn quack_timeline_prints_summary() {
    let dir = unique_temp_dir("timeline-summary");
    let log = write_file(&dir, "capture.out", CAPTURE);

    let output = Command::new(env!("CARGO_BIN_EXE_quack_timeline"))
        .args(["--log", log.to_str().unwrap()])
        .output()
        .expect("run quack_timeline");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines = stdout.lines().collect::<Vec<_>>();
    assert_eq!(lines[0], "frames=2 actions=3 sources=2 duration_s=1.000000");
    assert!(lines.contains(&"reason sent 2"));
    assert!(lines.contains(&"reason acked 1"));
    assert!(lines.contains(&"metric cwnd 29200"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn quack_timeline_merge_tolerance_is_configurable() {
    let dir = unique_temp_dir("timeline-epsilon");
    let log = write_file(
        &dir,
        "capture.out",
        "\
quack_log Instant { tv_sec: 1, tv_nsec: 0 } 1 (sent)
quack_log Instant { tv_sec: 1, tv_nsec: 500000 } 2 (sent)
",
    );
    let cfg = write_file(&dir, "viz.json", r#"{ "merge_epsilon": 0.001, "series_keys": [] }"#);

    let frames_line = |extra: &[&str]| {
        let output = Command::new(env!("CARGO_BIN_EXE_quack_timeline"))
            .args(["--log", log.to_str().unwrap()])
            .args(extra)
            .output()
            .expect("run quack_timeline");
        assert!(output.status.success());
        String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string()
    };

    assert!(frames_line(&[]).starts_with("frames=2 "));
    assert!(frames_line(&["--config", cfg.to_str().unwrap()]).starts_with("frames=1 "));
    assert!(frames_line(&["--epsilon", "0.001", "--no-series"]).starts_with("frames=1 "));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn quack_timeline_fails_on_log_without_events() {
    let dir = unique_temp_dir("timeline-empty");
    let log = write_file(&dir, "capture.out", "nothing to see here\n");

    let output = Command::new(env!("CARGO_BIN_EXE_quack_timeline"))
        .args(["--log", log.to_str().unwrap()])
        .output()
        .expect("run quack_timeline");
    assert!(!output.status.success());
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("no events parsed"),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let _ = fs::remove_dir_all(&dir);
}
