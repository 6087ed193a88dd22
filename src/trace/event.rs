use std::fmt;

use serde::{Deserialize, Serialize};

/// `quack_log` 行括号里的原因标记。
///
/// 已知标记之外的任意 token 原样保留在 `Other` 里。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Reason {
    /// 数据包被发送；回放时对应一个可见的 marker
    Sent,
    Quacked,
    Acked,
    DetectLostPackets,
    SidecarDetectLostPackets,
    Other(String),
}

impl Reason {
    pub fn parse(token: &str) -> Reason {
        match token {
            "sent" => Reason::Sent,
            "quacked" => Reason::Quacked,
            "acked" => Reason::Acked,
            "detect_lost_packets" => Reason::DetectLostPackets,
            "sidecar_detect_lost_packets" => Reason::SidecarDetectLostPackets,
            other => Reason::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Reason::Sent => "sent",
            Reason::Quacked => "quacked",
            Reason::Acked => "acked",
            Reason::DetectLostPackets => "detect_lost_packets",
            Reason::SidecarDetectLostPackets => "sidecar_detect_lost_packets",
            Reason::Other(token) => token,
        }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, Reason::Sent)
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Reason {
    fn from(token: String) -> Self {
        Reason::parse(&token)
    }
}

impl From<Reason> for String {
    fn from(reason: Reason) -> Self {
        reason.as_str().to_string()
    }
}

/// 一条匹配的 `quack_log` 事件（时间单位：秒）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    pub t: f64,
    pub source_id: u64,
    pub reason: Reason,
}

/// 数值序列中的一个采样点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSample {
    pub t: f64,
    pub value: u64,
}

/// 一条带名字的数值序列（按日志顺序）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub key: String,
    pub samples: Vec<TimeSample>,
}

impl Series {
    pub fn new(key: impl Into<String>, samples: Vec<TimeSample>) -> Series {
        Series {
            key: key.into(),
            samples,
        }
    }
}
