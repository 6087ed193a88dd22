//! 错误类型
//!
//! 每一层各自校验前置条件并返回结构化错误；不匹配的日志行不是错误。

use std::path::PathBuf;

use thiserror::Error;

/// 日志解析错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TraceError {
    /// 没有任何一行匹配事件格式
    #[error("no events parsed")]
    EmptyTimeline,
}

/// 时间轴构建错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimelineError {
    #[error("no events parsed")]
    EmptyTimeline,
}

impl From<TraceError> for TimelineError {
    fn from(err: TraceError) -> Self {
        match err {
            TraceError::EmptyTimeline => TimelineError::EmptyTimeline,
        }
    }
}

/// 渲染宿主拒绝某个渲染指令
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// 撤销了一个从未渲染过的 marker（或 flag）；说明上游分组/顺序有 bug
    #[error("unknown marker reference: id={id} reason={reason}")]
    UnknownMarkerReference { id: u64, reason: String },
}

/// 播放器错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlayerError {
    #[error("no timeline loaded")]
    NotLoaded,
    #[error("index {requested} out of range (last index is {last})")]
    IndexOutOfRange { requested: i64, last: usize },
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// 配置加载/校验错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}
