//! 日志时间戳
//!
//! 日志里的时间是 Rust `std::time::Instant` 的 Debug 输出：
//! `Instant { tv_sec: 100, tv_nsec: 250 }`。

/// 日志中打印的单调时钟时间点。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct LogInstant {
    pub tv_sec: u64,
    pub tv_nsec: u64,
}

impl LogInstant {
    pub fn new(tv_sec: u64, tv_nsec: u64) -> LogInstant {
        LogInstant { tv_sec, tv_nsec }
    }

    /// 转成秒（f64）。会有浮点舍入，下游比较都带容差。
    pub fn as_secs_f64(&self) -> f64 {
        self.tv_sec as f64 + self.tv_nsec as f64 / 1e9
    }
}
