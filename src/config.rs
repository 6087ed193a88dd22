//! 回放配置
//!
//! 可以从 JSON 文件加载，命令行参数再覆盖其中的字段。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 默认合帧容差（秒）
pub const DEFAULT_MERGE_EPSILON: f64 = 1e-6;
/// 默认自动播放倍率：每秒日志时间对应的毫秒数（1000 = 实时）
pub const DEFAULT_AUTOPLAY_SCALE: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    /// 时间差不超过该值的事件合并为同一帧（秒）
    pub merge_epsilon: f64,
    /// 自动播放时，帧间隔（秒）× 该值 = 实际等待的毫秒数
    pub autoplay_scale: f64,
    /// 需要提取并对齐的数值序列
    pub series_keys: Vec<String>,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            merge_epsilon: DEFAULT_MERGE_EPSILON,
            autoplay_scale: DEFAULT_AUTOPLAY_SCALE,
            series_keys: vec!["cwnd".to_string(), "bytes_in_flight".to_string()],
        }
    }
}

impl VizConfig {
    pub fn from_json_str(raw: &str) -> Result<VizConfig, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn load(path: &Path) -> Result<VizConfig, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = VizConfig::from_json_str(&raw).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// 命令行覆盖：`series` 非空时替换配置里的 key 列表
    pub fn with_overrides(
        mut self,
        merge_epsilon: Option<f64>,
        autoplay_scale: Option<f64>,
        series: Vec<String>,
    ) -> Result<VizConfig, ConfigError> {
        if let Some(eps) = merge_epsilon {
            self.merge_epsilon = eps;
        }
        if let Some(scale) = autoplay_scale {
            self.autoplay_scale = scale;
        }
        if !series.is_empty() {
            self.series_keys = series;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.merge_epsilon.is_finite() || self.merge_epsilon < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "merge_epsilon must be a finite non-negative number, got {}",
                self.merge_epsilon
            )));
        }
        if !self.autoplay_scale.is_finite() || self.autoplay_scale < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "autoplay_scale must be a finite non-negative number, got {}",
                self.autoplay_scale
            )));
        }
        if self.series_keys.iter().any(|k| k.trim().is_empty()) {
            return Err(ConfigError::Invalid("series key must not be empty".to_string()));
        }
        Ok(())
    }
}
