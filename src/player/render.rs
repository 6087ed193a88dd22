//! 渲染指令与渲染宿主
//!
//! 播放器只发出增删 marker / flag 以及数值读数的指令，从不直接操作任何界面树；
//! 具体怎么画由实现 `RenderHost` 的宿主决定。

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::trace::Reason;

/// 当前帧的数值读数（时间 + 各序列取值）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Readout {
    pub index: usize,
    pub t: f64,
    #[serde(default)]
    pub metrics: BTreeMap<String, u64>,
}

/// 一条渲染指令
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderEffect {
    /// 清空所有已渲染状态
    Clear,
    /// `sent`：显示一个以 source id 标识的 marker
    AddMarker { id: u64 },
    RemoveMarker { id: u64 },
    /// 其他 reason：在 marker 上打一个状态标记
    AddFlag { id: u64, reason: Reason },
    RemoveFlag { id: u64, reason: Reason },
    /// 更新时间/指标读数
    Readout(Readout),
}

impl fmt::Display for RenderEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderEffect::Clear => f.write_str("clear"),
            RenderEffect::AddMarker { id } => write!(f, "+ {id}"),
            RenderEffect::RemoveMarker { id } => write!(f, "- {id}"),
            RenderEffect::AddFlag { id, reason } => write!(f, "+ {id} {reason}"),
            RenderEffect::RemoveFlag { id, reason } => write!(f, "- {id} {reason}"),
            RenderEffect::Readout(r) => {
                write!(f, "@ {} t={:.6}", r.index, r.t)?;
                for (key, value) in &r.metrics {
                    write!(f, " {key}={value}")?;
                }
                Ok(())
            }
        }
    }
}

/// UI 宿主边界：接收渲染指令。
pub trait RenderHost {
    fn apply(&mut self, effect: &RenderEffect) -> Result<(), RenderError>;
}

/// 单个 marker 的渲染状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerState {
    /// 当前可见的实例数（同一 id 可能被多次 `sent`）
    pub instances: u32,
    /// reason -> 叠加次数
    pub flags: BTreeMap<Reason, u32>,
}

impl MarkerState {
    pub fn is_visible(&self) -> bool {
        self.instances > 0
    }

    pub fn has_flag(&self, reason: &Reason) -> bool {
        self.flags.get(reason).is_some_and(|n| *n > 0)
    }

    fn is_blank(&self) -> bool {
        self.instances == 0 && self.flags.is_empty()
    }
}

/// 内存中的渲染状态：marker id -> 状态，加上最近一次读数。
///
/// 增加操作都计数，撤销时按计数递减，因此前进再后退能精确还原。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderState {
    markers: BTreeMap<u64, MarkerState>,
    readout: Option<Readout>,
}

impl RenderState {
    pub fn marker(&self, id: u64) -> Option<&MarkerState> {
        self.markers.get(&id)
    }

    pub fn markers(&self) -> &BTreeMap<u64, MarkerState> {
        &self.markers
    }

    pub fn visible_markers(&self) -> Vec<u64> {
        self.markers
            .iter()
            .filter(|(_, m)| m.is_visible())
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn readout(&self) -> Option<&Readout> {
        self.readout.as_ref()
    }

    fn drop_if_blank(&mut self, id: u64) {
        if self.markers.get(&id).is_some_and(MarkerState::is_blank) {
            self.markers.remove(&id);
        }
    }
}

impl RenderHost for RenderState {
    fn apply(&mut self, effect: &RenderEffect) -> Result<(), RenderError> {
        match effect {
            RenderEffect::Clear => {
                self.markers.clear();
                self.readout = None;
            }
            RenderEffect::AddMarker { id } => {
                self.markers.entry(*id).or_default().instances += 1;
            }
            RenderEffect::RemoveMarker { id } => {
                let marker = self
                    .markers
                    .get_mut(id)
                    .filter(|m| m.instances > 0)
                    .ok_or_else(|| RenderError::UnknownMarkerReference {
                        id: *id,
                        reason: Reason::Sent.to_string(),
                    })?;
                marker.instances -= 1;
                self.drop_if_blank(*id);
            }
            RenderEffect::AddFlag { id, reason } => {
                *self
                    .markers
                    .entry(*id)
                    .or_default()
                    .flags
                    .entry(reason.clone())
                    .or_insert(0) += 1;
            }
            RenderEffect::RemoveFlag { id, reason } => {
                let unknown = || RenderError::UnknownMarkerReference {
                    id: *id,
                    reason: reason.to_string(),
                };
                let marker = self.markers.get_mut(id).ok_or_else(unknown)?;
                let count = marker.flags.get_mut(reason).ok_or_else(unknown)?;
                *count -= 1;
                if *count == 0 {
                    marker.flags.remove(reason);
                }
                self.drop_if_blank(*id);
            }
            RenderEffect::Readout(r) => {
                self.readout = Some(r.clone());
            }
        }
        Ok(())
    }
}
