//! 时间轴回放
//!
//! - `Player`：状态机（加载 / 单步 / 跳转 / 自动播放）
//! - `RenderHost`：接收渲染指令的宿主边界
//! - `RenderState`：内存中的渲染状态，测试和终端回放都用它

mod autoplay;
mod render;
mod timeline_player;

pub use autoplay::{PlayHandle, PlayOutcome};
pub use render::{MarkerState, Readout, RenderEffect, RenderHost, RenderState};
pub use timeline_player::Player;
