use super::frame::Frame;
use crate::trace::Series;

/// 把一条序列按阶梯函数对齐到各帧。
///
/// 单调游标：对每一帧，只要下一个采样的时间 ≤ 帧时间（含容差）就前移；
/// 游标不回退，到最后一个采样后保持不动。
pub fn align_series(frames: &mut [Frame], series: &Series, epsilon: f64) {
    let samples = &series.samples;
    if samples.is_empty() {
        return;
    }

    let mut cursor = 0usize;
    for frame in frames.iter_mut() {
        while cursor + 1 < samples.len() && samples[cursor + 1].t <= frame.t + epsilon {
            cursor += 1;
        }
        let sample = samples[cursor];
        // 第一个采样还在该帧之后：没有可用的值
        if sample.t <= frame.t + epsilon {
            frame.metrics.insert(series.key.clone(), sample.value);
        }
    }
}
