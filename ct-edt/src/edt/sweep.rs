//! 逐轴扫描: 在每条扫描线上构造抛物线下包络, 将该轴并入累积距离平方.

use super::field::DistanceField;
use super::sample::{DistanceSample, OffsetTable};

/// 扫描线上的抛物线下包络.
///
/// 每个保留项 `(h, g)` 代表抛物线 `g + step^2 * (x - h)^2`.
/// 两个栈在整条扫描 (同一轴的所有扫描线) 中复用.
#[derive(Debug, Clone)]
pub(crate) struct LowerEnvelope {
    /// 抛物线顶点位置.
    h: Vec<usize>,

    /// 顶点处的累积距离平方.
    g: Vec<f64>,

    /// 该轴相邻体素的物理间距.
    step: f64,
}

impl LowerEnvelope {
    pub fn with_capacity(len: usize, step: f64) -> Self {
        Self {
            h: Vec::with_capacity(len),
            g: Vec::with_capacity(len),
            step,
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.h.clear();
        self.g.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.h.is_empty()
    }

    #[cfg(test)]
    #[inline]
    pub fn len(&self) -> usize {
        self.h.len()
    }

    /// 给定保留项 `(x1, g1)`, `(x2, g2)` 与候选项 `(xf, gf)`,
    /// 判断 `(x2, g2)` 是否处处被另外两项支配.
    #[inline]
    fn dominated(&self, (x1, g1): (usize, f64), (x2, g2): (usize, f64), (xf, gf): (usize, f64)) -> bool {
        let a = self.step * (x2 - x1) as f64;
        let b = self.step * (xf - x2) as f64;
        let c = self.step * (xf - x1) as f64;
        c * g2.abs() - b * g1.abs() - a * gf.abs() - a * b * c > 0.0
    }

    /// 压入位置 `i` 处的有限值 `f`. `i` 必须严格递增.
    pub fn push(&mut self, i: usize, f: f64) {
        debug_assert!(f.is_finite());
        debug_assert!(self.h.last().map_or(true, |&l| l < i));

        while self.h.len() >= 2 {
            let n = self.h.len();
            let first = (self.h[n - 2], self.g[n - 2]);
            let second = (self.h[n - 1], self.g[n - 1]);
            if !self.dominated(first, second, (i, f)) {
                break;
            }
            self.h.pop();
            self.g.pop();
        }
        self.h.push(i);
        self.g.push(f);
    }

    /// 第 `k` 项在位置 `i` 处的取值.
    #[inline]
    fn eval(&self, k: usize, i: usize) -> f64 {
        let d = self.step * self.h[k].abs_diff(i) as f64;
        self.g[k] + d * d
    }

    /// 对 `0..len` 的每个位置求包络最小值, 依次交给 `write`.
    ///
    /// 包络不能为空.
    pub fn evaluate<F: FnMut(usize, f64)>(&self, len: usize, mut write: F) {
        debug_assert!(!self.is_empty());
        let mut l = 0usize;
        for i in 0..len {
            while l + 1 < self.h.len() && self.eval(l + 1, i) < self.eval(l, i) {
                l += 1;
            }
            write(i, self.eval(l, i));
        }
    }
}

/// 单轴扫描统计.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// 处理过的扫描线条数 (含被跳过的).
    pub lines: usize,

    /// 因不含任何有限值而被跳过的扫描线条数.
    pub skipped: usize,
}

/// 将第 `axis` 轴并入 `field` 中每个体素的累积距离平方.
///
/// `step` 为该轴相邻体素的物理间距. 长度为 1 的轴不产生任何贡献, 直接跳过.
/// 扫描中遇到的 `Pending` 样本会被换算并写回为 `Resolved`.
pub(crate) fn sweep_axis(
    field: &mut DistanceField,
    axis: usize,
    step: f64,
    table: &OffsetTable,
) -> SweepStats {
    let shape = field.shape();
    let strides = field.strides();
    let len = shape[axis];
    if len <= 1 || field.is_empty() {
        log::trace!("axis {axis} has extent {len}, skipped");
        return SweepStats::default();
    }

    // 其余两个轴.
    let (a1, a2) = match axis {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    };
    let stride = strides[axis];
    let data = field.as_mut_slice();
    let mut envelope = LowerEnvelope::with_capacity(len, step);
    let mut stats = SweepStats::default();

    for j in 0..shape[a2] {
        for i in 0..shape[a1] {
            let base = i * strides[a1] + j * strides[a2];
            stats.lines += 1;

            envelope.clear();
            for p in 0..len {
                let idx = base + p * stride;
                let f = match data[idx] {
                    DistanceSample::Resolved(d) => d,
                    DistanceSample::Pending(k) => {
                        let d = table.squared_distance(k);
                        data[idx] = DistanceSample::Resolved(d);
                        d
                    }
                };
                if f.is_finite() {
                    envelope.push(p, f);
                }
            }
            if envelope.is_empty() {
                stats.skipped += 1;
                continue;
            }

            envelope.evaluate(len, |p, v| {
                let idx = base + p * stride;
                if let DistanceSample::Resolved(cur) = data[idx] {
                    if v < cur {
                        data[idx] = DistanceSample::Resolved(v);
                    }
                }
            });
        }
    }
    stats
}
