//! 距离场中的单个样本, 以及邻域偏移表.

use itertools::iproduct;

use crate::Idx3i;

/// 距离场中单个体素的状态.
///
/// 每个样本在任意时刻只处于两种状态之一. `Pending` 样本会在第一次参与扫描时被转换为
/// `Resolved`, 之后不会再回到 `Pending`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DistanceSample {
    /// 已累积的距离平方 (`>= 0`). `+inf` 表示尚未赋值 (见 [`Self::UNSET`]).
    Resolved(f64),

    /// 尚未换算的亚体素初值, 指向 [`OffsetTable`] 的第 `k` 项.
    Pending(u8),
}

impl DistanceSample {
    /// "尚未赋值" 哨兵.
    pub const UNSET: Self = Self::Resolved(f64::INFINITY);

    /// 是否仍是哨兵值?
    #[inline]
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Resolved(d) if d.is_infinite())
    }

    /// 是否尚待换算?
    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// 换算为距离平方. `Pending` 通过 `table` 查表.
    #[inline]
    pub fn resolve(&self, table: &OffsetTable) -> f64 {
        match *self {
            Self::Resolved(d) => d,
            Self::Pending(k) => table.squared_distance(k),
        }
    }
}

/// 26-邻域中的一个带符号偏移, 以及其绝对值在 [`OffsetTable`] 中的索引.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NeighborOffset {
    /// `(dx, dy, dz)`.
    pub delta: Idx3i,

    /// `|delta|` 在偏移表中的索引.
    pub entry: u8,
}

/// 预计算的邻域偏移表.
///
/// 保存 26-邻域 (长度为 1 的轴不参与) 中互不相同的绝对位移,
/// 每项同时缓存其 "到两体素中点" 的距离平方 (亚体素初值) 和完整位移长度的平方.
#[derive(Clone, Debug)]
pub struct OffsetTable {
    /// 互不相同的绝对位移.
    entries: Vec<[u8; 3]>,

    /// `entries[k]` 一半长度的距离平方.
    half_sq: Vec<f64>,

    /// `entries[k]` 完整长度的距离平方.
    full_sq: Vec<f64>,

    /// 固定扫描顺序 (z 最外层, x 最内层) 的带符号邻域偏移.
    scan: Vec<NeighborOffset>,
}

impl OffsetTable {
    /// 构建偏移表.
    ///
    /// `active[d]` 为 `false` 的轴 (长度为 1) 不会出现在邻域中.
    /// `weights[d]` 为该轴单位偏移的距离平方 (即分辨率平方, 或不考虑分辨率时的 1).
    pub fn new(active: [bool; 3], weights: [f64; 3]) -> Self {
        let span = |d: usize| if active[d] { -1i64..=1 } else { 0..=0 };

        let mut entries: Vec<[u8; 3]> = Vec::with_capacity(7);
        let mut scan = Vec::with_capacity(26);
        for (dz, dy, dx) in iproduct!(span(2), span(1), span(0)) {
            if (dx, dy, dz) == (0, 0, 0) {
                continue;
            }
            let abs = [dx, dy, dz].map(|v| v.unsigned_abs() as u8);
            let entry = match entries.iter().position(|e| *e == abs) {
                Some(k) => k,
                None => {
                    entries.push(abs);
                    entries.len() - 1
                }
            };
            scan.push(NeighborOffset {
                delta: [dx, dy, dz],
                entry: entry as u8,
            });
        }

        let full_sq: Vec<f64> = entries
            .iter()
            .map(|e| (0..3).map(|d| f64::from(e[d]) * weights[d]).sum())
            .collect();
        let half_sq = full_sq.iter().map(|f| 0.25 * f).collect();

        Self {
            entries,
            half_sq,
            full_sq,
            scan,
        }
    }

    /// 第 `k` 项的亚体素初值 (到两体素中点的距离平方).
    #[inline]
    pub fn squared_distance(&self, k: u8) -> f64 {
        self.half_sq[k as usize]
    }

    /// 第 `k` 项完整位移长度的平方.
    #[inline]
    pub fn full_squared(&self, k: u8) -> f64 {
        self.full_sq[k as usize]
    }

    /// 第 `k` 项绝对位移.
    #[inline]
    pub fn displacement(&self, k: u8) -> [u8; 3] {
        self.entries[k as usize]
    }

    /// 不同绝对位移的个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否不含任何位移 (三个轴的长度都为 1).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 带符号邻域偏移, 按固定扫描顺序.
    #[inline]
    pub fn neighbors(&self) -> &[NeighborOffset] {
        &self.scan
    }
}

#[cfg(test)]
mod tests {
    use super::{DistanceSample, OffsetTable};

    fn f64_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_offset_table_full() {
        let t = OffsetTable::new([true; 3], [1.0; 3]);
        assert_eq!(t.neighbors().len(), 26);
        // 1 个面方向 * 3 + 棱方向 * 3 + 角方向 * 1
        assert_eq!(t.len(), 7);
        for n in t.neighbors() {
            assert_eq!(t.displacement(n.entry), n.delta.map(|v| v.unsigned_abs() as u8));
        }
        // 扫描从 (-1, -1, -1) 开始.
        assert_eq!(t.neighbors()[0].delta, [-1, -1, -1]);
        assert!(f64_eq(t.squared_distance(t.neighbors()[0].entry), 0.75));
    }

    #[test]
    fn test_offset_table_degenerate_axis() {
        let t = OffsetTable::new([true, true, false], [1.0, 4.0, 1.0]);
        assert_eq!(t.neighbors().len(), 8);
        assert_eq!(t.len(), 3);
        assert!(t.neighbors().iter().all(|n| n.delta[2] == 0));

        let t = OffsetTable::new([false; 3], [1.0; 3]);
        assert!(t.is_empty());
        assert!(t.neighbors().is_empty());
    }

    #[test]
    fn test_offset_table_weights() {
        let t = OffsetTable::new([true; 3], [0.25, 1.0, 9.0]);
        let k = t
            .neighbors()
            .iter()
            .find(|n| n.delta == [0, 0, 1])
            .unwrap()
            .entry;
        assert!(f64_eq(t.full_squared(k), 9.0));
        assert!(f64_eq(t.squared_distance(k), 2.25));
    }

    #[test]
    fn test_sample_resolve() {
        let t = OffsetTable::new([true; 3], [1.0; 3]);
        assert!(DistanceSample::UNSET.is_unset());
        assert!(!DistanceSample::Resolved(0.0).is_unset());
        let p = DistanceSample::Pending(0);
        assert!(p.is_pending());
        assert!(f64_eq(p.resolve(&t), t.squared_distance(0)));
        assert!(f64_eq(DistanceSample::Resolved(2.0).resolve(&t), 2.0));
    }
}
