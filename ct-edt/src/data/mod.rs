//! 距离变换所消费的体数据接口, 及其基础实现.

use crate::Idx3i;
use num::Zero;

mod region;
mod spacing;
mod volume;

pub use region::{Positions, Region3d};
pub use spacing::Spacing;
pub use volume::ArrayVolume;

/// 稠密 3D 体素网格. 这是距离变换引擎的输入.
///
/// 体素值与零比较即可得到前景/背景分类 (极性由
/// [`crate::edt::Polarity`] 决定).
pub trait VoxelSource {
    /// 体素值类型.
    type Value: Copy + Zero + PartialEq;

    /// 数据覆盖的闭区间.
    fn region(&self) -> Region3d;

    /// 体素分辨率.
    fn spacing(&self) -> Spacing;

    /// 获取 `pos` 处的体素值.
    ///
    /// # 注意
    ///
    /// `pos` 必须位于 `self.region()` 内. 越界时程序可能 panic.
    fn value(&self, pos: Idx3i) -> Self::Value;

    /// `pos` 是否位于数据范围内.
    #[inline]
    fn contains(&self, pos: Idx3i) -> bool {
        self.region().contains(pos)
    }
}

impl<S: VoxelSource + ?Sized> VoxelSource for &S {
    type Value = S::Value;

    #[inline]
    fn region(&self) -> Region3d {
        (**self).region()
    }

    #[inline]
    fn spacing(&self) -> Spacing {
        (**self).spacing()
    }

    #[inline]
    fn value(&self, pos: Idx3i) -> Self::Value {
        (**self).value(pos)
    }
}

/// 将 [`VoxelSource`] 的取值扩展到其区域之外.
///
/// 引擎只会在距区域边界一个体素的 "光环" 内调用它.
/// 区域内的坐标应直接转发给 `source`.
pub trait BoundaryAccessor<S: VoxelSource + ?Sized> {
    /// 获取 `pos` 处 (可能越界) 的体素值.
    fn value(&self, source: &S, pos: Idx3i) -> S::Value;
}

/// 边缘重复: 越界坐标被钳制到最近的区域内体素.
///
/// 在该策略下, 区域外永远不会与边缘体素构成前景/背景交界.
#[derive(Copy, Clone, Debug, Default)]
pub struct EdgeRepeat;

impl<S: VoxelSource + ?Sized> BoundaryAccessor<S> for EdgeRepeat {
    #[inline]
    fn value(&self, source: &S, pos: Idx3i) -> S::Value {
        let r = source.region();
        let (lo, hi) = (r.min(), r.max());
        source.value([0, 1, 2].map(|d| pos[d].clamp(lo[d], hi[d])))
    }
}

/// 固定值: 越界坐标一律返回给定值.
#[derive(Copy, Clone, Debug)]
pub struct ConstantBoundary<V>(pub V);

impl<S: VoxelSource + ?Sized> BoundaryAccessor<S> for ConstantBoundary<S::Value> {
    #[inline]
    fn value(&self, source: &S, pos: Idx3i) -> S::Value {
        if source.contains(pos) {
            source.value(pos)
        } else {
            self.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ArrayVolume, BoundaryAccessor, ConstantBoundary, EdgeRepeat, VoxelSource};
    use ndarray::Array3;

    fn ramp() -> ArrayVolume<u8> {
        // [z, y, x]
        let data = Array3::from_shape_fn((1, 2, 3), |(_, y, x)| (y * 3 + x) as u8);
        ArrayVolume::new(data, Default::default())
    }

    #[test]
    fn test_edge_repeat_clamps() {
        let v = ramp();
        assert_eq!(EdgeRepeat.value(&v, [-1, 0, 0]), 0);
        assert_eq!(EdgeRepeat.value(&v, [3, 1, 0]), 5);
        assert_eq!(EdgeRepeat.value(&v, [1, -1, 1]), 1);
        assert_eq!(EdgeRepeat.value(&v, [2, 1, 0]), v.value([2, 1, 0]));
    }

    #[test]
    fn test_constant_boundary() {
        let v = ramp();
        let acc = ConstantBoundary(9u8);
        assert_eq!(acc.value(&v, [-1, 0, 0]), 9);
        assert_eq!(acc.value(&v, [0, 0, 1]), 9);
        assert_eq!(acc.value(&v, [1, 1, 0]), 4);
    }
}
