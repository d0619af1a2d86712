//! 结果转换: 将累积距离平方转换为调用方所需的输出形式.

use std::path::Path;

use ndarray::{Array3, ArrayView3};
use num::Float;

use super::field::DistanceField;
use super::sample::{DistanceSample, OffsetTable};
use super::Polarity;
use crate::data::{Region3d, Spacing, VoxelSource};
use crate::{EdtError, EdtResult, Idx3i};

/// 距离变换结果. 与处理区域形状相同, 由调用方独占.
///
/// 数据按 `[z, y, x]` 标准布局存储, 与 [`crate::ArrayVolume`] 一致.
#[derive(Debug, Clone)]
pub struct DistanceMap<T> {
    data: Array3<T>,
    region: Region3d,
    spacing: Spacing,
}

impl<T: Float> DistanceMap<T> {
    /// 创建空结果.
    pub(crate) fn empty(spacing: Spacing) -> Self {
        Self {
            data: Array3::from_elem((0, 0, 0), T::zero()),
            region: Region3d::empty(),
            spacing,
        }
    }

    /// 获取绝对坐标 `(x, y, z)` 处的距离. 不在处理区域内时返回 `None`.
    #[inline]
    pub fn get(&self, pos: Idx3i) -> Option<T> {
        if !self.region.contains(pos) {
            return None;
        }
        let min = self.region.min();
        let [x, y, z] = [0, 1, 2].map(|d| (pos[d] - min[d]) as usize);
        Some(self.data[(z, y, x)])
    }

    /// 结果覆盖的区域.
    #[inline]
    pub fn region(&self) -> Region3d {
        self.region
    }

    /// 计算时使用的体素分辨率.
    #[inline]
    pub fn spacing(&self) -> Spacing {
        self.spacing
    }

    /// 获得数据的一份不可变 shallow copy, 按 `[z, y, x]` 排列.
    #[inline]
    pub fn view(&self) -> ArrayView3<'_, T> {
        self.data.view()
    }

    /// 消费自我, 获得底层数据.
    #[inline]
    pub fn into_array(self) -> Array3<T> {
        self.data
    }

    /// 体素个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// 是否为空.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 最小值与最大值. 结果为空时返回 `None`.
    pub fn min_max(&self) -> Option<(T, T)> {
        let mut it = self.data.iter().copied();
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

impl<T: Float + ndarray_npy::WritableElement> DistanceMap<T> {
    /// 以 npy 格式将结果 (`[z, y, x]` 排列) 写入 `path`.
    pub fn write_npy<P: AsRef<Path>>(&self, path: P) -> EdtResult<()> {
        ndarray_npy::write_npy(path.as_ref(), &self.data)?;
        Ok(())
    }
}

/// 结果转换器.
pub(crate) struct ResultFinalizer<'a, S> {
    pub source: &'a S,
    pub table: &'a OffsetTable,
    pub polarity: Polarity,
    pub signed: bool,
    pub squared: bool,
}

impl<S: VoxelSource> ResultFinalizer<'_, S> {
    /// 单次遍历, 将 `field` 中位于 `region` 的部分转换为输出. 光环被丢弃.
    pub fn run<T: Float>(
        &self,
        field: &DistanceField,
        region: Region3d,
        spacing: Spacing,
    ) -> EdtResult<DistanceMap<T>> {
        let voxels = region.len();
        let mut out: Vec<T> = Vec::new();
        out.try_reserve_exact(voxels)
            .map_err(|_| EdtError::Allocation { voxels })?;

        for pos in region.positions() {
            out.push(self.convert(pos, &field[field.offset(pos)]));
        }

        let [nx, ny, nz] = region.shape();
        let data = Array3::from_shape_vec((nz, ny, nx), out).map_err(|_| EdtError::Shape)?;
        Ok(DistanceMap {
            data,
            region,
            spacing,
        })
    }

    #[inline]
    fn convert<T: Float>(&self, pos: Idx3i, sample: &DistanceSample) -> T {
        let fg = self.polarity.is_foreground(self.source.value(pos));
        if !fg && !self.signed {
            return T::zero();
        }
        let sq = sample.resolve(self.table);
        if !sq.is_finite() {
            // 没有任何交界体素可达.
            return T::zero();
        }
        let m = if self.squared { sq } else { sq.sqrt() };
        let m = T::from(m).unwrap_or_else(T::max_value);
        if fg {
            m
        } else {
            -m
        }
    }
}
