use std::ops::{Index, IndexMut};

use super::sample::DistanceSample;
use crate::data::Region3d;
use crate::{EdtError, EdtResult, Idx3i};

/// 引擎自有的距离场缓冲区, 每个体素一个 [`DistanceSample`].
///
/// 引擎为其分配的区域是处理区域沿参与计算的轴各外扩一层 (光环),
/// 光环中的样本只作为种子参与扫描, 不出现在结果中.
///
/// 平铺索引为 `x + y * stride_y + z * stride_z` (相对于区域最小角).
#[derive(Debug, Clone)]
pub struct DistanceField {
    region: Region3d,
    strides: [usize; 3],
    data: Vec<DistanceSample>,
}

impl DistanceField {
    /// 为 `region` 分配距离场并以 [`DistanceSample::UNSET`] 填充.
    ///
    /// 内存不足时返回 `Err(EdtError::Allocation)`.
    pub fn new(region: Region3d) -> EdtResult<Self> {
        let voxels = region.len();
        let mut data = Vec::new();
        data.try_reserve_exact(voxels)
            .map_err(|_| EdtError::Allocation { voxels })?;
        data.resize(voxels, DistanceSample::UNSET);

        let [nx, ny, _] = region.shape();
        Ok(Self {
            region,
            strides: [1, nx, nx * ny],
            data,
        })
    }

    /// 距离场覆盖的区域.
    #[inline]
    pub fn region(&self) -> Region3d {
        self.region
    }

    /// 区域形状, 按 `(x, y, z)` 排列.
    #[inline]
    pub fn shape(&self) -> [usize; 3] {
        self.region.shape()
    }

    /// 三个方向的平铺步长.
    #[inline]
    pub fn strides(&self) -> [usize; 3] {
        self.strides
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

    /// 将绝对坐标转换为平铺索引.
    ///
    /// # 注意
    ///
    /// `pos` 必须位于区域内, 否则结果无意义 (debug 模式下 panic).
    #[inline]
    pub fn offset(&self, pos: Idx3i) -> usize {
        debug_assert!(self.region.contains(pos));
        let min = self.region.min();
        (0..3)
            .map(|d| (pos[d] - min[d]) as usize * self.strides[d])
            .sum()
    }

    /// 获取 `pos` 处的样本. 越界时返回 `None`.
    #[inline]
    pub fn get(&self, pos: Idx3i) -> Option<DistanceSample> {
        self.region
            .contains(pos)
            .then(|| self.data[self.offset(pos)])
    }

    /// 按平铺顺序迭代所有样本.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, DistanceSample> {
        self.data.iter()
    }

    /// 底层平铺数据.
    #[inline]
    pub fn as_slice(&self) -> &[DistanceSample] {
        &self.data
    }

    /// 底层平铺数据 (可变).
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [DistanceSample] {
        &mut self.data
    }
}

impl Index<usize> for DistanceField {
    type Output = DistanceSample;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl IndexMut<usize> for DistanceField {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}
