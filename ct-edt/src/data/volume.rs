use std::path::Path;

use ndarray::{Array3, ArrayView3};
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};
use num::Zero;

use super::{Region3d, Spacing, VoxelSource};
use crate::{EdtError, EdtResult, Idx3i};

/// 基于 `ndarray::Array3` 的体数据. 这是本 crate 自带的 [`VoxelSource`] 实现.
///
/// 数据按 `[z, y, x]` 标准布局存储 (x 方向内存连续), 对外坐标按 `(x, y, z)`
/// 排列, 并可通过 `origin` 平移到任意整数位置.
#[derive(Debug, Clone)]
pub struct ArrayVolume<V> {
    data: Array3<V>,
    spacing: Spacing,
    origin: Idx3i,
}

/// 将 nifti 的 (W, H, z) 体素个数转换为 (z, H, W).
#[inline]
fn get_shape_from_header(h: &NiftiHeader) -> (usize, usize, usize) {
    let [_, w, h, z, ..] = h.dim;
    (z as usize, h as usize, w as usize)
}

impl<V> ArrayVolume<V> {
    /// 以 `[z, y, x]` 格式的 `data` 和分辨率 `spacing` 创建体数据, 最小角位于原点.
    #[inline]
    pub fn new(data: Array3<V>, spacing: Spacing) -> Self {
        Self {
            data,
            spacing,
            origin: [0, 0, 0],
        }
    }

    /// 与 [`Self::new`] 相同, 但数据最小角位于 `origin` (`(x, y, z)` 排列).
    #[inline]
    pub fn with_origin(data: Array3<V>, spacing: Spacing, origin: Idx3i) -> Self {
        Self {
            data,
            spacing,
            origin,
        }
    }

    /// 由按 nifti 惯例 `[x, y, z]` 排列的数据创建体数据. 内部会转换为 `[z, y, x]`.
    pub fn from_xyz(data: Array3<V>, spacing: Spacing) -> Self
    where
        V: Clone,
    {
        let data = data.permuted_axes([2, 1, 0]);
        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().to_owned()
        };
        debug_assert!(data.is_standard_layout());
        Self::new(data, spacing)
    }

    /// 获得数据的一份不可变 shallow copy, 按 `[z, y, x]` 排列.
    #[inline]
    pub fn data(&self) -> ArrayView3<'_, V> {
        self.data.view()
    }

    /// 消费自我, 获得底层数据.
    #[inline]
    pub fn into_data(self) -> Array3<V> {
        self.data
    }

    /// 数据最小角.
    #[inline]
    pub fn origin(&self) -> Idx3i {
        self.origin
    }

    /// 将绝对坐标 `(x, y, z)` 转换为底层数组索引 `(z, y, x)`.
    /// 越界 (包括小于 `origin`) 时返回 `None`.
    #[inline]
    fn local(&self, pos: Idx3i) -> Option<(usize, usize, usize)> {
        let [x, y, z] = [0, 1, 2].map(|d| pos[d] - self.origin[d]);
        if x < 0 || y < 0 || z < 0 {
            return None;
        }
        Some((z as usize, y as usize, x as usize))
    }

    /// 获取 `pos` 处的体素值. 越界时返回 `None`.
    #[inline]
    pub fn get(&self, pos: Idx3i) -> Option<&V> {
        self.data.get(self.local(pos)?)
    }
}

impl ArrayVolume<u8> {
    /// 打开 nii 文件格式的 3D 标签体数据. `path` 为 nii 文件的本地路径.
    ///
    /// 分辨率取自 header 的 `pixdim`. 若文件无法读取, 体素类型不兼容或分辨率非法,
    /// 则返回 `Err`.
    pub fn open_nifti<P: AsRef<Path>>(path: P) -> EdtResult<Self> {
        let obj = ReaderOptions::new().read_file(path.as_ref())?;
        let header = obj.header().clone();
        let [_, sx, sy, sz, ..] = header.pixdim;
        let spacing = Spacing::new([sx as f64, sy as f64, sz as f64])?;

        // [W, H, z] -> [z, H, W].
        let data = obj
            .into_volume()
            .into_ndarray::<u8>()?
            .permuted_axes([2, 1, 0].as_slice());

        // The nature of nifti data field layout.
        debug_assert!(data.is_standard_layout());

        let data = Array3::<u8>::from_shape_vec(get_shape_from_header(&header), data.into_raw_vec())
            .map_err(|_| EdtError::Shape)?;
        log::debug!(
            "loaded nifti label volume {:?}, shape (z, y, x) = {:?}",
            path.as_ref(),
            data.dim()
        );
        Ok(Self::new(data, spacing))
    }
}

impl<V: Copy + Zero + PartialEq> VoxelSource for ArrayVolume<V> {
    type Value = V;

    #[inline]
    fn region(&self) -> Region3d {
        let (z, y, x) = self.data.dim();
        let o = self.origin;
        if x == 0 || y == 0 || z == 0 {
            return Region3d::empty();
        }
        Region3d::new(o, [o[0] + x as i64 - 1, o[1] + y as i64 - 1, o[2] + z as i64 - 1])
    }

    #[inline]
    fn spacing(&self) -> Spacing {
        self.spacing
    }

    #[inline]
    fn value(&self, pos: Idx3i) -> V {
        let Some(idx) = self.local(pos) else {
            panic!("体素坐标 {pos:?} 越界");
        };
        self.data[idx]
    }
}
