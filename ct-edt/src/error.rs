//! 运行时错误.

/// 距离变换的运行时错误.
///
/// 空的 (或与数据不相交的) 处理区域不是错误, 而是得到空结果.
#[derive(Debug, thiserror::Error)]
pub enum EdtError {
    /// 分辨率分量非正或非有限. `axis` 为出错维度 (0, 1, 2 分别为 x, y, z).
    #[error("invalid spacing on axis {axis}: {value}")]
    InvalidSpacing {
        /// 出错维度.
        axis: usize,
        /// 非法分辨率值.
        value: f64,
    },

    /// 无法为 `voxels` 个体素分配距离场或输出缓冲区.
    #[error("cannot allocate a buffer of {voxels} voxels")]
    Allocation {
        /// 请求的体素个数.
        voxels: usize,
    },

    /// 原始数据与声明形状不一致.
    #[error("raw data does not match the declared shape")]
    Shape,

    /// 读取 nifti 文件错误.
    #[error(transparent)]
    Nifti(#[from] nifti::NiftiError),

    /// 写出 npy 文件错误.
    #[error(transparent)]
    WriteNpy(#[from] ndarray_npy::WriteNpyError),
}

/// 距离变换运行时结果.
pub type EdtResult<T> = Result<T, EdtError>;
