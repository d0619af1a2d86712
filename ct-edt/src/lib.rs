#![warn(missing_docs)] // <= 合适时移除它.
// #![warn(clippy::missing_docs_in_private_items)]  // <= too strict.

//! 核心库. 对 3D 体数据 (例如 LiTS 肝脏标签) 进行精确欧氏距离变换 (EDT).
//!
//! 该 crate 目前仅提供 `safe` 接口.
//!
//! # 注意
//!
//! 1. 坐标一律按 `(x, y, z)` 顺序给出; 底层 `ndarray` 数据按 `[z, y, x]` 标准布局存储.
//! 2. 结果为精确欧氏距离, 不是近似 (例如 chamfer) 距离.
//! 3. 在非期望情况下 (例如越界访问), 程序会直接 panic, 而不会导致内存错误.
//!
//! # 开发计划
//!
//! ### 体数据接口, 边界取值策略 ✅
//!
//! 实现位于 `ct-edt/src/data`.
//!
//! ### 可分离精确 EDT ✅
//!
//! 边界初始化 (两种策略), 逐轴抛物线下包络扫描, 结果转换.
//!
//! 实现位于 `ct-edt/src/edt`.
//!
//! ### 各阶段计时钩子 ✅
//!
//! 由调用方显式传入, 不使用全局计时器.
//!
//! ### 与暴力解交叉验证的消融实验 ✅
//!
//! 实现位于 `ablations/edt-check`.
//!
//! ### 单体数据内部并行 ⌛️
//!
//! 目前只支持多个体数据之间并行 (`rayon` feature).

/// 三维整数坐标 `(x, y, z)`. 允许为负.
pub type Idx3i = [i64; 3];

mod error;

pub use error::{EdtError, EdtResult};

/// 体数据接口及其基础实现.
pub mod data;

pub use data::{ArrayVolume, BoundaryAccessor, ConstantBoundary, EdgeRepeat, Region3d, Spacing, VoxelSource};

pub mod edt;

pub use edt::{compute, DistanceMap, DistanceTransform, EdtConfig};

#[cfg(feature = "rayon")]
pub use edt::par_compute_batch;

pub mod prelude;
