//! 精确欧氏距离变换 (EDT).
//!
//! 算法按维度可分离: 先在前景/背景交界处播种, 再沿 x, y, z 三个轴依次对每条扫描线
//! 构造抛物线下包络, 将该轴并入累积距离平方, 最后一次遍历转换为所需的输出形式.
//! 时间复杂度与体素个数成线性关系.
//!
//! # 约定
//!
//! 1. 在默认极性 [`Polarity::NonZero`] 下, 非零体素为前景.
//! 2. 无符号模式: 前景体素得到其到最近背景体素的距离, 背景体素为 0.
//! 3. 有符号模式: 前景边界体素为 0, 其余前景体素为正, 背景体素为负,
//!   绝对值均为到前景边界的距离.
//! 4. 处理区域内如果根本不存在交界体素, 则全部结果为 0.

use std::time::Instant;

use num::{Float, Zero};

use crate::data::{BoundaryAccessor, EdgeRepeat, Region3d, Spacing, VoxelSource};
use crate::EdtResult;

mod field;
mod finalize;
mod init;
mod observer;
mod sample;
mod sweep;

pub use field::DistanceField;
pub use finalize::DistanceMap;
pub use observer::{EdtObserver, LogObserver, NoopObserver, Phase, PhaseTimings};
pub use sample::{DistanceSample, NeighborOffset, OffsetTable};
pub use sweep::SweepStats;

use finalize::ResultFinalizer;
use init::BoundaryInitializer;

/// 前景判定极性.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Polarity {
    /// 非零体素为前景.
    #[default]
    NonZero,

    /// 零值体素为前景.
    Zero,
}

impl Polarity {
    /// `v` 是否为前景?
    #[inline]
    pub fn is_foreground<V: Zero + PartialEq>(&self, v: V) -> bool {
        match self {
            Polarity::NonZero => !v.is_zero(),
            Polarity::Zero => v.is_zero(),
        }
    }
}

/// 边界初始化策略.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InitStrategy {
    /// 交界体素直接置为 0. 无符号模式下在背景一侧播种, 有符号模式下在前景一侧播种.
    #[default]
    ZeroSet,

    /// 两侧的交界体素均记录到最近异类邻居的位移,
    /// 以到两体素中点的距离作为亚体素精度的初值.
    SubVoxel,
}

/// 判定交界体素所用的邻域.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Connectivity {
    /// 6-邻域 (共面).
    #[default]
    Face,

    /// 26-邻域.
    Full,
}

/// 距离变换参数.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdtConfig {
    /// 是否输出有符号距离.
    pub signed: bool,

    /// 是否输出距离平方.
    pub squared: bool,

    /// 是否考虑体素分辨率. 否则视为 `(1, 1, 1)`.
    pub use_spacing: bool,

    /// 前景判定极性.
    pub polarity: Polarity,

    /// 边界初始化策略.
    pub strategy: InitStrategy,

    /// 判定交界体素所用的邻域.
    pub connectivity: Connectivity,

    /// 处理区域. `None` 代表数据的完整区域. 超出数据范围的部分会被裁掉.
    pub process_region: Option<Region3d>,
}

impl Default for EdtConfig {
    fn default() -> Self {
        Self {
            signed: false,
            squared: false,
            use_spacing: true,
            polarity: Polarity::NonZero,
            strategy: InitStrategy::ZeroSet,
            connectivity: Connectivity::Face,
            process_region: None,
        }
    }
}

impl EdtConfig {
    /// 设置是否输出有符号距离.
    #[inline]
    pub fn signed(mut self, signed: bool) -> Self {
        self.signed = signed;
        self
    }

    /// 设置是否输出距离平方.
    #[inline]
    pub fn squared(mut self, squared: bool) -> Self {
        self.squared = squared;
        self
    }

    /// 设置是否考虑体素分辨率.
    #[inline]
    pub fn use_spacing(mut self, use_spacing: bool) -> Self {
        self.use_spacing = use_spacing;
        self
    }

    /// 设置前景判定极性.
    #[inline]
    pub fn polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    /// 设置边界初始化策略.
    #[inline]
    pub fn strategy(mut self, strategy: InitStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// 设置交界邻域.
    #[inline]
    pub fn connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// 设置处理区域.
    #[inline]
    pub fn process_region(mut self, region: Region3d) -> Self {
        self.process_region = Some(region);
        self
    }
}

/// 精确欧氏距离变换引擎.
///
/// 每次调用独占其全部工作状态, 不同调用之间互不影响.
#[derive(Clone, Debug, Default)]
pub struct DistanceTransform {
    config: EdtConfig,
}

impl DistanceTransform {
    /// 以 `config` 创建引擎.
    #[inline]
    pub fn new(config: EdtConfig) -> Self {
        Self { config }
    }

    /// 获取参数.
    #[inline]
    pub fn config(&self) -> &EdtConfig {
        &self.config
    }

    /// 对 `source` 运行距离变换. 区域外按边缘重复处理, 不做观测.
    #[inline]
    pub fn run<T: Float, S: VoxelSource>(&self, source: &S) -> EdtResult<DistanceMap<T>> {
        self.run_with(source, &EdgeRepeat, &mut NoopObserver)
    }

    /// 对 `source` 运行距离变换.
    ///
    /// 区域边界外一个体素内的取值由 `accessor` 提供; 各阶段耗时报告给 `observer`.
    ///
    /// # 返回值
    ///
    /// - 分辨率非法时返回 `Err(EdtError::InvalidSpacing)`;
    /// - 无法分配缓冲区时返回 `Err(EdtError::Allocation)`;
    /// - 处理区域为空 (或与数据不相交) 时返回空结果;
    /// - 其他情况下返回与处理区域形状相同的完整结果. 不存在部分结果.
    pub fn run_with<T, S, A, O>(
        &self,
        source: &S,
        accessor: &A,
        observer: &mut O,
    ) -> EdtResult<DistanceMap<T>>
    where
        T: Float,
        S: VoxelSource,
        A: BoundaryAccessor<S>,
        O: EdtObserver + ?Sized,
    {
        let cfg = &self.config;
        // 反序列化得到的分辨率未经校验.
        let spacing = Spacing::new(source.spacing().as_array())?;

        let full = source.region();
        let region = cfg
            .process_region
            .map_or(full, |r| r.intersection(&full));
        if region.is_empty() {
            log::debug!("edt skipped: empty process region (source {full:?})");
            return Ok(DistanceMap::empty(spacing));
        }
        log::debug!(
            "edt on {:?} ({} voxels): signed = {}, squared = {}, spacing = {:?} (isotropic: {}), {:?}",
            region,
            region.len(),
            cfg.signed,
            cfg.squared,
            cfg.use_spacing.then_some(spacing),
            spacing.is_isotropic(),
            cfg.strategy,
        );

        let active = region.shape().map(|n| n > 1);
        let steps = if cfg.use_spacing {
            spacing.as_array()
        } else {
            [1.0; 3]
        };
        let table = OffsetTable::new(active, steps.map(|s| s * s));
        // 光环: 沿参与计算的轴各外扩一层.
        let mut field = DistanceField::new(region.grow_by(active.map(i64::from)))?;

        let t = Instant::now();
        let seeded = BoundaryInitializer::new(
            source,
            accessor,
            &table,
            cfg.polarity,
            cfg.strategy,
            cfg.connectivity,
            cfg.signed,
        )
        .run(&mut field, &region, active);
        observer.seeded(seeded);
        observer.phase_finished(Phase::Initialize, t.elapsed());
        if seeded == 0 {
            log::debug!("edt found no transition voxel in {region:?}");
        }

        for (axis, &step) in steps.iter().enumerate() {
            let t = Instant::now();
            let stats = sweep::sweep_axis(&mut field, axis, step, &table);
            log::trace!("edt axis {axis}: {stats:?}");
            observer.phase_finished(Phase::Sweep(axis), t.elapsed());
        }

        let t = Instant::now();
        let ans = ResultFinalizer {
            source,
            table: &table,
            polarity: cfg.polarity,
            signed: cfg.signed,
            squared: cfg.squared,
        }
        .run(&field, region, spacing)?;
        observer.phase_finished(Phase::Finalize, t.elapsed());
        Ok(ans)
    }
}

/// 单入口距离变换. 区域外按边缘重复处理, 采用默认的初始化策略与极性.
///
/// `process_region` 为 `None` 时处理 `mask` 的完整区域.
pub fn compute<S: VoxelSource>(
    mask: &S,
    is_signed: bool,
    use_square_distance: bool,
    use_spacing: bool,
    process_region: Option<Region3d>,
) -> EdtResult<DistanceMap<f64>> {
    let config = EdtConfig {
        signed: is_signed,
        squared: use_square_distance,
        use_spacing,
        process_region,
        ..Default::default()
    };
    DistanceTransform::new(config).run(mask)
}

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
    }
}

/// 借助 `rayon`, 并行地对多个互相独立的体数据分别运行距离变换.
///
/// 每个体数据的变换本身仍是串行的. 返回值顺序与 `sources` 一致.
#[cfg(feature = "rayon")]
pub fn par_compute_batch<T, S>(sources: &[S], config: &EdtConfig) -> Vec<EdtResult<DistanceMap<T>>>
where
    T: Float + Send,
    S: VoxelSource + Sync,
{
    let engine = DistanceTransform::new(*config);
    sources
        .par_iter()
        .map(|s| engine.run(s))
        .collect()
}
