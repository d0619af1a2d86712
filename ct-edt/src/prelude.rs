//! 🍇欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::{EdtError, EdtResult, Idx3i};

pub use crate::data::{
    ArrayVolume, BoundaryAccessor, ConstantBoundary, EdgeRepeat, Region3d, Spacing, VoxelSource,
};

pub use crate::edt::{
    compute, Connectivity, DistanceMap, DistanceTransform, EdtConfig, EdtObserver, InitStrategy,
    LogObserver, NoopObserver, Phase, PhaseTimings, Polarity,
};

#[cfg(feature = "rayon")]
pub use crate::edt::par_compute_batch;
