//! 边界初始化: 在前景/背景交界处为距离场播种.

use super::field::DistanceField;
use super::sample::{DistanceSample, OffsetTable};
use super::{Connectivity, InitStrategy, Polarity};
use crate::data::{BoundaryAccessor, Region3d, VoxelSource};
use crate::Idx3i;

/// 邻居取值方式. 安全内部与边界光环各有一种实现, 每次初始化时各分派一次,
/// 而不是逐体素判断.
trait NeighborLookup<S: VoxelSource> {
    fn get(&self, pos: Idx3i) -> S::Value;
}

/// 安全内部: 邻居必然位于数据范围内, 直接读取.
struct Direct<'a, S>(&'a S);

impl<S: VoxelSource> NeighborLookup<S> for Direct<'_, S> {
    #[inline]
    fn get(&self, pos: Idx3i) -> S::Value {
        self.0.value(pos)
    }
}

/// 边界光环: 邻居可能越界, 经由 [`BoundaryAccessor`] 读取.
struct Guarded<'a, S, A>(&'a S, &'a A);

impl<S: VoxelSource, A: BoundaryAccessor<S>> NeighborLookup<S> for Guarded<'_, S, A> {
    #[inline]
    fn get(&self, pos: Idx3i) -> S::Value {
        self.1.value(self.0, pos)
    }
}

#[inline]
fn shifted(pos: Idx3i, delta: Idx3i) -> Idx3i {
    [pos[0] + delta[0], pos[1] + delta[1], pos[2] + delta[2]]
}

/// 边界初始化器.
pub(crate) struct BoundaryInitializer<'a, S, A> {
    source: &'a S,
    accessor: &'a A,
    table: &'a OffsetTable,
    polarity: Polarity,
    strategy: InitStrategy,

    /// `ZeroSet` 策略下, 在哪一侧的交界体素上播种 (`true` 为前景一侧).
    seed_foreground: bool,

    /// 判定 "交界体素" 所用的邻域偏移.
    transition: Vec<Idx3i>,
}

impl<'a, S, A> BoundaryInitializer<'a, S, A>
where
    S: VoxelSource,
    A: BoundaryAccessor<S>,
{
    pub fn new(
        source: &'a S,
        accessor: &'a A,
        table: &'a OffsetTable,
        polarity: Polarity,
        strategy: InitStrategy,
        connectivity: Connectivity,
        seed_foreground: bool,
    ) -> Self {
        let transition = table
            .neighbors()
            .iter()
            .map(|n| n.delta)
            .filter(|d| match connectivity {
                Connectivity::Face => d.iter().filter(|v| **v != 0).count() == 1,
                Connectivity::Full => true,
            })
            .collect();
        Self {
            source,
            accessor,
            table,
            polarity,
            strategy,
            seed_foreground,
            transition,
        }
    }

    /// 为 `field` 中的处理区域 `region` 播种. `active[d]` 指示第 `d` 轴是否参与邻域.
    ///
    /// `field` 的区域须包含 `region`; 二者之差即光环. `ZeroSet` 策略下,
    /// 与 `region` 内异类体素相邻且位于播种一侧的光环体素同样被置为 0.
    ///
    /// 返回播种的体素个数 (含光环).
    pub fn run(&self, field: &mut DistanceField, region: &Region3d, active: [bool; 3]) -> usize {
        let interior = self
            .source
            .region()
            .shrink_by(active.map(i64::from))
            .intersection(region);

        let mut seeded = self.seed_box(field, &interior, &Direct(self.source));
        let guarded = Guarded(self.source, self.accessor);
        for band in region.shell(&interior) {
            seeded += self.seed_box(field, &band, &guarded);
        }

        if self.strategy == InitStrategy::ZeroSet {
            let padded = field.region();
            for band in padded.shell(region) {
                seeded += self.seed_halo(field, &band, region, &guarded);
            }
        }
        seeded
    }

    /// 光环带 `band` 中, 位于播种一侧且与 `region` 内异类体素相邻的体素置为 0.
    fn seed_halo<L: NeighborLookup<S>>(
        &self,
        field: &mut DistanceField,
        band: &Region3d,
        region: &Region3d,
        lookup: &L,
    ) -> usize {
        let mut seeded = 0usize;
        for pos in band.positions() {
            let fg = self.is_foreground(lookup.get(pos));
            if fg != self.seed_foreground {
                continue;
            }
            let touches = self
                .transition
                .iter()
                .map(|d| shifted(pos, *d))
                .filter(|q| region.contains(*q))
                .any(|q| self.is_foreground(self.source.value(q)) != fg);
            if touches {
                let idx = field.offset(pos);
                field[idx] = DistanceSample::Resolved(0.0);
                seeded += 1;
            }
        }
        seeded
    }

    #[inline]
    fn is_foreground(&self, v: S::Value) -> bool {
        self.polarity.is_foreground(v)
    }

    /// 对 `part` 内所有体素按当前策略播种.
    fn seed_box<L: NeighborLookup<S>>(
        &self,
        field: &mut DistanceField,
        part: &Region3d,
        lookup: &L,
    ) -> usize {
        let mut seeded = 0usize;
        for pos in part.positions() {
            let fg = self.is_foreground(self.source.value(pos));
            let sample = match self.strategy {
                InitStrategy::ZeroSet => (fg == self.seed_foreground
                    && self.crosses(pos, fg, lookup))
                .then_some(DistanceSample::Resolved(0.0)),
                InitStrategy::SubVoxel => self
                    .nearest_crossing(pos, fg, lookup)
                    .map(DistanceSample::Pending),
            };
            if let Some(s) = sample {
                let idx = field.offset(pos);
                field[idx] = s;
                seeded += 1;
            }
        }
        seeded
    }

    /// `pos` (类别为 `fg`) 是否为交界体素?
    #[inline]
    fn crosses<L: NeighborLookup<S>>(&self, pos: Idx3i, fg: bool, lookup: &L) -> bool {
        self.transition
            .iter()
            .any(|d| self.is_foreground(lookup.get(shifted(pos, *d))) != fg)
    }

    /// 若 `pos` 是交界体素, 在其完整 26-邻域中寻找位移最短的异类邻居,
    /// 返回其偏移表索引. 长度相同时取扫描顺序靠前者.
    fn nearest_crossing<L: NeighborLookup<S>>(
        &self,
        pos: Idx3i,
        fg: bool,
        lookup: &L,
    ) -> Option<u8> {
        if !self.crosses(pos, fg, lookup) {
            return None;
        }
        let mut best: Option<(u8, f64)> = None;
        for n in self.table.neighbors() {
            if self.is_foreground(lookup.get(shifted(pos, n.delta))) == fg {
                continue;
            }
            let len = self.table.full_squared(n.entry);
            if best.map_or(true, |(_, b)| len < b) {
                best = Some((n.entry, len));
            }
        }
        debug_assert!(best.is_some());
        best.map(|(k, _)| k)
    }
}

#[cfg(test)]
mod tests {
    use super::BoundaryInitializer;
    use crate::data::{ArrayVolume, ConstantBoundary, EdgeRepeat, Spacing, VoxelSource};
    use crate::edt::field::DistanceField;
    use crate::edt::sample::{DistanceSample, OffsetTable};
    use crate::edt::{Connectivity, InitStrategy, Polarity};
    use ndarray::Array3;

    /// 5x5x1, 中心 3x3 为前景.
    fn square() -> ArrayVolume<u8> {
        let data = Array3::from_shape_fn((1, 5, 5), |(_, y, x)| {
            u8::from((1..=3).contains(&x) && (1..=3).contains(&y))
        });
        ArrayVolume::new(data, Spacing::unit())
    }

    fn zero_set(v: &ArrayVolume<u8>, seed_fg: bool) -> DistanceField {
        let table = OffsetTable::new([true, true, false], [1.0; 3]);
        let init = BoundaryInitializer::new(
            v,
            &EdgeRepeat,
            &table,
            Polarity::NonZero,
            InitStrategy::ZeroSet,
            Connectivity::Face,
            seed_fg,
        );
        let mut field = DistanceField::new(v.region()).unwrap();
        init.run(&mut field, &v.region(), [true, true, false]);
        field
    }

    #[test]
    fn test_zero_set_foreground_side() {
        let v = square();
        let field = zero_set(&v, true);
        // 正方形的 8 个边界体素被播种, 中心不被播种.
        let seeds: Vec<_> = v
            .region()
            .positions()
            .filter(|p| field.get(*p) == Some(DistanceSample::Resolved(0.0)))
            .collect();
        assert_eq!(seeds.len(), 8);
        assert!(field.get([2, 2, 0]).unwrap().is_unset());
        assert!(field.get([0, 0, 0]).unwrap().is_unset());
    }

    #[test]
    fn test_zero_set_background_side() {
        let v = square();
        let field = zero_set(&v, false);
        // 与正方形面相邻的背景体素: 每条边 3 个, 共 12 个. 角上的 4 个不算.
        let n = field.iter().filter(|s| !s.is_unset()).count();
        assert_eq!(n, 12);
        assert!(field.get([0, 0, 0]).unwrap().is_unset());
        assert_eq!(field.get([0, 2, 0]), Some(DistanceSample::Resolved(0.0)));
    }

    #[test]
    fn test_constant_boundary_creates_transition() {
        // 全前景, 光环外为背景: 只有区域边缘被播种.
        let v = ArrayVolume::new(Array3::<u8>::ones((1, 4, 4)), Spacing::unit());
        let table = OffsetTable::new([true, true, false], [1.0; 3]);
        let acc = ConstantBoundary(0u8);
        let init = BoundaryInitializer::new(
            &v,
            &acc,
            &table,
            Polarity::NonZero,
            InitStrategy::ZeroSet,
            Connectivity::Face,
            true,
        );
        let mut field = DistanceField::new(v.region()).unwrap();
        assert_eq!(init.run(&mut field, &v.region(), [true, true, false]), 12);

        // 边缘重复时不存在交界.
        let init = BoundaryInitializer::new(
            &v,
            &EdgeRepeat,
            &table,
            Polarity::NonZero,
            InitStrategy::ZeroSet,
            Connectivity::Face,
            true,
        );
        let mut field = DistanceField::new(v.region()).unwrap();
        assert_eq!(init.run(&mut field, &v.region(), [true, true, false]), 0);
    }

    #[test]
    fn test_zero_set_seeds_halo() {
        // 全前景, 光环为背景, 无符号模式在背景一侧播种: 种子全部落在光环中.
        let v = ArrayVolume::new(Array3::<u8>::ones((1, 4, 4)), Spacing::unit());
        let table = OffsetTable::new([true, true, false], [1.0; 3]);
        let acc = ConstantBoundary(0u8);
        let init = BoundaryInitializer::new(
            &v,
            &acc,
            &table,
            Polarity::NonZero,
            InitStrategy::ZeroSet,
            Connectivity::Face,
            false,
        );
        let region = v.region();
        let mut field = DistanceField::new(region.grow_by([1, 1, 0])).unwrap();
        // 每条边 4 个, 光环四角与区域没有共面邻居.
        assert_eq!(init.run(&mut field, &region, [true, true, false]), 16);
        assert_eq!(field.get([-1, 0, 0]), Some(DistanceSample::Resolved(0.0)));
        assert_eq!(field.get([2, 4, 0]), Some(DistanceSample::Resolved(0.0)));
        assert!(field.get([-1, -1, 0]).unwrap().is_unset());
        assert!(region.positions().all(|p| field.get(p).unwrap().is_unset()));
    }

    #[test]
    fn test_sub_voxel_prefers_shortest() {
        // 各向异性: y 方向 0.5, x 方向 2.0.
        let v = ArrayVolume::new(square().into_data(), Spacing::new([2.0, 0.5, 1.0]).unwrap());
        let table = OffsetTable::new([true, true, false], [4.0, 0.25, 1.0]);
        let init = BoundaryInitializer::new(
            &v,
            &EdgeRepeat,
            &table,
            Polarity::NonZero,
            InitStrategy::SubVoxel,
            Connectivity::Face,
            true,
        );
        let mut field = DistanceField::new(v.region()).unwrap();
        let seeded = init.run(&mut field, &v.region(), [true, true, false]);
        // 两侧交界体素: 前景 8 个 + 背景 12 个.
        assert_eq!(seeded, 20);

        // 角点 (1, 1) 的异类邻居中, y 方向最短 (0.5).
        let Some(DistanceSample::Pending(k)) = field.get([1, 1, 0]) else {
            panic!("角点应当是待换算样本");
        };
        assert_eq!(table.displacement(k), [0, 1, 0]);
        assert!((table.squared_distance(k) - 0.0625).abs() < 1e-12);

        // 背景体素 (0, 2): 只有 x 方向的前景邻居在面邻域内, 但斜向 (1, 1), (1, 3)
        // 的位移长度平方为 4.25 > 4.0, 因此仍取 x 方向.
        let Some(DistanceSample::Pending(k)) = field.get([0, 2, 0]) else {
            panic!("交界背景体素应当是待换算样本");
        };
        assert_eq!(table.displacement(k), [1, 0, 0]);
    }

    #[test]
    fn test_polarity_zero_inverts() {
        let v = square();
        let table = OffsetTable::new([true, true, false], [1.0; 3]);
        let init = BoundaryInitializer::new(
            &v,
            &EdgeRepeat,
            &table,
            Polarity::Zero,
            InitStrategy::ZeroSet,
            Connectivity::Face,
            true,
        );
        let mut field = DistanceField::new(v.region()).unwrap();
        // 零值侧 (正方形之外) 与正方形面相邻的 12 个体素.
        assert_eq!(init.run(&mut field, &v.region(), [true, true, false]), 12);
    }
}
