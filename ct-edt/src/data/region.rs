//! 三维整数闭区间 (包围盒).

use crate::Idx3i;

/// 三维轴对齐整数包围盒 `[min, max]`, 两端均为闭区间. 坐标按 `(x, y, z)` 排列.
///
/// 任一维度上 `max < min` 时视为空区域. 所有空区域在语义上等价,
/// 但不保证 `==` 比较相等; 判空请使用 [`Region3d::is_empty`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region3d {
    min: Idx3i,
    max: Idx3i,
}

impl Region3d {
    /// 以最小角 `min` 和最大角 `max` (包含) 创建区域.
    #[inline]
    pub const fn new(min: Idx3i, max: Idx3i) -> Self {
        Self { min, max }
    }

    /// 创建以原点为最小角, 形状为 `[nx, ny, nz]` 的区域.
    ///
    /// 任一分量为 0 时得到空区域.
    #[inline]
    pub fn from_shape([nx, ny, nz]: [usize; 3]) -> Self {
        Self {
            min: [0, 0, 0],
            max: [nx as i64 - 1, ny as i64 - 1, nz as i64 - 1],
        }
    }

    /// 创建不包含任何体素的区域.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            min: [0, 0, 0],
            max: [-1, -1, -1],
        }
    }

    /// 最小角 (包含).
    #[inline]
    pub fn min(&self) -> Idx3i {
        self.min
    }

    /// 最大角 (包含).
    #[inline]
    pub fn max(&self) -> Idx3i {
        self.max
    }

    /// 是否不含任何体素.
    #[inline]
    pub fn is_empty(&self) -> bool {
        (0..3).any(|d| self.max[d] < self.min[d])
    }

    /// 每个维度上的体素个数, 按 `(x, y, z)` 排列. 空区域返回 `[0, 0, 0]`.
    #[inline]
    pub fn shape(&self) -> [usize; 3] {
        if self.is_empty() {
            return [0; 3];
        }
        [0, 1, 2].map(|d| (self.max[d] - self.min[d] + 1) as usize)
    }

    /// 体素总数.
    #[inline]
    pub fn len(&self) -> usize {
        self.shape().iter().product()
    }

    /// `pos` 是否位于区域内.
    #[inline]
    pub fn contains(&self, pos: Idx3i) -> bool {
        (0..3).all(|d| self.min[d] <= pos[d] && pos[d] <= self.max[d])
    }

    /// 两区域的交集. 不相交时返回空区域.
    pub fn intersection(&self, other: &Self) -> Self {
        let min = [0, 1, 2].map(|d| self.min[d].max(other.min[d]));
        let max = [0, 1, 2].map(|d| self.max[d].min(other.max[d]));
        let ans = Self { min, max };
        if ans.is_empty() {
            Self::empty()
        } else {
            ans
        }
    }

    /// 每个维度分别向外扩张 `n[d]` 个体素. 空区域保持为空.
    #[inline]
    pub fn grow_by(&self, n: [i64; 3]) -> Self {
        if self.is_empty() {
            return *self;
        }
        self.shrink_by(n.map(|v| -v))
    }

    /// 在每个方向上向内收缩 `n` 个体素. 收缩后为空时返回空区域.
    ///
    /// `shrink(1)` 即 "安全内部": 其中任一体素的 26-邻域都不会越出 `self`.
    #[inline]
    pub fn shrink(&self, n: i64) -> Self {
        self.shrink_by([n; 3])
    }

    /// 与 [`Self::shrink`] 类似, 但每个维度分别收缩 `n[d]` 个体素.
    pub fn shrink_by(&self, n: [i64; 3]) -> Self {
        let ans = Self {
            min: [0, 1, 2].map(|d| self.min[d] + n[d]),
            max: [0, 1, 2].map(|d| self.max[d] - n[d]),
        };
        if ans.is_empty() {
            Self::empty()
        } else {
            ans
        }
    }

    /// 将 `self \ inner` 分解为至多 6 个互不相交的子区域 (依次为 z 低/高层,
    /// y 低/高层, x 低/高层). 空子区域不会出现在结果中.
    ///
    /// # 注意
    ///
    /// `inner` 必须为空或完全包含于 `self`, 否则程序行为未定义 (debug 模式下 panic).
    pub fn shell(&self, inner: &Self) -> Vec<Self> {
        if self.is_empty() {
            return vec![];
        }
        if inner.is_empty() {
            return vec![*self];
        }
        debug_assert!(self.contains(inner.min) && self.contains(inner.max));

        let mut ans = Vec::with_capacity(6);
        let mut core = *self;
        for d in (0..3).rev() {
            // 低层
            let mut low = core;
            low.max[d] = inner.min[d] - 1;
            // 高层
            let mut high = core;
            high.min[d] = inner.max[d] + 1;
            ans.extend([low, high].into_iter().filter(|r| !r.is_empty()));

            core.min[d] = inner.min[d];
            core.max[d] = inner.max[d];
        }
        debug_assert_eq!(core, *inner);
        ans
    }

    /// 按 x 最快, z 最慢的顺序迭代区域内所有坐标.
    #[inline]
    pub fn positions(&self) -> Positions {
        Positions::new(*self)
    }
}

/// [`Region3d`] 的行优先 (x 最快) 坐标迭代器.
#[derive(Debug, Clone)]
pub struct Positions {
    region: Region3d,
    cur: Idx3i,
    remaining: usize,
}

impl Positions {
    #[inline]
    fn new(region: Region3d) -> Self {
        Self {
            region,
            cur: region.min,
            remaining: region.len(),
        }
    }
}

impl Iterator for Positions {
    type Item = Idx3i;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let ret = self.cur;
        self.remaining -= 1;
        for d in 0..3 {
            if self.cur[d] < self.region.max[d] {
                self.cur[d] += 1;
                break;
            }
            self.cur[d] = self.region.min[d];
        }
        Some(ret)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Positions {}
