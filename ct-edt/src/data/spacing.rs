use crate::{EdtError, EdtResult};

/// 体素在 `(x, y, z)` 三个方向上的物理分辨率 (一般以毫米为单位).
///
/// 三个分量均保证为有限正数. 沿某轴的物理距离 = 整数偏移 × 该轴分量.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spacing([f64; 3]);

impl Spacing {
    /// 构建分辨率.
    ///
    /// 任一分量非正或非有限 (NaN, inf) 时返回 `Err(EdtError::InvalidSpacing)`.
    pub fn new(spacing: [f64; 3]) -> EdtResult<Self> {
        for (axis, &value) in spacing.iter().enumerate() {
            if !(value.is_finite() && value > 0.0) {
                return Err(EdtError::InvalidSpacing { axis, value });
            }
        }
        Ok(Self(spacing))
    }

    /// 各向同性的单位分辨率 `(1, 1, 1)`.
    #[inline]
    pub const fn unit() -> Self {
        Self([1.0; 3])
    }

    /// 获取第 `axis` 维分辨率. `axis` 越界时 panic.
    #[inline]
    pub fn get(&self, axis: usize) -> f64 {
        self.0[axis]
    }

    /// 获取三个分量.
    #[inline]
    pub fn as_array(&self) -> [f64; 3] {
        self.0
    }

    /// 三个方向分辨率是否相同?
    #[inline]
    pub fn is_isotropic(&self) -> bool {
        let [x, y, z] = self.0;
        x == y && x == z
    }
}

impl Default for Spacing {
    #[inline]
    fn default() -> Self {
        Self::unit()
    }
}
