//! 合成测试体数据.

use ct_edt::{ArrayVolume, Region3d, Spacing, VoxelSource};
use ndarray::Array3;

/// 一个具名合成体数据.
pub struct Phantom {
    pub name: &'static str,
    pub volume: ArrayVolume<u8>,
}

impl Phantom {
    fn new<F>(name: &'static str, [nx, ny, nz]: [usize; 3], spacing: [f64; 3], f: F) -> Self
    where
        F: Fn(f64, f64, f64) -> bool,
    {
        let data = Array3::from_shape_fn((nz, ny, nx), |(z, y, x)| {
            u8::from(f(x as f64, y as f64, z as f64))
        });
        let spacing = Spacing::new(spacing).expect("phantom spacing must be positive");
        Self {
            name,
            volume: ArrayVolume::new(data, spacing),
        }
    }

    /// 是否同时存在前景与背景?
    pub fn has_transition(&self) -> bool {
        let r = self.volume.region();
        let mut it = r.positions().map(|p| self.volume.value(p) != 0);
        match it.next() {
            Some(first) => it.any(|v| v != first),
            None => false,
        }
    }

    /// 数据区域.
    #[inline]
    pub fn region(&self) -> Region3d {
        self.volume.region()
    }
}

/// 一组覆盖常见形状的合成体数据. CT 常见的 z 方向大层厚也在其中.
pub fn phantoms() -> Vec<Phantom> {
    let ct = [0.7, 0.7, 2.5];
    vec![
        Phantom::new("ball", [20, 20, 12], [1.0; 3], |x, y, z| {
            (x - 9.5).powi(2) + (y - 9.5).powi(2) + (z - 5.5).powi(2) < 30.0
        }),
        Phantom::new("ellipsoid-ct", [24, 20, 10], ct, |x, y, z| {
            ((x - 12.0) * 0.7).powi(2) + ((y - 9.0) * 0.7).powi(2) + ((z - 4.0) * 2.5).powi(2)
                < 42.0
        }),
        Phantom::new("shell", [18, 18, 14], [1.0, 1.0, 1.5], |x, y, z| {
            let r = (x - 8.5).powi(2) + (y - 8.5).powi(2) + (z - 6.5).powi(2);
            (16.0..49.0).contains(&r)
        }),
        Phantom::new("two-boxes", [22, 16, 9], ct, |x, y, z| {
            let a = (2.0..8.0).contains(&x) && (3.0..12.0).contains(&y) && (1.0..7.0).contains(&z);
            let b = (13.0..20.0).contains(&x) && (5.0..9.0).contains(&y) && (2.0..5.0).contains(&z);
            a || b
        }),
        Phantom::new("noise", [16, 15, 11], [0.8, 1.2, 2.0], |x, y, z| {
            let h = (x as u64 * 73 + y as u64 * 151 + z as u64 * 241 + (x * y) as u64 * 7) % 17;
            h < 9
        }),
        Phantom::new("slice", [30, 26, 1], ct, |x, y, _| {
            (x - 14.0).abs() + (y - 12.0).abs() < 9.0
        }),
        Phantom::new("empty", [12, 12, 6], [1.0; 3], |_, _, _| false),
    ]
}
