//! 暴力解. 复杂度为 `O(体素个数 * 种子个数)`, 只适用于小体数据.

use ct_edt::{ArrayVolume, Idx3i, VoxelSource};

/// 6-邻域偏移.
const FACES: [Idx3i; 6] = [
    [-1, 0, 0],
    [1, 0, 0],
    [0, -1, 0],
    [0, 1, 0],
    [0, 0, -1],
    [0, 0, 1],
];

#[inline]
fn is_fg(v: &ArrayVolume<u8>, pos: Idx3i) -> bool {
    v.value(pos) != 0
}

/// `pos` 是否在数据内有一个与其异类的 6-邻居?
fn crosses(v: &ArrayVolume<u8>, pos: Idx3i) -> bool {
    let fg = is_fg(v, pos);
    FACES.iter().any(|d| {
        let q = [pos[0] + d[0], pos[1] + d[1], pos[2] + d[2]];
        v.contains(q) && is_fg(v, q) != fg
    })
}

/// 对数据区域内的每个体素 (`positions()` 顺序), 求到 `seeds` 的最小物理距离.
/// `seeds` 为空时返回全 `None`.
fn nearest(v: &ArrayVolume<u8>, seeds: &[Idx3i]) -> Vec<Option<f64>> {
    let s = v.spacing().as_array();
    v.region()
        .positions()
        .map(|p| {
            seeds
                .iter()
                .map(|q| {
                    (0..3)
                        .map(|d| ((p[d] - q[d]) as f64 * s[d]).powi(2))
                        .sum::<f64>()
                })
                .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |a| a.min(d))))
                .map(f64::sqrt)
        })
        .collect()
}

/// 无符号距离: 前景为到最近背景体素的距离, 背景为 0.
pub fn unsigned(v: &ArrayVolume<u8>) -> Vec<f64> {
    let bg: Vec<_> = v.region().positions().filter(|p| !is_fg(v, *p)).collect();
    let d = nearest(v, &bg);
    v.region()
        .positions()
        .zip(d)
        .map(|(p, d)| if is_fg(v, p) { d.unwrap_or(0.0) } else { 0.0 })
        .collect()
}

/// 有符号距离: 到最近前景边界体素的距离, 背景取负.
pub fn signed(v: &ArrayVolume<u8>) -> Vec<f64> {
    let border: Vec<_> = v
        .region()
        .positions()
        .filter(|p| is_fg(v, *p) && crosses(v, *p))
        .collect();
    let d = nearest(v, &border);
    v.region()
        .positions()
        .zip(d)
        .map(|(p, d)| {
            let m = d.unwrap_or(0.0);
            if is_fg(v, p) {
                m
            } else {
                -m
            }
        })
        .collect()
}
