mod brute;
mod phantom;
mod profile;

use ct_edt::edt::{DistanceTransform, EdtConfig, InitStrategy};
use ct_edt::{DistanceMap, EdgeRepeat};
use std::path::Path;
use utils::loader;

pub use phantom::{phantoms, Phantom};
pub use profile::Profile;

/// 与暴力解比较时的容差.
const TOL: f64 = 1e-9;

/// 对 `phantom` 运行一次引擎, 计时并累计各阶段耗时.
fn timed_run(cfg: EdtConfig, phantom: &Phantom, profile: &mut Profile) -> DistanceMap<f64> {
    profile.count_target(true);
    let m = DistanceTransform::new(cfg)
        .run_with(&phantom.volume, &EdgeRepeat, profile)
        .unwrap();
    profile.target_elapsed();
    m
}

/// 将 `m` 与按 `positions()` 顺序排列的 `expect` 逐体素比较.
fn compare(m: &DistanceMap<f64>, phantom: &Phantom, expect: &[f64], profile: &mut Profile) {
    for (pos, e) in phantom.region().positions().zip(expect) {
        profile.count_checked(m.get(pos).unwrap(), *e, TOL);
    }
}

/// 边界置零策略, 无符号距离.
pub fn zero_set(phantoms: &[Phantom]) -> Profile {
    let mut profile = Profile::new();
    let cfg = EdtConfig::default();
    for p in phantoms {
        if !p.has_transition() {
            profile.count_trivial();
            continue;
        }
        println!("ZeroSet: phantom {}...", p.name);
        let m = timed_run(cfg, p, &mut profile);
        compare(&m, p, &brute::unsigned(&p.volume), &mut profile);
    }
    profile.finish()
}

/// 边界置零策略, 有符号距离.
pub fn signed(phantoms: &[Phantom]) -> Profile {
    let mut profile = Profile::new();
    let cfg = EdtConfig::default().signed(true);
    for p in phantoms {
        if !p.has_transition() {
            profile.count_trivial();
            continue;
        }
        println!("Signed: phantom {}...", p.name);
        let m = timed_run(cfg, p, &mut profile);
        compare(&m, p, &brute::signed(&p.volume), &mut profile);
    }
    profile.finish()
}

/// 亚体素策略, 无符号距离. 与体素中心距离的偏差即为该策略的修正量.
pub fn sub_voxel(phantoms: &[Phantom]) -> Profile {
    let mut profile = Profile::new();
    let cfg = EdtConfig::default().strategy(InitStrategy::SubVoxel);
    for p in phantoms {
        if !p.has_transition() {
            profile.count_trivial();
            continue;
        }
        println!("SubVoxel: phantom {}...", p.name);
        let m = timed_run(cfg, p, &mut profile);
        compare(&m, p, &brute::unsigned(&p.volume), &mut profile);
    }
    profile.finish()
}

/// 在 LiTS 训练集标签上计时. 标签体积太大, 不与暴力解比较.
pub fn lits(dir: &Path, limit: u32) -> Profile {
    let mut profile = Profile::new();
    let cfg = EdtConfig::default();
    for (nii_idx, label) in loader::label_loader(dir, limit) {
        let label = match label {
            Ok(label) => label,
            Err(e) => {
                log::warn!("skipping segmentation-{nii_idx}.nii: {e}");
                continue;
            }
        };
        println!("LiTS: file {nii_idx}...");
        let p = Phantom {
            name: "lits",
            volume: label,
        };
        if !p.has_transition() {
            profile.count_trivial();
            continue;
        }
        let m = timed_run(cfg, &p, &mut profile);
        log::info!("segmentation-{nii_idx}.nii: (min, max) = {:?}", m.min_max());
    }
    profile.finish()
}
