//! 程序运行函数.

use crate::result::AblationResult;
use std::thread;
use utils::loader;

/// 至多加载的 LiTS 标签个数.
const LITS_LIMIT: u32 = 8;

/// 实际运行.
pub fn run() -> AblationResult {
    let phantoms = super::algos::phantoms();
    println!(
        "Running ablation studies on {} phantoms ({} cores)...",
        phantoms.len(),
        utils::cpus()
    );

    let label_dir = loader::label_dir_from_env_or_home().filter(|d| d.is_dir());
    if label_dir.is_none() {
        log::info!("LiTS label directory not found, timing on real labels skipped");
    }

    thread::scope(|s| {
        use super::algos::{lits, signed, sub_voxel, zero_set};

        let ph = phantoms.as_slice();
        let handles = [zero_set, signed, sub_voxel].map(|t| s.spawn(move || t(ph)));
        let on_lits = label_dir
            .as_deref()
            .map(|d| s.spawn(move || lits(d, LITS_LIMIT)));

        let mut ans: Vec<_> = ["zero-set", "signed", "sub-voxel"]
            .into_iter()
            .zip(
                handles
                    .into_iter()
                    .map(|th| th.join().expect("Thread joining error")),
            )
            .collect();
        if let Some(th) = on_lits {
            ans.push(("lits", th.join().expect("Thread joining error")));
        }
        AblationResult::from_iter(ans)
    })
}
