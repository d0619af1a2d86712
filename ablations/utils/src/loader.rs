//! LiTS 训练集标签加载器.

use ct_edt::{ArrayVolume, EdtResult};
use std::env;
use std::path::{Path, PathBuf};

/// LiTS 训练集标签文件个数.
pub const LITS_TRAINING_SET_LEN: u32 = 131;

/// 获取 LiTS 训练集标签基本路径.
///
/// 1. 若环境变量 `$LITS_TRAIN_LABEL_DIR` 非空, 则返回其值;
/// 2. 否则, 返回 `$HOME/dataset/train/label`;
/// 3. 无法确定用户目录时返回 `None`.
pub fn label_dir_from_env_or_home() -> Option<PathBuf> {
    if let Ok(d) = env::var("LITS_TRAIN_LABEL_DIR") {
        return Some(PathBuf::from(d));
    }
    let mut ans = dirs::home_dir()?;
    ans.extend(["dataset", "train", "label"]);
    Some(ans)
}

/// 获取 LiTS 训练集标签数据加载器, 最多加载前 `limit` 个文件.
///
/// # 注意
///
/// `path` 必须是目录, 否则程序 panic.
pub fn label_loader<P: AsRef<Path>>(path: P, limit: u32) -> LabelLoader {
    let path = path.as_ref().to_owned();
    assert!(path.is_dir());

    LabelLoader {
        path,
        data_rev: (0..limit.min(LITS_TRAINING_SET_LEN)).rev().collect(),
    }
}

/// 3D 标签体数据加载器. 按索引顺序逐个打开 `segmentation-{idx}.nii`.
#[derive(Debug)]
pub struct LabelLoader {
    path: PathBuf,
    data_rev: Vec<u32>,
}

impl Iterator for LabelLoader {
    type Item = (u32, EdtResult<ArrayVolume<u8>>);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.data_rev.pop()?;

        self.path.push(format!("segmentation-{idx}.nii"));
        let data = ArrayVolume::open_nifti(self.path.as_path());
        self.path.pop();

        Some((idx, data))
    }
}

impl ExactSizeIterator for LabelLoader {
    #[inline]
    fn len(&self) -> usize {
        self.data_rev.len()
    }
}
