//! 将距离变换引擎与暴力解交叉验证, 并统计各初始化策略的耗时.
//!
//! LiTS 标签目录由 `$LITS_TRAIN_LABEL_DIR` 指定, 默认为 `$HOME/dataset/train/label`.
//! 目录不存在时只运行合成数据.

mod algos;
mod result;
mod runner;

use std::process::ExitCode;

fn main() -> ExitCode {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .expect("logger already initialized");

    let result = runner::run();
    if let Err(e) = result.analyze() {
        log::error!("cannot print results: {e}");
    }
    if result.exact() {
        ExitCode::SUCCESS
    } else {
        log::error!("exact strategies disagree with brute force");
        ExitCode::FAILURE
    }
}
