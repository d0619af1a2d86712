//! 调用方显式传入的计时/观测钩子.

use std::time::Duration;

/// 距离变换的阶段.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// 边界初始化.
    Initialize,

    /// 第 `0`, `1`, `2` 轴扫描.
    Sweep(usize),

    /// 结果转换.
    Finalize,
}

impl Phase {
    /// 所有阶段, 按执行顺序.
    pub const ALL: [Phase; 5] = [
        Phase::Initialize,
        Phase::Sweep(0),
        Phase::Sweep(1),
        Phase::Sweep(2),
        Phase::Finalize,
    ];

    #[inline]
    fn slot(&self) -> usize {
        match self {
            Phase::Initialize => 0,
            Phase::Sweep(d) => 1 + (*d).min(2),
            Phase::Finalize => 4,
        }
    }
}

/// 观测钩子. 所有方法默认什么都不做.
pub trait EdtObserver {
    /// 边界初始化完成, 共播种 `count` 个体素.
    fn seeded(&mut self, _count: usize) {}

    /// 阶段 `phase` 完成, 耗时 `elapsed`.
    fn phase_finished(&mut self, _phase: Phase, _elapsed: Duration) {}
}

/// 不做任何观测.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopObserver;

impl EdtObserver for NoopObserver {}

/// 将各阶段耗时以 `debug` 级别写入日志.
#[derive(Copy, Clone, Debug, Default)]
pub struct LogObserver;

impl EdtObserver for LogObserver {
    fn seeded(&mut self, count: usize) {
        log::debug!("edt seeded {count} transition voxels");
    }

    fn phase_finished(&mut self, phase: Phase, elapsed: Duration) {
        log::debug!("edt phase {phase:?} took {} us", elapsed.as_micros());
    }
}

/// 累计各阶段耗时. 可跨多次变换复用.
///
/// 该计时器支持对多个体数据分别运行后再统一查询.
#[derive(Clone, Debug, Default)]
pub struct PhaseTimings {
    consumed: [Duration; 5],
    seeded: usize,
    runs: u64,
}

impl PhaseTimings {
    /// 初始化.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// 阶段 `phase` 的累计耗时.
    #[inline]
    pub fn get(&self, phase: Phase) -> Duration {
        self.consumed[phase.slot()]
    }

    /// 所有阶段的累计耗时之和.
    #[inline]
    pub fn total(&self) -> Duration {
        self.consumed.iter().sum()
    }

    /// 累计播种体素个数.
    #[inline]
    pub fn seeded_total(&self) -> usize {
        self.seeded
    }

    /// 已完成的变换次数 (以 `Finalize` 阶段计).
    #[inline]
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// 获得总共累计下来的时间综合 (以微秒为单位).
    #[inline]
    pub fn get_total_us(&self) -> u64 {
        self.total().as_micros() as u64
    }
}

impl EdtObserver for PhaseTimings {
    fn seeded(&mut self, count: usize) {
        self.seeded += count;
    }

    fn phase_finished(&mut self, phase: Phase, elapsed: Duration) {
        self.consumed[phase.slot()] += elapsed;
        if phase == Phase::Finalize {
            self.runs += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EdtObserver, Phase, PhaseTimings};
    use std::time::Duration;

    #[test]
    fn test_phase_timings_accumulate() {
        let mut t = PhaseTimings::new();
        t.seeded(3);
        t.phase_finished(Phase::Sweep(1), Duration::from_micros(5));
        t.phase_finished(Phase::Sweep(1), Duration::from_micros(7));
        t.phase_finished(Phase::Finalize, Duration::from_micros(1));
        assert_eq!(t.get(Phase::Sweep(1)), Duration::from_micros(12));
        assert_eq!(t.get(Phase::Sweep(0)), Duration::ZERO);
        assert_eq!(t.get_total_us(), 13);
        assert_eq!(t.seeded_total(), 3);
        assert_eq!(t.runs(), 1);
    }

    #[test]
    fn test_phase_slots_distinct() {
        let mut slots: Vec<_> = Phase::ALL.iter().map(|p| p.slot()).collect();
        slots.dedup();
        assert_eq!(slots, vec![0, 1, 2, 3, 4]);
    }
}
