//! 算法运行统计.

use ct_edt::edt::{EdtObserver, Phase, PhaseTimings};
use std::time::{Duration, Instant};

/// 分段累计计时器: 只累计一次次 "开始 -> 结束" 之间的时间.
///
/// 用于只统计距离变换本身, 把暴力解和比对的时间排除在外.
#[derive(Clone, Debug)]
struct AccTimer {
    consumed: Duration,
    since: Instant,
}

impl AccTimer {
    /// 创建后立即开始第一段计时.
    #[inline]
    pub fn new() -> Self {
        Self {
            consumed: Duration::ZERO,
            since: Instant::now(),
        }
    }

    /// 开始新的一段. 重复调用会丢弃尚未结束的一段.
    #[inline]
    pub fn start(&mut self) {
        self.since = Instant::now();
    }

    /// 结束当前一段并累加, 返回这一段的时长.
    #[inline]
    pub fn elapsed(&mut self) -> Duration {
        let d = self.since.elapsed();
        self.consumed += d;
        d
    }

    /// 累计时长 (微秒).
    #[inline]
    pub fn get_total_us(&self) -> u64 {
        self.consumed.as_micros() as u64
    }
}

impl Default for AccTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// 一组距离变换运行的统计: 体数据计数, 与暴力解的比对结果, 耗时及引擎各阶段耗时.
///
/// 同时实现 [`EdtObserver`], 可直接作为观测者传给引擎.
#[derive(Clone, Debug)]
pub struct Profile {
    /// 没有任何前景/背景交界的体数据个数 (结果全为 0).
    trivial: u64,

    /// 存在交界, 真正需要变换的体数据个数.
    target: u64,

    /// 距离变换本身的累计墙钟时间.
    target_time: AccTimer,

    /// 从创建到 `finish` 的墙钟时间, 含暴力解与比对.
    real_time: AccTimer,

    /// 单次距离变换的最长耗时.
    most: Duration,

    /// 与暴力解比较过的体素个数.
    checked: u64,

    /// 与暴力解不一致 (误差超过容差) 的体素个数.
    mismatched: u64,

    /// 与暴力解的最大绝对误差.
    max_error: f64,

    /// 引擎内部各阶段耗时.
    phases: PhaseTimings,
}

impl Profile {
    /// 初始化.
    #[inline]
    pub fn new() -> Self {
        Self {
            trivial: 0,
            target: 0,
            target_time: AccTimer::default(),
            real_time: AccTimer::default(),
            most: Duration::MAX,
            checked: 0,
            mismatched: 0,
            max_error: 0.0,
            phases: PhaseTimings::new(),
        }
    }

    /// 记录一个新的无交界体数据.
    #[inline]
    pub fn count_trivial(&mut self) {
        self.trivial += 1;
    }

    /// 记录一个普通体数据. `start` 表明是否同时开启新一轮计时任务.
    #[inline]
    pub fn count_target(&mut self, start: bool) {
        self.target += 1;
        if start {
            self.target_start();
        }
    }

    /// 开始一次新的普通体数据处理计时.
    #[inline]
    pub fn target_start(&mut self) {
        self.target_time.start();
    }

    /// 结束一次普通体数据处理计时.
    #[inline]
    pub fn target_elapsed(&mut self) {
        let d = self.target_time.elapsed();
        self.most = match self.most {
            Duration::MAX => d,
            once_duration => std::cmp::max(d, once_duration),
        };
    }

    /// 记录一个体素与暴力解的比较结果. 误差超过 `tol` 时计为不一致.
    #[inline]
    pub fn count_checked(&mut self, got: f64, expect: f64, tol: f64) {
        let err = (got - expect).abs();
        self.checked += 1;
        if err > tol {
            self.mismatched += 1;
        }
        self.max_error = self.max_error.max(err);
    }

    /// 结束全部计时.
    #[inline]
    pub fn finish(mut self) -> Self {
        self.real_time.elapsed();
        self
    }

    /// 获得总无交界体数据个数.
    #[inline]
    pub fn get_trivial(&self) -> u64 {
        self.trivial
    }

    /// 获得总普通体数据个数.
    #[inline]
    pub fn get_target(&self) -> u64 {
        self.target
    }

    /// 获得比较过的体素个数.
    #[inline]
    pub fn get_checked(&self) -> u64 {
        self.checked
    }

    /// 获得不一致的体素个数.
    #[inline]
    pub fn get_mismatched(&self) -> u64 {
        self.mismatched
    }

    /// 获得最大绝对误差. 没有比较过任何体素时返回 `None`.
    #[inline]
    pub fn get_max_error(&self) -> Option<f64> {
        (self.checked > 0).then_some(self.max_error)
    }

    /// 以微秒为单位获得处理普通体数据的总花费自然时间.
    #[inline]
    pub fn get_target_time_us(&self) -> u64 {
        self.target_time.get_total_us()
    }

    /// 以微秒为单位获得算法运行到目前的总自然时间.
    #[inline]
    pub fn get_real_time_us(&self) -> u64 {
        self.real_time.get_total_us()
    }

    /// 以微秒为单位获得处理普通体数据的平均时间.
    #[inline]
    pub fn get_avg_target_time_us(&self) -> Option<f64> {
        match self.target {
            0 => None,
            target => Some(self.get_target_time_us() as f64 / target as f64),
        }
    }

    /// 以微秒为单位获得引擎第 `phase` 阶段的累计时间.
    #[inline]
    pub fn get_phase_us(&self, phase: Phase) -> u64 {
        self.phases.get(phase).as_micros() as u64
    }

    /// 获得引擎累计播种的体素个数.
    #[inline]
    pub fn get_seeded(&self) -> usize {
        self.phases.seeded_total()
    }

    /// 获取处理普通体数据最耗时的一次任务所消耗的时间.
    ///
    /// 如果不存在任务, 则返回 `None`.
    pub fn get_most_time_consuming(&self) -> Option<Duration> {
        match self.most {
            Duration::MAX => None,
            d => Some(d),
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}

impl EdtObserver for Profile {
    #[inline]
    fn seeded(&mut self, count: usize) {
        self.phases.seeded(count);
    }

    #[inline]
    fn phase_finished(&mut self, phase: Phase, elapsed: Duration) {
        self.phases.phase_finished(phase, elapsed);
    }
}
