//! 实验结果.

use crate::algos::Profile;
use ct_edt::edt::Phase;
use std::io::{self, Write};

/// 将 `profile` 的结果写进 `w` 中.
fn describe_into<W: Write>(name: &str, p: &Profile, w: &mut W) -> io::Result<()> {
    const S4: &str = "    ";

    #[inline]
    fn f64_to_display(f: Option<f64>) -> String {
        match f {
            Some(f) => format!("{f:.6}"),
            None => "/".to_string(),
        }
    }

    #[inline]
    fn u64_to_display(u: Option<u64>) -> String {
        match u {
            Some(u) => u.to_string(),
            None => "/".to_string(),
        }
    }

    writeln!(w, "Profile `{name}`:")?;
    writeln!(w, "{S4}Volumes without transition: {}", p.get_trivial())?;
    writeln!(w, "{S4}Transformed volumes: {}", p.get_target())?;
    writeln!(w, "{S4}Seeded voxels: {}", p.get_seeded())?;
    writeln!(w, "{S4}Effective total time: {} us", p.get_target_time_us())?;
    writeln!(
        w,
        "{S4}Effective average time: {} us",
        f64_to_display(p.get_avg_target_time_us())
    )?;
    for phase in Phase::ALL {
        writeln!(w, "{S4}{S4}{phase:?}: {} us", p.get_phase_us(phase))?;
    }
    writeln!(w, "{S4}Total machine time: {} us", p.get_real_time_us())?;
    writeln!(
        w,
        "{S4}Checked voxels: {} ({} mismatched)",
        p.get_checked(),
        p.get_mismatched()
    )?;
    writeln!(
        w,
        "{S4}Max absolute error: {}",
        f64_to_display(p.get_max_error())
    )?;
    let t = p.get_most_time_consuming().map(|d| d.as_micros() as u64);
    write!(w, "{S4}Most time-consuming task costs {} us", u64_to_display(t))?;
    Ok(())
}

/// 消融实验最终结果.
pub struct AblationResult {
    data: Vec<(&'static str, Profile)>,
}

impl AblationResult {
    pub fn from_iter<I: IntoIterator<Item = (&'static str, Profile)>>(it: I) -> Self {
        Self {
            data: it.into_iter().collect(),
        }
    }

    /// 分析运行结果.
    pub fn analyze(&self) -> io::Result<()> {
        let mut out = io::stdout().lock();
        utils::sep_to(&mut out)?;
        for (key, profile) in self.data.iter() {
            describe_into(key, profile, &mut out)?;
            writeln!(out)?;
            utils::sep_to(&mut out)?;
        }
        Ok(())
    }

    /// 精确策略 (名称不以 `sub-voxel` 开头) 是否全部与暴力解一致?
    pub fn exact(&self) -> bool {
        self.data
            .iter()
            .filter(|(k, _)| !k.starts_with("sub-voxel"))
            .all(|(_, p)| p.get_mismatched() == 0)
    }
}
