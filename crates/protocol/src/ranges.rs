use serde::{Deserialize, Serialize};

/// Parsed experience filter range, in years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpRange {
    pub min: u32,
    pub max: u32,
}

/// Parsed compensation filter range, on the absolute scale (1 LPA = 100_000).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CtcRange {
    pub min: f64,
    pub max: f64,
}

const OPEN_EXP_MAX: u32 = 99;
const OPEN_CTC_MAX: f64 = 999_999_999.0;
const LAKH: f64 = 100_000.0;

/// Parse filter strings like `"2-5 Years"`, `"10+ Years"`, or `"7"`.
/// An open upper bound maps to 99 years. Unparseable input yields `None`
/// and is skipped by the filter layer rather than failing the request.
pub fn parse_exp_range(raw: &str) -> Option<ExpRange> {
    let cleaned = raw.replace("Years", "").replace("Year", "");
    let open_ended = cleaned.contains('+');
    let cleaned = cleaned.replace('+', "");
    let mut parts = cleaned.split('-');

    let min: u32 = parts.next()?.trim().parse().ok()?;
    let max = match parts.next() {
        Some(part) => part.trim().parse().ok()?,
        None if open_ended => OPEN_EXP_MAX,
        None => OPEN_EXP_MAX,
    };
    Some(ExpRange { min, max })
}

/// Parse filter strings like `"0-6 LPA"` or `"25+ LPA"` into absolute
/// compensation bounds. An open upper bound maps to an effectively
/// unbounded ceiling.
pub fn parse_ctc_range(raw: &str) -> Option<CtcRange> {
    let cleaned = raw.replace("LPA", "");
    let open_ended = cleaned.contains('+');
    let cleaned = cleaned.replace('+', "");
    let mut parts = cleaned.split('-');

    let min: f64 = parts.next()?.trim().parse().ok()?;
    let max = match parts.next() {
        Some(part) => part.trim().parse::<f64>().ok()? * LAKH,
        None if open_ended => OPEN_CTC_MAX,
        None => OPEN_CTC_MAX,
    };
    Some(CtcRange {
        min: min * LAKH,
        max,
    })
}

impl ExpRange {
    /// Range-overlap admission: the job is admitted iff its range overlaps
    /// the filter range. A zero job upper bound means "unbounded above".
    /// Overlap, not containment: a job range wider than the filter still
    /// qualifies.
    pub fn admits(&self, job_min: u32, job_max: u32) -> bool {
        job_min <= self.max && (job_max >= self.min || job_max == 0)
    }
}

impl CtcRange {
    /// Same overlap shape as [`ExpRange::admits`]. Only the upper bound is
    /// open when missing or zero; a job with no `ctc_min` at all carries no
    /// compensation data and is excluded by an active salary filter.
    pub fn admits(&self, job_min: Option<f64>, job_max: Option<f64>) -> bool {
        let Some(min) = job_min else {
            return false;
        };
        let max_ok = match job_max {
            Some(max) if max > 0.0 => max >= self.min,
            _ => true,
        };
        min <= self.max && max_ok
    }
}
