use crate::identity::job_identity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A job listing as owned by the persistent store.
///
/// Experience bounds are integer years; `0` on both bounds is the sentinel
/// "unknown", never "entry-level". When both bounds are nonzero the record
/// guarantees `experience_min <= experience_max`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobRecord {
    /// Deterministic content digest of `apply_link + title`.
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub country: String,
    pub experience_min: u32,
    pub experience_max: u32,
    pub ctc_min: Option<f64>,
    pub ctc_max: Option<f64>,
    pub skills: Vec<String>,
    pub posted_at: Option<DateTime<Utc>>,
    pub apply_link: String,
    pub source: String,
    pub description: String,
}

impl JobRecord {
    /// Promote an adapter record into a stored record, filling sentinels
    /// and deriving the identity digest.
    pub fn from_normalized(raw: NormalizedRecord, country: &str) -> Self {
        let id = job_identity(&raw.apply_link, &raw.title);

        let mut experience_min = raw.experience_min.unwrap_or(0);
        let mut experience_max = raw.experience_max.unwrap_or(0);
        if experience_min > 0 && experience_max > 0 && experience_min > experience_max {
            std::mem::swap(&mut experience_min, &mut experience_max);
        }

        Self {
            id,
            title: raw.title,
            company: raw.company,
            location: raw.location.unwrap_or_else(|| country.to_string()),
            country: country.to_string(),
            experience_min,
            experience_max,
            ctc_min: raw.ctc_min,
            ctc_max: raw.ctc_max,
            skills: raw.skills,
            posted_at: raw.posted_at,
            apply_link: raw.apply_link,
            source: raw.source,
            description: raw.description.unwrap_or_default(),
        }
    }

    /// True when the record carries no experience data at all.
    pub fn experience_unknown(&self) -> bool {
        self.experience_min == 0 && self.experience_max == 0
    }
}

/// The uniform shape every source adapter produces, before sentinels are
/// applied. Missing fields default to the [`JobRecord`] sentinels.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub experience_min: Option<u32>,
    pub experience_max: Option<u32>,
    pub ctc_min: Option<f64>,
    pub ctc_max: Option<f64>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub posted_at: Option<DateTime<Utc>>,
    pub apply_link: String,
    pub source: String,
    pub description: Option<String>,
}

/// Per-request component scores attached to a record for the duration of a
/// response. Never persisted.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ScoreBreakdown {
    components: BTreeMap<String, f64>,
}

impl ScoreBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, component: &str, value: f64) {
        self.components.insert(component.to_string(), value);
    }

    pub fn get(&self, component: &str) -> Option<f64> {
        self.components.get(component).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.components.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn from_normalized_fills_sentinels() {
        let raw = NormalizedRecord {
            title: "Data Engineer".to_string(),
            company: "Acme".to_string(),
            apply_link: "https://acme.example/jobs/1".to_string(),
            source: "Naukri".to_string(),
            ..Default::default()
        };

        let job = JobRecord::from_normalized(raw, "India");
        assert_eq!(job.location, "India");
        assert_eq!(job.experience_min, 0);
        assert_eq!(job.experience_max, 0);
        assert!(job.experience_unknown());
        assert_eq!(job.description, "");
        assert!(!job.id.is_empty());
    }

    #[test]
    fn from_normalized_orders_experience_bounds() {
        let raw = NormalizedRecord {
            title: "Backend Developer".to_string(),
            company: "Acme".to_string(),
            experience_min: Some(8),
            experience_max: Some(3),
            apply_link: "https://acme.example/jobs/2".to_string(),
            source: "LinkedIn".to_string(),
            ..Default::default()
        };

        let job = JobRecord::from_normalized(raw, "India");
        assert_eq!((job.experience_min, job.experience_max), (3, 8));
    }

    #[test]
    fn identity_is_stable_across_conversions() {
        let raw = || NormalizedRecord {
            title: "SRE".to_string(),
            company: "Acme".to_string(),
            apply_link: "https://acme.example/jobs/3".to_string(),
            source: "Indeed".to_string(),
            ..Default::default()
        };

        let a = JobRecord::from_normalized(raw(), "India");
        let b = JobRecord::from_normalized(raw(), "India");
        assert_eq!(a.id, b.id);
    }
}
