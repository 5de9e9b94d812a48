use chrono::{DateTime, Utc};
use jobscout_protocol::{JobRecord, ScoreBreakdown};
use std::collections::HashSet;

/// The profile a request scores against: the query itself plus whatever the
/// caller supplied or the resume context contributed.
#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    pub query: String,
    pub skills: Vec<String>,
    pub experience_years: u32,
}

impl UserProfile {
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty() && self.skills.is_empty() && self.experience_years == 0
    }
}

/// A record with its request-scoped score attached.
#[derive(Debug, Clone)]
pub struct ScoredJob {
    pub job: JobRecord,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Complexity bucket keyed on the query's token count. Complex queries like
/// "Senior Python Backend Developer" carry most of their intent in the
/// title, so the title weight grows at the expense of skills/experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryComplexity {
    Simple,
    Complex,
}

impl QueryComplexity {
    pub fn of(query: &str) -> Self {
        if query.split_whitespace().count() > 2 {
            Self::Complex
        } else {
            Self::Simple
        }
    }
}

/// Component weights, selected per complexity bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightTable {
    pub skills: f64,
    pub title: f64,
    pub experience: f64,
    pub recency: f64,
}

impl WeightTable {
    pub fn for_complexity(complexity: QueryComplexity) -> Self {
        match complexity {
            QueryComplexity::Simple => Self {
                skills: 0.40,
                title: 0.30,
                experience: 0.20,
                recency: 0.10,
            },
            QueryComplexity::Complex => Self {
                skills: 0.30,
                title: 0.50,
                experience: 0.10,
                recency: 0.10,
            },
        }
    }
}

/// Seniority term in the query mapped to title terms that disqualify.
const SENIORITY_NEGATIVES: &[(&str, &[&str])] = &[
    ("senior", &["junior", "intern", "entry level", "fresher"]),
    ("lead", &["junior", "intern", "entry level"]),
    ("principal", &["junior", "intern", "senior"]),
    ("junior", &["senior", "lead", "principal", "manager", "architect"]),
    ("intern", &["senior", "lead", "principal", "manager"]),
];

const SENIORITY_PENALTY: f64 = 0.5;

/// Deterministic multi-factor relevance scorer. Produces a 0-100 score and
/// a per-component breakdown for explainability.
pub struct RelevanceScorer;

impl RelevanceScorer {
    /// Score against the current wall clock.
    pub fn score(job: &JobRecord, profile: &UserProfile) -> (f64, ScoreBreakdown) {
        Self::score_at(job, profile, Utc::now())
    }

    /// Score with an explicit "now" for the recency component.
    pub fn score_at(
        job: &JobRecord,
        profile: &UserProfile,
        now: DateTime<Utc>,
    ) -> (f64, ScoreBreakdown) {
        if profile.is_empty() {
            return (0.0, ScoreBreakdown::new());
        }

        let weights = WeightTable::for_complexity(QueryComplexity::of(&profile.query));
        let mut breakdown = ScoreBreakdown::new();

        let skill_score = Self::skill_score(job, &profile.skills);
        breakdown.set("skills", round1(skill_score));

        let title_score = Self::title_score(&job.title, &profile.query);
        breakdown.set("title", round1(title_score));

        let exp_score = Self::experience_score(
            job.experience_min,
            job.experience_max,
            profile.experience_years,
        );
        breakdown.set("experience", round1(exp_score));

        let recency_score = Self::recency_score(job.posted_at, now);
        breakdown.set("recency", round1(recency_score));

        let mut score = skill_score * weights.skills
            + title_score * weights.title
            + exp_score * weights.experience
            + recency_score * weights.recency;

        if Self::seniority_mismatch(&profile.query, &job.title) {
            score *= SENIORITY_PENALTY;
            breakdown.set("seniority_penalty", SENIORITY_PENALTY);
        }

        let final_score = round1(score.clamp(0.0, 100.0));
        breakdown.set("final_score", final_score);
        (final_score, breakdown)
    }

    /// Fraction of requested skills found by case-insensitive substring
    /// search over title + description + skills field, scaled to 0-100.
    /// Neutral 50 when the profile lists no skills.
    fn skill_score(job: &JobRecord, user_skills: &[String]) -> f64 {
        if user_skills.is_empty() {
            return 50.0;
        }

        let haystack = format!(
            "{} {} {}",
            job.title,
            job.description,
            job.skills.join(" ")
        )
        .to_lowercase();

        let matched = user_skills
            .iter()
            .filter(|skill| haystack.contains(&skill.to_lowercase()))
            .count();

        ((matched as f64 / user_skills.len() as f64) * 100.0).min(100.0)
    }

    fn title_score(job_title: &str, query: &str) -> f64 {
        let title = job_title.trim().to_lowercase();
        let query = query.trim().to_lowercase();

        if !query.is_empty() && query == title {
            return 100.0;
        }
        if !query.is_empty() && title.contains(&query) {
            return 90.0;
        }

        let query_tokens: HashSet<&str> = query.split_whitespace().collect();
        if query_tokens.is_empty() {
            return 0.0;
        }
        let title_tokens: HashSet<&str> = title.split_whitespace().collect();
        let overlap = query_tokens.intersection(&title_tokens).count();
        (overlap as f64 / query_tokens.len() as f64) * 80.0
    }

    /// 100 inside the job's effective range, linear 20-points-per-year decay
    /// outside it. Jobs with no experience data score neutral 50. A zero
    /// upper bound reads as "min+" and widens to min + 5.
    fn experience_score(job_min: u32, job_max: u32, user_years: u32) -> f64 {
        if job_min == 0 && job_max == 0 {
            return 50.0;
        }

        let effective_max = if job_max > 0 { job_max } else { job_min + 5 };
        if user_years >= job_min && user_years <= effective_max {
            return 100.0;
        }

        let distance = if user_years < job_min {
            job_min - user_years
        } else {
            user_years - effective_max
        };
        (100.0 - distance as f64 * 20.0).max(0.0)
    }

    /// Step function on listing age in days; unknown age is neutral 50.
    fn recency_score(posted_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
        let Some(posted) = posted_at else {
            return 50.0;
        };

        let days = (now - posted).num_days();
        match days {
            d if d <= 1 => 100.0,
            d if d <= 3 => 90.0,
            d if d <= 7 => 80.0,
            d if d <= 14 => 60.0,
            d if d <= 30 => 40.0,
            _ => 20.0,
        }
    }

    /// Whole-word disqualifier match: "lead" in the query must not penalize
    /// a "Team Leader" title.
    fn seniority_mismatch(query: &str, job_title: &str) -> bool {
        let query = query.to_lowercase();
        let padded_title = format!(" {} ", job_title.to_lowercase());

        for (term, negatives) in SENIORITY_NEGATIVES {
            if !query.contains(term) {
                continue;
            }
            if negatives
                .iter()
                .any(|neg| padded_title.contains(&format!(" {neg} ")))
            {
                return true;
            }
        }
        false
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
