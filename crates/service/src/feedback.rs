use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;

/// What the user did with a listing. Only positive actions feed the
/// Rocchio session boost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Click,
    Apply,
    Dismiss,
}

impl InteractionKind {
    fn is_positive(self) -> bool {
        matches!(self, Self::Click | Self::Apply)
    }
}

#[derive(Debug, Clone)]
struct Interaction {
    context_id: String,
    job_id: String,
    kind: InteractionKind,
    at: DateTime<Utc>,
}

const MAX_RETAINED: usize = 4096;

/// In-memory log of per-context interactions, consulted on the read path
/// to find recent positive signals for the query-vector adaptation.
pub struct InteractionLog {
    entries: Mutex<VecDeque<Interaction>>,
}

impl InteractionLog {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
        }
    }

    pub fn record(&self, context_id: &str, job_id: &str, kind: InteractionKind) {
        self.record_at(context_id, job_id, kind, Utc::now());
    }

    pub fn record_at(
        &self,
        context_id: &str,
        job_id: &str,
        kind: InteractionKind,
        at: DateTime<Utc>,
    ) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.len() >= MAX_RETAINED {
            entries.pop_front();
        }
        entries.push_back(Interaction {
            context_id: context_id.to_string(),
            job_id: job_id.to_string(),
            kind,
            at,
        });
    }

    /// Most recent positive interactions for a context inside the window,
    /// newest first, bounded by `limit`.
    pub fn recent_positive(
        &self,
        context_id: &str,
        window: Duration,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Vec<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .iter()
            .rev()
            .filter(|i| {
                i.context_id == context_id && i.kind.is_positive() && now - i.at <= window
            })
            .take(limit)
            .map(|i| i.job_id.clone())
            .collect()
    }
}

impl Default for InteractionLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn only_recent_positive_interactions_count() {
        let log = InteractionLog::new();
        let now = Utc::now();

        log.record_at("ctx", "a", InteractionKind::Click, now - Duration::minutes(5));
        log.record_at("ctx", "b", InteractionKind::Apply, now - Duration::minutes(10));
        log.record_at("ctx", "c", InteractionKind::Dismiss, now - Duration::minutes(2));
        log.record_at("ctx", "d", InteractionKind::Click, now - Duration::hours(3));
        log.record_at("other", "e", InteractionKind::Click, now);

        let ids = log.recent_positive("ctx", Duration::hours(1), 10, now);
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn limit_keeps_newest() {
        let log = InteractionLog::new();
        let now = Utc::now();
        for i in 0..5 {
            log.record_at(
                "ctx",
                &format!("job{i}"),
                InteractionKind::Click,
                now - Duration::minutes(i),
            );
        }

        let ids = log.recent_positive("ctx", Duration::hours(1), 2, now);
        assert_eq!(ids, vec!["job0", "job1"]);
    }
}
