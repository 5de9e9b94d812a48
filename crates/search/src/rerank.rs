use crate::scorer::ScoredJob;
use jobscout_vector_index::Reranker;

const DEFAULT_TOP_N: usize = 50;
const RERANK_WEIGHT: f64 = 0.7;
const RULE_WEIGHT: f64 = 0.3;
const QUERY_TRUNCATION: usize = 500;

/// Logistic squash of a raw cross-encoder score into `[0, 1]`.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Bounded expensive rescoring: only the top `top_n` already-scored
/// candidates go through the cross-encoder; the tail passes untouched.
///
/// Blended score = `0.7 * rerank*100 + 0.3 * rule`. Any reranker failure
/// degrades silently to the rule-based ordering.
pub async fn blend_rerank(
    reranker: &dyn Reranker,
    query: &str,
    scored: Vec<ScoredJob>,
    top_n: Option<usize>,
) -> Vec<ScoredJob> {
    let top_n = top_n.unwrap_or(DEFAULT_TOP_N);
    if scored.is_empty() {
        return scored;
    }

    let split = top_n.min(scored.len());
    let mut head: Vec<ScoredJob> = scored[..split].to_vec();
    let tail: Vec<ScoredJob> = scored[split..].to_vec();

    let documents: Vec<String> = head.iter().map(|s| s.job.description.clone()).collect();
    let truncated_query: String = query.chars().take(QUERY_TRUNCATION).collect();

    let raw_scores = match reranker.score(&truncated_query, &documents).await {
        Ok(scores) if scores.len() == head.len() => scores,
        Ok(scores) => {
            log::warn!(
                "Reranker returned {} scores for {} candidates, keeping rule order",
                scores.len(),
                head.len()
            );
            return rejoin(head, tail);
        }
        Err(err) => {
            log::warn!("Reranking failed, keeping rule order: {err}");
            return rejoin(head, tail);
        }
    };

    for (candidate, raw) in head.iter_mut().zip(raw_scores) {
        let rerank_score = sigmoid(raw as f64) * 100.0;
        let blended = rerank_score * RERANK_WEIGHT + candidate.score * RULE_WEIGHT;
        candidate.breakdown.set("rerank", (rerank_score * 10.0).round() / 10.0);
        candidate.score = blended;
    }

    head.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    rejoin(head, tail)
}

fn rejoin(mut head: Vec<ScoredJob>, tail: Vec<ScoredJob>) -> Vec<ScoredJob> {
    head.extend(tail);
    head
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use jobscout_protocol::{JobRecord, NormalizedRecord, ScoreBreakdown};
    use jobscout_vector_index::IndexError;
    use pretty_assertions::assert_eq;

    fn scored(title: &str, description: &str, score: f64) -> ScoredJob {
        let job = JobRecord::from_normalized(
            NormalizedRecord {
                title: title.to_string(),
                company: "Acme".to_string(),
                apply_link: format!("https://a.example/{title}"),
                source: "Naukri".to_string(),
                description: Some(description.to_string()),
                ..Default::default()
            },
            "India",
        );
        ScoredJob {
            job,
            score,
            breakdown: ScoreBreakdown::new(),
        }
    }

    struct FixedReranker(Vec<f32>);

    #[async_trait]
    impl Reranker for FixedReranker {
        async fn score(&self, _: &str, _: &[String]) -> jobscout_vector_index::Result<Vec<f32>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenReranker;

    #[async_trait]
    impl Reranker for BrokenReranker {
        async fn score(&self, _: &str, _: &[String]) -> jobscout_vector_index::Result<Vec<f32>> {
            Err(IndexError::RerankerFailure("model unavailable".to_string()))
        }
    }

    #[test]
    fn sigmoid_maps_into_unit_interval() {
        assert!(sigmoid(-20.0) < 0.001);
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-9);
        assert!(sigmoid(20.0) > 0.999);
    }

    #[tokio::test]
    async fn reorders_head_by_blended_score() {
        let input = vec![
            scored("A", "weak match", 80.0),
            scored("B", "strong match", 70.0),
        ];
        // B gets a high raw score, A a very low one.
        let reranker = FixedReranker(vec![-10.0, 10.0]);

        let out = blend_rerank(&reranker, "query", input, Some(50)).await;
        assert_eq!(out[0].job.title, "B");
        // Blend for B: ~100*0.7 + 70*0.3 = ~91.
        assert!((out[0].score - 91.0).abs() < 0.5);
    }

    #[tokio::test]
    async fn tail_beyond_top_n_is_untouched() {
        let input = vec![
            scored("A", "head", 90.0),
            scored("B", "head", 85.0),
            scored("C", "tail", 40.0),
        ];
        let reranker = FixedReranker(vec![0.0, 0.0]);

        let out = blend_rerank(&reranker, "query", input, Some(2)).await;
        assert_eq!(out[2].job.title, "C");
        assert_eq!(out[2].score, 40.0);
        assert!(out[2].breakdown.get("rerank").is_none());
    }

    #[tokio::test]
    async fn failure_degrades_to_rule_order() {
        let input = vec![scored("A", "x", 90.0), scored("B", "y", 80.0)];
        let out = blend_rerank(&BrokenReranker, "query", input.clone(), Some(50)).await;

        let titles: Vec<&str> = out.iter().map(|s| s.job.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert_eq!(out[0].score, 90.0);
    }

    #[tokio::test]
    async fn length_mismatch_degrades_to_rule_order() {
        let input = vec![scored("A", "x", 90.0), scored("B", "y", 80.0)];
        let reranker = FixedReranker(vec![1.0]);
        let out = blend_rerank(&reranker, "query", input, Some(50)).await;
        assert_eq!(out[0].score, 90.0);
    }
}
