/// Rocchio query adaptation: shift the base query vector toward the centroid
/// of known-relevant feedback vectors.
///
/// `adapted = alpha * base + beta * mean(feedback)`. With no feedback the
/// base vector is returned unchanged.
pub fn rocchio_blend(base: &[f32], feedback: &[Vec<f32>], alpha: f32, beta: f32) -> Vec<f32> {
    if feedback.is_empty() {
        return base.to_vec();
    }

    let mut centroid = vec![0.0f32; base.len()];
    let mut used = 0usize;
    for vector in feedback {
        if vector.len() != base.len() {
            continue;
        }
        for (c, v) in centroid.iter_mut().zip(vector.iter()) {
            *c += v;
        }
        used += 1;
    }
    if used == 0 {
        return base.to_vec();
    }
    for c in &mut centroid {
        *c /= used as f32;
    }

    base.iter()
        .zip(centroid.iter())
        .map(|(b, c)| alpha * b + beta * c)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_feedback_returns_base() {
        let base = vec![0.5, 0.5];
        assert_eq!(rocchio_blend(&base, &[], 0.8, 0.2), base);
    }

    #[test]
    fn blends_toward_feedback_centroid() {
        let base = vec![1.0, 0.0];
        let feedback = vec![vec![0.0, 1.0], vec![0.0, 1.0]];
        let adapted = rocchio_blend(&base, &feedback, 0.8, 0.2);
        assert_eq!(adapted, vec![0.8, 0.2]);
    }

    #[test]
    fn mismatched_feedback_vectors_are_skipped() {
        let base = vec![1.0, 0.0];
        let feedback = vec![vec![0.0, 1.0, 0.0]];
        assert_eq!(rocchio_blend(&base, &feedback, 0.8, 0.2), base);
    }
}
