use std::cmp::Ordering;

use crate::classification::model::DecisionModel;
use crate::classification::ClassificationError;
use crate::models::prediction::{RankedRole, RankedRoles, TOP_K};

/// Fails when a model cannot fill a `TOP_K` ranking.
pub fn ensure_enough_classes(found: usize) -> Result<(), ClassificationError> {
    if found < TOP_K {
        return Err(ClassificationError::InsufficientClasses {
            found,
            required: TOP_K,
        });
    }
    Ok(())
}

/// Scores `features` with `model` and returns the `TOP_K` best roles,
/// highest score first.
pub fn rank(features: &[f64], model: &dyn DecisionModel) -> Result<RankedRoles, ClassificationError> {
    let labels = model.class_labels();
    ensure_enough_classes(labels.len())?;

    let scores = model
        .decision_scores(features)
        .map_err(|e| ClassificationError::Inference(format!("decision function failed: {e:#}")))?;

    if scores.len() != labels.len() {
        return Err(ClassificationError::Inference(format!(
            "model returned {} scores for {} classes",
            scores.len(),
            labels.len()
        )));
    }
    if let Some(i) = scores.iter().position(|s| !s.is_finite()) {
        return Err(ClassificationError::Inference(format!(
            "non-finite score {} for class '{}'",
            scores[i], labels[i]
        )));
    }

    let top: Vec<RankedRole> = top_k_indices(&scores, TOP_K)
        .into_iter()
        .map(|i| RankedRole {
            role: labels[i].clone(),
            score: scores[i],
        })
        .collect();

    let roles: [RankedRole; TOP_K] = top.try_into().map_err(|v: Vec<RankedRole>| {
        ClassificationError::Inference(format!("expected {TOP_K} ranked roles, got {}", v.len()))
    })?;
    Ok(RankedRoles(roles))
}

/// Sorts indices ascending by score, keeps the last `k` and reverses them.
///
/// Within the ascending pass equal scores are ordered by descending index, so
/// after the reversal ties read in ascending index order and the lower index
/// wins a tie at the cut-off. Scores must be finite.
pub fn top_k_indices(scores: &[f64], k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[a]
            .partial_cmp(&scores[b])
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.cmp(&a))
    });
    order.into_iter().rev().take(k).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::testing::FixedScoreModel;
    use crate::classification::ErrorKind;

    fn rank_fixed(pairs: &[(&str, f64)]) -> Result<RankedRoles, ClassificationError> {
        rank(&[0.0], &FixedScoreModel::new(pairs, 1))
    }

    #[test]
    fn test_three_classes_return_all_descending() {
        let ranked = rank_fixed(&[("QA", 0.1), ("DevOps", 0.9), ("Frontend", 0.5)]).unwrap();
        assert_eq!(ranked.labels(), vec!["DevOps", "Frontend", "QA"]);
    }

    #[test]
    fn test_more_classes_return_top_three() {
        let ranked = rank_fixed(&[
            ("A", -1.0),
            ("B", 3.0),
            ("C", 0.0),
            ("D", 2.5),
            ("E", 7.0),
            ("F", -4.0),
        ])
        .unwrap();
        assert_eq!(ranked.labels(), vec!["E", "B", "D"]);
        let s: Vec<f64> = ranked.roles().iter().map(|r| r.score).collect();
        assert!(s[0] >= s[1] && s[1] >= s[2]);
    }

    #[test]
    fn test_tie_keeps_lower_index_first() {
        let ranked = rank_fixed(&[("A", 1.0), ("B", 5.0), ("C", 5.0), ("D", 0.0)]).unwrap();
        assert_eq!(ranked.labels(), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_all_equal_scores_follow_class_order() {
        let ranked = rank_fixed(&[("A", 2.0), ("B", 2.0), ("C", 2.0), ("D", 2.0)]).unwrap();
        assert_eq!(ranked.labels(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_tie_at_cutoff_selects_lower_index() {
        let ranked = rank_fixed(&[("A", 9.0), ("B", 1.0), ("C", 4.0), ("D", 1.0), ("E", 1.0)])
            .unwrap();
        assert_eq!(ranked.labels(), vec!["A", "C", "B"]);
    }

    #[test]
    fn test_negative_zero_ties_with_zero() {
        let ranked = rank_fixed(&[("A", 0.0), ("B", -0.0), ("C", -1.0)]).unwrap();
        assert_eq!(ranked.labels(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_fewer_than_three_classes_fails() {
        for pairs in [
            vec![],
            vec![("A", 1.0)],
            vec![("A", 1.0), ("B", 2.0)],
        ] {
            let err = rank_fixed(&pairs).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InsufficientClasses);
        }
    }

    #[test]
    fn test_score_count_mismatch_is_inference_error() {
        let mut model = FixedScoreModel::new(&[("A", 1.0), ("B", 2.0), ("C", 3.0)], 1);
        model.scores.pop();
        let err = rank(&[0.0], &model).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InferenceError);
    }

    #[test]
    fn test_nan_score_is_inference_error() {
        let err = rank_fixed(&[("A", 1.0), ("B", f64::NAN), ("C", 3.0)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InferenceError);
        assert!(err.to_string().contains("'B'"));
    }

    #[test]
    fn test_top_k_indices_matches_ascending_then_reverse() {
        assert_eq!(top_k_indices(&[0.3, 0.1, 0.7, 0.5], 3), vec![2, 3, 0]);
        assert_eq!(top_k_indices(&[1.0, 1.0], 3), vec![0, 1]);
    }
}
