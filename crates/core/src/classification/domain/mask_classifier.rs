use crate::shared::frame::Frame;
use crate::shared::prediction::Prediction;

/// Domain interface for mask classification.
///
/// Implementations return exactly one prediction per input face, in input
/// order. An empty batch yields an empty result without running inference.
pub trait MaskClassifier {
    fn classify(&mut self, faces: &[Frame]) -> Result<Vec<Prediction>, Box<dyn std::error::Error>>;
}

/// Splits a flattened `[N, 2]` score tensor into predictions.
///
/// Fails unless the tensor holds exactly `expected` rows.
pub fn predictions_from_scores(
    scores: &[f32],
    expected: usize,
) -> Result<Vec<Prediction>, Box<dyn std::error::Error>> {
    if scores.len() != expected * 2 {
        return Err(format!(
            "mask classifier returned {} scores for {expected} faces",
            scores.len()
        )
        .into());
    }
    Ok(scores
        .chunks_exact(2)
        .map(|pair| Prediction::new(pair[0], pair[1]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_map_to_predictions_in_order() {
        let preds = predictions_from_scores(&[0.9, 0.1, 0.2, 0.8, 0.5, 0.5], 3).unwrap();
        assert_eq!(
            preds,
            vec![
                Prediction::new(0.9, 0.1),
                Prediction::new(0.2, 0.8),
                Prediction::new(0.5, 0.5),
            ]
        );
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        assert!(predictions_from_scores(&[0.9, 0.1], 2).is_err());
        assert!(predictions_from_scores(&[0.9, 0.1, 0.3], 1).is_err());
    }

    #[test]
    fn test_empty_scores_for_empty_batch() {
        assert!(predictions_from_scores(&[], 0).unwrap().is_empty());
    }
}
