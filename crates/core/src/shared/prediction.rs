use crate::shared::face_box::FaceBox;

/// Classifier scores for one face: `(mask, no_mask)`, softmax outputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Prediction {
    pub mask: f32,
    pub no_mask: f32,
}

impl Prediction {
    pub fn new(mask: f32, no_mask: f32) -> Self {
        Self { mask, no_mask }
    }

    /// Strict comparison: a tie counts as no mask.
    pub fn is_mask(&self) -> bool {
        self.mask > self.no_mask
    }

    pub fn confidence(&self) -> f32 {
        self.mask.max(self.no_mask)
    }
}

/// A located face paired with its classification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    pub face_box: FaceBox,
    pub prediction: Prediction,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case::mask(0.9, 0.1, true)]
    #[case::no_mask(0.2, 0.8, false)]
    #[case::tie(0.5, 0.5, false)]
    fn test_is_mask(#[case] mask: f32, #[case] no_mask: f32, #[case] expected: bool) {
        assert_eq!(Prediction::new(mask, no_mask).is_mask(), expected);
    }

    #[test]
    fn test_confidence_is_max_score() {
        assert_relative_eq!(Prediction::new(0.3, 0.7).confidence(), 0.7);
        assert_relative_eq!(Prediction::new(0.9, 0.1).confidence(), 0.9);
    }
}
