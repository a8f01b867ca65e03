use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

/// Domain interface for face localization.
///
/// Returns boxes in the detector's native order. An empty list is a normal
/// result, not an error.
pub trait FaceLocator {
    fn locate(&mut self, frame: &Frame) -> Result<Vec<FaceBox>, Box<dyn std::error::Error>>;
}

/// Values per SSD detection row: `(image_id, class_id, confidence, x1, y1, x2, y2)`.
pub const SSD_ROW_LEN: usize = 7;

/// Decodes flattened SSD output rows into clamped pixel boxes.
///
/// Keeps a row only when its confidence is strictly greater than
/// `confidence`. A trailing partial row is ignored.
pub fn decode_ssd_rows(
    rows: &[f32],
    frame_width: u32,
    frame_height: u32,
    confidence: f32,
) -> Vec<FaceBox> {
    rows.chunks_exact(SSD_ROW_LEN)
        .filter(|row| row[2] > confidence)
        .map(|row| FaceBox::from_normalized([row[3], row[4], row[5], row[6]], frame_width, frame_height))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(conf: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> [f32; SSD_ROW_LEN] {
        [0.0, 1.0, conf, x1, y1, x2, y2]
    }

    fn flatten(rows: &[[f32; SSD_ROW_LEN]]) -> Vec<f32> {
        rows.iter().flatten().copied().collect()
    }

    #[test]
    fn test_no_rows_yields_no_boxes() {
        assert!(decode_ssd_rows(&[], 800, 600, 0.5).is_empty());
    }

    #[test]
    fn test_all_below_threshold_yields_no_boxes() {
        let raw = flatten(&[row(0.1, 0.1, 0.1, 0.2, 0.2), row(0.3, 0.5, 0.5, 0.6, 0.6)]);
        assert!(decode_ssd_rows(&raw, 800, 600, 0.5).is_empty());
    }

    #[test]
    fn test_threshold_is_strict() {
        let raw = flatten(&[
            row(0.5, 0.1, 0.1, 0.2, 0.2),
            row(0.50001, 0.3, 0.3, 0.4, 0.4),
        ]);
        let boxes = decode_ssd_rows(&raw, 800, 600, 0.5);
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0], FaceBox::new(240, 180, 320, 240));
    }

    #[test]
    fn test_preserves_native_order() {
        let raw = flatten(&[
            row(0.7, 0.5, 0.5, 0.6, 0.6),
            row(0.99, 0.0, 0.0, 0.1, 0.1),
        ]);
        let boxes = decode_ssd_rows(&raw, 100, 100, 0.5);
        assert_eq!(boxes, vec![FaceBox::new(50, 50, 60, 60), FaceBox::new(0, 0, 10, 10)]);
    }

    #[test]
    fn test_out_of_bounds_row_is_clamped() {
        let raw = flatten(&[row(0.9, -0.1, -0.2, 1.2, 1.5)]);
        let boxes = decode_ssd_rows(&raw, 800, 600, 0.5);
        assert_eq!(boxes, vec![FaceBox::new(0, 0, 799, 599)]);
    }

    #[test]
    fn test_partial_trailing_row_is_ignored() {
        let mut raw = flatten(&[row(0.9, 0.1, 0.1, 0.2, 0.2)]);
        raw.extend_from_slice(&[0.0, 1.0, 0.99]);
        assert_eq!(decode_ssd_rows(&raw, 100, 100, 0.5).len(), 1);
    }
}
