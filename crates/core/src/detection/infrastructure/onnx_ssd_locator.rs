/// Res10 SSD face detector using ONNX Runtime via `ort`.
///
/// The network was trained on mean-subtracted BGR input, so preprocessing
/// swaps channel order from the RGB frames the rest of the crate uses.
use std::path::Path;

use image::imageops::FilterType;

use crate::detection::domain::face_locator::{decode_ssd_rows, FaceLocator};
use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;
use crate::shared::onnx_session::{load_session, ModelLoadError};

/// Fallback input resolution when the model's input shape is dynamic.
pub const DEFAULT_INPUT_SIZE: u32 = 300;

/// Per-channel means in BGR order.
const MEAN_BGR: [f32; 3] = [104.0, 177.0, 123.0];

pub struct OnnxSsdFaceLocator {
    session: ort::session::Session,
    confidence: f32,
    input_size: u32,
}

impl OnnxSsdFaceLocator {
    /// The input resolution is read from the model's NCHW input shape,
    /// falling back to 300 when it is dynamic or unreadable.
    pub fn new(model_path: &Path, confidence: f32) -> Result<Self, ModelLoadError> {
        let session = load_session(model_path)?;
        let input_size = session
            .inputs()
            .first()
            .and_then(|input| {
                if let ort::value::ValueType::Tensor { ref shape, .. } = input.dtype() {
                    input_size_from_shape(shape)
                } else {
                    None
                }
            })
            .unwrap_or(DEFAULT_INPUT_SIZE);
        log::info!("Face detector input size: {input_size}x{input_size}");

        Ok(Self {
            session,
            confidence,
            input_size,
        })
    }
}

/// Height of an `[N, C, H, W]` shape; `None` for dynamic (negative) dims.
fn input_size_from_shape(shape: &[i64]) -> Option<u32> {
    match shape {
        [_, _, h, ..] if *h > 0 => u32::try_from(*h).ok(),
        _ => None,
    }
}

impl FaceLocator for OnnxSsdFaceLocator {
    fn locate(&mut self, frame: &Frame) -> Result<Vec<FaceBox>, Box<dyn std::error::Error>> {
        if frame.width() == 0 || frame.height() == 0 {
            return Ok(Vec::new());
        }

        let input_tensor = preprocess(frame, self.input_size);
        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("face detector produced no outputs".into());
        }

        // Output shape is [1, 1, N, 7].
        let detections = outputs[0].try_extract_array::<f32>()?;
        let shape = detections.shape();
        if shape.last() != Some(&7) {
            return Err(format!("unexpected face detector output shape: {shape:?}").into());
        }
        let rows = detections
            .as_slice()
            .ok_or("cannot get detector output slice")?;

        Ok(decode_ssd_rows(
            rows,
            frame.width(),
            frame.height(),
            self.confidence,
        ))
    }
}

/// Resize to `size × size`, swap to BGR and subtract channel means, NCHW float32.
fn preprocess(frame: &Frame, size: u32) -> ndarray::Array4<f32> {
    let resized = image::imageops::resize(&frame.to_rgb_image(), size, size, FilterType::Triangle);
    let s = size as usize;
    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, s, s));

    for (x, y, pixel) in resized.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let (x, y) = (x as usize, y as usize);
        tensor[[0, 0, y, x]] = b as f32 - MEAN_BGR[0];
        tensor[[0, 1, y, x]] = g as f32 - MEAN_BGR[1];
        tensor[[0, 2, y, x]] = r as f32 - MEAN_BGR[2];
    }

    tensor
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Frame {
        let data = rgb.repeat((width * height) as usize);
        Frame::new(data, width, height, 0)
    }

    #[test]
    fn test_preprocess_shape() {
        let tensor = preprocess(&solid(200, 100, [0, 0, 0]), DEFAULT_INPUT_SIZE);
        assert_eq!(tensor.shape(), &[1, 3, 300, 300]);
    }

    #[test]
    fn test_preprocess_swaps_to_bgr_and_subtracts_mean() {
        let tensor = preprocess(&solid(40, 30, [200, 150, 100]), 224);
        assert_relative_eq!(tensor[[0, 0, 10, 10]], 100.0 - 104.0);
        assert_relative_eq!(tensor[[0, 1, 10, 10]], 150.0 - 177.0);
        assert_relative_eq!(tensor[[0, 2, 10, 10]], 200.0 - 123.0);
    }

    #[test]
    fn test_preprocess_follows_requested_size() {
        let tensor = preprocess(&solid(200, 100, [0, 0, 0]), 224);
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);
    }

    #[rstest]
    #[case(&[1, 3, 300, 300], Some(300))]
    #[case(&[1, 3, 224, 224], Some(224))]
    #[case(&[-1, 3, -1, -1], None)]
    #[case(&[1, 3], None)]
    fn test_input_size_from_shape(#[case] shape: &[i64], #[case] expected: Option<u32>) {
        assert_eq!(input_size_from_shape(shape), expected);
    }

    #[test]
    fn test_missing_model_fails_to_load() {
        let result = OnnxSsdFaceLocator::new(Path::new("no/such/detector.onnx"), 0.5);
        assert!(matches!(result, Err(ModelLoadError::NotFound(_))));
    }
}
