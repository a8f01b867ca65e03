/// MobileNetV2 mask/no-mask classifier using ONNX Runtime via `ort`.
///
/// Expects a Keras-exported model taking NHWC float32 input in [-1, 1] and
/// producing `[N, 2]` softmax scores ordered `(mask, no_mask)`.
use std::path::Path;

use image::imageops::FilterType;

use crate::classification::domain::mask_classifier::{predictions_from_scores, MaskClassifier};
use crate::shared::frame::{Frame, CHANNELS};
use crate::shared::onnx_session::{load_session, ModelLoadError};
use crate::shared::prediction::Prediction;

/// Classifier input resolution.
pub const INPUT_SIZE: u32 = 224;

const NORM_SCALE: f32 = 127.5;

pub struct OnnxMaskClassifier {
    session: ort::session::Session,
}

impl OnnxMaskClassifier {
    pub fn new(model_path: &Path) -> Result<Self, ModelLoadError> {
        let session = load_session(model_path)?;
        Ok(Self { session })
    }
}

impl MaskClassifier for OnnxMaskClassifier {
    fn classify(&mut self, faces: &[Frame]) -> Result<Vec<Prediction>, Box<dyn std::error::Error>> {
        if faces.is_empty() {
            return Ok(Vec::new());
        }

        let batch = preprocess_batch(faces, INPUT_SIZE);
        let input_value = ort::value::Tensor::from_array(batch)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("mask classifier produced no outputs".into());
        }

        let scores = outputs[0].try_extract_array::<f32>()?;
        let data = scores.as_slice().ok_or("cannot get classifier output slice")?;
        predictions_from_scores(data, faces.len())
    }
}

/// Resize every face to `size × size` and scale to [-1, 1], NHWC float32.
fn preprocess_batch(faces: &[Frame], size: u32) -> ndarray::Array4<f32> {
    let s = size as usize;
    let mut batch = ndarray::Array4::<f32>::zeros((faces.len(), s, s, CHANNELS));

    for (n, face) in faces.iter().enumerate() {
        let resized =
            image::imageops::resize(&face.to_rgb_image(), size, size, FilterType::Triangle);
        for (x, y, pixel) in resized.enumerate_pixels() {
            for (c, &value) in pixel.0.iter().enumerate() {
                batch[[n, y as usize, x as usize, c]] = value as f32 / NORM_SCALE - 1.0;
            }
        }
    }

    batch
}
