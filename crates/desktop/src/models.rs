use maskwatch_core::classification::infrastructure::onnx_mask_classifier::OnnxMaskClassifier;
use maskwatch_core::detection::infrastructure::onnx_ssd_locator::OnnxSsdFaceLocator;
use maskwatch_core::pipeline::detect_masks_use_case::DetectMasksUseCase;
use maskwatch_core::pipeline::pipeline_logger::LogPipelineLogger;
use maskwatch_core::shared::onnx_session::ModelLoadError;

use crate::settings::Settings;

/// Loads both networks and wires them into the detection pipeline.
pub fn load_pipeline(settings: &Settings) -> Result<DetectMasksUseCase, ModelLoadError> {
    log::info!(
        "Loading models: detector={}, classifier={}",
        settings.face_detector_model.display(),
        settings.mask_classifier_model.display()
    );
    let locator = OnnxSsdFaceLocator::new(&settings.face_detector_model, settings.face_confidence)?;
    let classifier = OnnxMaskClassifier::new(&settings.mask_classifier_model)?;
    Ok(DetectMasksUseCase::new(
        Box::new(locator),
        Box::new(classifier),
        Box::new(LogPipelineLogger::new()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_detector_is_reported_first() {
        let settings = Settings {
            face_detector_model: PathBuf::from("missing/detector.onnx"),
            mask_classifier_model: PathBuf::from("missing/classifier.onnx"),
            ..Settings::default()
        };
        let err = load_pipeline(&settings).err().unwrap();
        assert_eq!(err.to_string(), "model file not found: missing/detector.onnx");
    }
}
