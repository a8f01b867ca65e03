use std::path::PathBuf;
use std::time::Duration;

use maskwatch_core::shared::constants::{
    DEFAULT_CAMERA_INDEX, DEFAULT_FACE_CONFIDENCE, DEFAULT_FRAME_WIDTH, DEFAULT_TICK_INTERVAL_MS,
    DEFAULT_WARMUP_MS, FACE_DETECTOR_MODEL_PATH, MASK_CLASSIFIER_MODEL_PATH,
};

/// Fixed startup configuration.
///
/// Built from the core constants; there is no settings file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub face_detector_model: PathBuf,
    pub mask_classifier_model: PathBuf,
    pub camera_index: u32,
    pub frame_width: u32,
    pub face_confidence: f32,
    pub warmup_ms: u64,
    pub tick_interval_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            face_detector_model: PathBuf::from(FACE_DETECTOR_MODEL_PATH),
            mask_classifier_model: PathBuf::from(MASK_CLASSIFIER_MODEL_PATH),
            camera_index: DEFAULT_CAMERA_INDEX,
            frame_width: DEFAULT_FRAME_WIDTH,
            face_confidence: DEFAULT_FACE_CONFIDENCE,
            warmup_ms: DEFAULT_WARMUP_MS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl Settings {
    pub fn warmup(&self) -> Duration {
        Duration::from_millis(self.warmup_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_match_reference_behavior() {
        let s = Settings::default();
        assert_eq!(s.camera_index, 0);
        assert_eq!(s.frame_width, 800);
        assert_relative_eq!(s.face_confidence, 0.5);
        assert_eq!(s.warmup(), Duration::from_secs(2));
        assert_eq!(s.tick_interval(), Duration::from_millis(10));
        assert_eq!(s.mask_classifier_model, PathBuf::from("mask_detector.onnx"));
        assert_eq!(
            s.face_detector_model,
            PathBuf::from("face_detector/res10_300x300_ssd_iter_140000.onnx")
        );
    }
}
