pub const FACE_DETECTOR_MODEL_PATH: &str = "face_detector/res10_300x300_ssd_iter_140000.onnx";
pub const MASK_CLASSIFIER_MODEL_PATH: &str = "mask_detector.onnx";

/// Detections at or below this confidence are dropped.
pub const DEFAULT_FACE_CONFIDENCE: f32 = 0.5;

/// Frames are scaled to this width before detection and display.
pub const DEFAULT_FRAME_WIDTH: u32 = 800;

pub const DEFAULT_CAMERA_INDEX: u32 = 0;

/// Camera warm-up before the first tick.
pub const DEFAULT_WARMUP_MS: u64 = 2000;

/// Delay between the end of one tick and the start of the next.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 10;
