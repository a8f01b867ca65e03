pub mod detect_masks_use_case;
pub mod pipeline_logger;
