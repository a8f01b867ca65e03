pub mod annotated_frame;
pub mod detection_renderer;
