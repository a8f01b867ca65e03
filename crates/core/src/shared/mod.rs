pub mod constants;
pub mod face_box;
pub mod frame;
pub mod onnx_session;
pub mod prediction;
