pub mod onnx_ssd_locator;
