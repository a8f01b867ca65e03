//! Live face-mask detection: camera capture, face localization, mask
//! classification and frame annotation.

pub mod capture;
pub mod classification;
pub mod detection;
pub mod pipeline;
pub mod rendering;
pub mod session;
pub mod shared;
