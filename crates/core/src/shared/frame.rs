use image::imageops::FilterType;
use image::{ImageBuffer, Rgb, RgbImage, RgbaImage};
use ndarray::ArrayView3;

use crate::shared::face_box::FaceBox;

/// A single captured frame: contiguous RGB bytes in row-major order.
///
/// Channel-order conversion happens at the capture boundary; everything
/// downstream sees RGB.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    index: usize,
}

pub const CHANNELS: usize = 3;

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * CHANNELS,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
            index,
        }
    }

    pub fn from_rgb_image(image: RgbImage, index: usize) -> Self {
        let (width, height) = image.dimensions();
        Self::new(image.into_raw(), width, height, index)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(
            (self.height as usize, self.width as usize, CHANNELS),
            &self.data,
        )
        .expect("Frame data length must match dimensions")
    }

    /// Owned copy as an `image` buffer, for resampling.
    pub fn to_rgb_image(&self) -> RgbImage {
        ImageBuffer::<Rgb<u8>, Vec<u8>>::from_raw(self.width, self.height, self.data.clone())
            .expect("Frame data length must match dimensions")
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut rgba = Vec::with_capacity(self.data.len() / CHANNELS * 4);
        for px in self.data.chunks_exact(CHANNELS) {
            rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }
        ImageBuffer::from_raw(self.width, self.height, rgba)
            .expect("Frame data length must match dimensions")
    }

    /// Scales the frame to `target_width`, keeping the aspect ratio.
    ///
    /// Returns a clone when the frame already has that width.
    pub fn resize_to_width(&self, target_width: u32) -> Frame {
        if target_width == 0 || self.width == target_width || self.width == 0 {
            return self.clone();
        }
        let ratio = target_width as f64 / self.width as f64;
        let target_height = ((self.height as f64 * ratio) as u32).max(1);
        let resized = image::imageops::resize(
            &self.to_rgb_image(),
            target_width,
            target_height,
            FilterType::Triangle,
        );
        Frame::from_rgb_image(resized, self.index)
    }

    /// Copies the pixels inside `face_box` (end-exclusive, like a slice).
    ///
    /// Returns `None` when the box covers no pixels.
    pub fn crop(&self, face_box: &FaceBox) -> Option<Frame> {
        let x1 = face_box.start_x.max(0) as usize;
        let y1 = face_box.start_y.max(0) as usize;
        let x2 = (face_box.end_x.max(0) as usize).min(self.width as usize);
        let y2 = (face_box.end_y.max(0) as usize).min(self.height as usize);
        if x2 <= x1 || y2 <= y1 {
            return None;
        }

        let row_stride = self.width as usize * CHANNELS;
        let mut data = Vec::with_capacity((x2 - x1) * (y2 - y1) * CHANNELS);
        for row in y1..y2 {
            let start = row * row_stride + x1 * CHANNELS;
            let end = row * row_stride + x2 * CHANNELS;
            data.extend_from_slice(&self.data[start..end]);
        }
        Some(Frame::new(
            data,
            (x2 - x1) as u32,
            (y2 - y1) as u32,
            self.index,
        ))
    }
}
