use image::RgbaImage;

pub const MASK_COLOR: [u8; 3] = [0, 255, 0];
pub const NO_MASK_COLOR: [u8; 3] = [255, 0, 0];

/// Text to paint over the frame, anchored at its baseline-left corner.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub color: [u8; 3],
}

/// A display-ready copy of a frame with boxes drawn into the pixels.
///
/// Labels are kept as text so the display layer can paint them with its
/// own font at the exact pixel anchors.
#[derive(Clone, Debug)]
pub struct AnnotatedFrame {
    pub image: RgbaImage,
    pub labels: Vec<Label>,
}

impl AnnotatedFrame {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
