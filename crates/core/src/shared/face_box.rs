/// A face region in pixel coordinates, clamped to the frame it came from.
///
/// `end_x`/`end_y` are at most `width - 1`/`height - 1`, so cropping with
/// them as exclusive bounds drops the last row and column, matching the
/// detector's reference behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceBox {
    pub start_x: i32,
    pub start_y: i32,
    pub end_x: i32,
    pub end_y: i32,
}

impl FaceBox {
    pub fn new(start_x: i32, start_y: i32, end_x: i32, end_y: i32) -> Self {
        Self {
            start_x,
            start_y,
            end_x,
            end_y,
        }
    }

    /// Scales normalized `[x1, y1, x2, y2]` to pixels and clamps to the frame.
    ///
    /// Coordinates are truncated toward zero before clamping.
    pub fn from_normalized(coords: [f32; 4], frame_width: u32, frame_height: u32) -> Self {
        let w = frame_width as f32;
        let h = frame_height as f32;
        let max_x = frame_width.saturating_sub(1) as i32;
        let max_y = frame_height.saturating_sub(1) as i32;

        let start_x = ((coords[0] * w) as i32).clamp(0, max_x);
        let start_y = ((coords[1] * h) as i32).clamp(0, max_y);
        let end_x = ((coords[2] * w) as i32).clamp(0, max_x);
        let end_y = ((coords[3] * h) as i32).clamp(0, max_y);

        Self {
            start_x,
            start_y,
            end_x,
            end_y,
        }
    }

    pub fn width(&self) -> i32 {
        (self.end_x - self.start_x).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.end_y - self.start_y).max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}
