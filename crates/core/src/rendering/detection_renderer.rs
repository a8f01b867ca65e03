use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;
use crate::shared::prediction::{Detection, Prediction};

use super::annotated_frame::{AnnotatedFrame, Label, MASK_COLOR, NO_MASK_COLOR};

/// Rectangle stroke width in pixels.
const BOX_THICKNESS: i32 = 2;

/// Vertical gap between a label's baseline and the top of its box.
const LABEL_OFFSET: i32 = 10;

/// Draws every detection onto a copy of `frame`.
///
/// The input frame is left untouched.
pub fn render(frame: &Frame, detections: &[Detection]) -> AnnotatedFrame {
    let mut image = frame.to_rgba_image();
    let mut labels = Vec::with_capacity(detections.len());

    for detection in detections {
        let color = label_color(&detection.prediction);
        draw_box(&mut image, &detection.face_box, color);
        labels.push(Label {
            text: label_text(&detection.prediction),
            x: detection.face_box.start_x,
            y: (detection.face_box.start_y - LABEL_OFFSET).max(0),
            color,
        });
    }

    AnnotatedFrame { image, labels }
}

/// `"Mask: 90.0%"` / `"No Mask: 75.3%"`; ties read as no mask.
pub fn label_text(prediction: &Prediction) -> String {
    let name = if prediction.is_mask() { "Mask" } else { "No Mask" };
    format!("{name}: {:.1}%", prediction.confidence() * 100.0)
}

pub fn label_color(prediction: &Prediction) -> [u8; 3] {
    if prediction.is_mask() {
        MASK_COLOR
    } else {
        NO_MASK_COLOR
    }
}

/// Inclusive-corner rectangle, stroked inward from the box edge.
fn draw_box(image: &mut RgbaImage, face_box: &FaceBox, color: [u8; 3]) {
    let rgba = Rgba([color[0], color[1], color[2], 255]);
    for inset in 0..BOX_THICKNESS {
        let w = face_box.width() + 1 - 2 * inset;
        let h = face_box.height() + 1 - 2 * inset;
        if w <= 0 || h <= 0 {
            break;
        }
        let rect = Rect::at(face_box.start_x + inset, face_box.start_y + inset)
            .of_size(w as u32, h as u32);
        draw_hollow_rect_mut(image, rect, rgba);
    }
}
