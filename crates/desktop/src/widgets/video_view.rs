use iced::widget::canvas::{self, Canvas};
use iced::widget::{container, image, stack, text};
use iced::{
    mouse, Color, ContentFit, Element, Length, Point, Rectangle, Renderer, Size, Theme, Vector,
};

use maskwatch_core::rendering::annotated_frame::{AnnotatedFrame, Label};

use crate::theme::VIDEO_BACKGROUND;

/// Label glyph height in pixels.
const LABEL_SIZE: f32 = 15.0;

/// An annotated frame converted for display.
#[derive(Debug, Clone)]
pub struct DisplayFrame {
    handle: image::Handle,
    width: f32,
    height: f32,
    labels: Vec<Label>,
}

impl From<AnnotatedFrame> for DisplayFrame {
    fn from(frame: AnnotatedFrame) -> Self {
        let (width, height) = (frame.width(), frame.height());
        Self {
            handle: image::Handle::from_rgba(width, height, frame.image.into_raw()),
            width: width as f32,
            height: height as f32,
            labels: frame.labels,
        }
    }
}

/// The video panel: the current frame, shrunk to fit when the window is
/// smaller than it, with labels painted on top; or a placeholder when nothing
/// is being shown.
pub fn video_view<'a, Message: 'a>(
    frame: Option<&'a DisplayFrame>,
    placeholder: &'a str,
) -> Element<'a, Message> {
    let content: Element<'a, Message> = match frame {
        Some(frame) => {
            let width = Length::Fixed(frame.width);
            let height = Length::Fixed(frame.height);
            stack![
                image(frame.handle.clone())
                    .width(width)
                    .height(height)
                    .content_fit(ContentFit::Contain),
                Canvas::new(LabelOverlay {
                    labels: &frame.labels,
                    frame_size: Size::new(frame.width, frame.height),
                })
                .width(width)
                .height(height),
            ]
            .into()
        }
        None => text(placeholder).size(15).color(Color::WHITE).into(),
    };

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .style(|_theme: &Theme| container::Style {
            background: Some(VIDEO_BACKGROUND.into()),
            ..container::Style::default()
        })
        .into()
}

struct LabelOverlay<'a> {
    labels: &'a [Label],
    frame_size: Size,
}

/// Where a `Contain`-fitted image of `frame` lands inside `bounds`: uniform
/// scale plus the letterbox offset.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Fit {
    scale: f32,
    offset: Vector,
}

impl Fit {
    fn contain(frame: Size, bounds: Size) -> Self {
        if frame.width <= 0.0 || frame.height <= 0.0 {
            return Self {
                scale: 1.0,
                offset: Vector::ZERO,
            };
        }
        let scale = (bounds.width / frame.width).min(bounds.height / frame.height);
        Self {
            scale,
            offset: Vector::new(
                (bounds.width - frame.width * scale) / 2.0,
                (bounds.height - frame.height * scale) / 2.0,
            ),
        }
    }

    fn map(&self, p: Point) -> Point {
        Point::new(p.x * self.scale, p.y * self.scale) + self.offset
    }
}

impl<Message> canvas::Program<Message> for LabelOverlay<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let fit = Fit::contain(self.frame_size, bounds.size());
        for label in self.labels {
            let [r, g, b] = label.color;
            frame.fill_text(canvas::Text {
                content: label.text.clone(),
                position: fit.map(text_origin(label)),
                color: Color::from_rgb8(r, g, b),
                size: (LABEL_SIZE * fit.scale).into(),
                ..canvas::Text::default()
            });
        }
        vec![frame.into_geometry()]
    }
}

/// Canvas text is positioned by its top-left corner; labels carry a
/// baseline anchor.
fn text_origin(label: &Label) -> Point {
    Point::new(label.x as f32, (label.y as f32 - LABEL_SIZE).max(0.0))
}
