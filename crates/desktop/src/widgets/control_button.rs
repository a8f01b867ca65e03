use std::time::Duration;

use iced::border::Border;
use iced::widget::{button, container, mouse_area, text};
use iced::{Color, Element, Padding, Shadow, Theme, Vector};
use iced_anim::transition::Easing;
use iced_anim::AnimationBuilder;

const CORNER_RADIUS: f32 = 8.0;
const LIFT: f32 = 1.0;
const HOVER_DARKEN: f32 = 0.06;
const SHADOW_ALPHA: f32 = 0.30;
const SHADOW_BLUR_BASE: f32 = 6.0;
const SHADOW_BLUR_HOVER: f32 = 12.0;
const DISABLED_ALPHA: f32 = 0.35;
const ANIMATION_DURATION: Duration = Duration::from_millis(150);

/// Which palette color a control is painted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Primary,
    Danger,
    Neutral,
}

/// Animated push button for the start/stop/quit row.
///
/// `on_press: None` renders the button disabled and ignores hover.
pub fn control_button<'a, Message: Clone + 'a>(
    label: &'a str,
    tone: Tone,
    on_press: Option<Message>,
    hovered: bool,
    on_hover: impl Fn(bool) -> Message + 'a,
) -> Element<'a, Message> {
    let enabled = on_press.is_some();
    let target = if hovered && enabled { 1.0_f32 } else { 0.0 };

    let animated: Element<'a, Message> = AnimationBuilder::new(target, move |t: f32| {
        build_button(label, tone, on_press.clone(), t.clamp(0.0, 1.0))
    })
    .animates_layout(true)
    .animation(Easing::EASE_OUT.with_duration(ANIMATION_DURATION))
    .into();

    mouse_area(animated)
        .on_enter(on_hover(true))
        .on_exit(on_hover(false))
        .into()
}

fn build_button<'a, Message: Clone + 'a>(
    label: &'a str,
    tone: Tone,
    on_press: Option<Message>,
    hover_amount: f32,
) -> Element<'a, Message> {
    let btn = button(text(label).size(14))
        .on_press_maybe(on_press)
        .padding([8, 22])
        .style(move |theme: &Theme, status: button::Status| {
            let base = tone_color(theme, tone);
            match status {
                button::Status::Disabled => disabled_style(base),
                button::Status::Pressed => styled(base, 1.0),
                _ => styled(base, hover_amount),
            }
        });

    let rise = hover_amount * LIFT;
    container(btn)
        .padding(Padding {
            top: LIFT - rise,
            bottom: rise,
            ..Padding::ZERO
        })
        .into()
}

fn tone_color(theme: &Theme, tone: Tone) -> Color {
    let palette = theme.extended_palette();
    match tone {
        Tone::Primary => palette.primary.base.color,
        Tone::Danger => palette.danger.base.color,
        Tone::Neutral => palette.secondary.base.color,
    }
}

fn styled(base: Color, hover_amount: f32) -> button::Style {
    button::Style {
        background: Some(darken(base, HOVER_DARKEN * hover_amount).into()),
        text_color: Color::WHITE,
        border: Border {
            radius: CORNER_RADIUS.into(),
            ..Border::default()
        },
        shadow: Shadow {
            color: Color {
                a: SHADOW_ALPHA * hover_amount,
                ..base
            },
            offset: Vector::new(0.0, 2.0),
            blur_radius: SHADOW_BLUR_BASE + (SHADOW_BLUR_HOVER - SHADOW_BLUR_BASE) * hover_amount,
        },
        ..button::Style::default()
    }
}

fn disabled_style(base: Color) -> button::Style {
    button::Style {
        background: Some(Color { a: DISABLED_ALPHA, ..base }.into()),
        text_color: Color {
            a: 0.6,
            ..Color::WHITE
        },
        border: Border {
            radius: CORNER_RADIUS.into(),
            ..Border::default()
        },
        ..button::Style::default()
    }
}

fn darken(color: Color, shift: f32) -> Color {
    Color {
        r: (color.r - shift).max(0.0),
        g: (color.g - shift).max(0.0),
        b: (color.b - shift).max(0.0),
        a: color.a,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_darken_clamps_at_zero() {
        let c = darken(Color::from_rgb(0.02, 0.5, 1.0), 0.06);
        assert_relative_eq!(c.r, 0.0);
        assert_relative_eq!(c.g, 0.44, epsilon = 1e-6);
        assert_relative_eq!(c.b, 0.94, epsilon = 1e-6);
    }

    #[test]
    fn test_resting_style_has_no_shadow() {
        let style = styled(Color::from_rgb(0.2, 0.6, 0.4), 0.0);
        assert_relative_eq!(style.shadow.color.a, 0.0);
        assert_relative_eq!(style.shadow.blur_radius, SHADOW_BLUR_BASE);
    }

    #[test]
    fn test_disabled_style_is_translucent() {
        let style = disabled_style(Color::from_rgb(0.2, 0.6, 0.4));
        match style.background {
            Some(iced::Background::Color(c)) => assert_relative_eq!(c.a, DISABLED_ALPHA),
            other => panic!("unexpected background {other:?}"),
        }
    }
}
