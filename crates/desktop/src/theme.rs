use iced::color;
use iced::theme::Palette;
use iced::{Color, Theme};

pub fn app_theme() -> Theme {
    Theme::custom("Mask Detection", palette())
}

fn palette() -> Palette {
    Palette {
        background: color!(0x17, 0x19, 0x1c),
        text: color!(0xd8, 0xdb, 0xde),
        primary: color!(0x3f, 0xb9, 0x8e),
        success: color!(0x30, 0xd1, 0x58),
        warning: color!(0xff, 0xcc, 0x00),
        danger: color!(0xff, 0x45, 0x3a),
    }
}

/// Video panel backdrop, black like a monitor.
pub const VIDEO_BACKGROUND: Color = Color::BLACK;

/// Slightly lifted surface for the status bar.
pub fn surface_color(theme: &Theme) -> Color {
    let palette = theme.extended_palette();
    palette.background.weak.color
}

pub fn muted_color(theme: &Theme) -> Color {
    Color {
        a: 0.7,
        ..theme.palette().text
    }
}
