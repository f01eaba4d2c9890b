use iced::color;
use iced::theme::Palette;
use iced::{Color, Theme};

use crate::settings::Appearance;

pub fn resolve_theme(appearance: Appearance) -> Theme {
    let is_dark = match appearance {
        Appearance::Dark => true,
        Appearance::Light => false,
        Appearance::System => detect_system_dark_mode(),
    };

    let palette = if is_dark { dark_palette() } else { light_palette() };
    Theme::custom("Smile and Blink", palette)
}

/// Colour for the status line under the camera view.
pub fn status_color(theme: &Theme, is_error: bool) -> Color {
    let palette = theme.palette();
    if is_error {
        palette.danger
    } else {
        Color {
            a: 0.6,
            ..palette.text
        }
    }
}

// Primary follows the face box colour so buttons and overlays match.
fn dark_palette() -> Palette {
    Palette {
        background: color!(0x20, 0x1f, 0x24),
        text: color!(0xe6, 0xe4, 0xea),
        primary: color!(0xff, 0x57, 0x22),
        success: color!(0x4c, 0xaf, 0x50),
        warning: color!(0xff, 0xc1, 0x07),
        danger: color!(0xe9, 0x1e, 0x63),
    }
}

fn light_palette() -> Palette {
    Palette {
        background: color!(0xfa, 0xf8, 0xf6),
        text: color!(0x21, 0x1f, 0x1d),
        primary: color!(0xe6, 0x4a, 0x19),
        success: color!(0x38, 0x8e, 0x3c),
        warning: color!(0xf5, 0x7c, 0x00),
        danger: color!(0xc2, 0x18, 0x5b),
    }
}

fn detect_system_dark_mode() -> bool {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("defaults")
            .args(["read", "-g", "AppleInterfaceStyle"])
            .output()
            .map(|o| {
                String::from_utf8_lossy(&o.stdout)
                    .trim()
                    .eq_ignore_ascii_case("dark")
            })
            .unwrap_or(true)
    }
    #[cfg(not(target_os = "macos"))]
    {
        true
    }
}
