//! Color palette and style helpers
//!
//! A dark, low-glare palette readable from across a room. Tile surfaces
//! mirror the three background levels a TV focus engine uses: resting,
//! elevated and pressed.

use ratatui::style::{Color, Modifier, Style};

pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Page background: #101014
    pub const BACKGROUND: Color = Color::Rgb(0x10, 0x10, 0x14);

    /// Tile surface: #1e1e26
    pub const BACKGROUND_ELEVATED: Color = Color::Rgb(0x1e, 0x1e, 0x26);

    /// Focused / pressed tile surface: #2e2e3a
    pub const BACKGROUND_PRESS: Color = Color::Rgb(0x2e, 0x2e, 0x3a);

    /// Tint (Jellyfin blue): #00a4dc
    pub const TINT: Color = Color::Rgb(0x00, 0xa4, 0xdc);

    /// Accent (Jellyfin purple): #aa5cc3
    pub const ACCENT: Color = Color::Rgb(0xaa, 0x5c, 0xc3);

    /// Body text: #ececf1
    pub const TEXT: Color = Color::Rgb(0xec, 0xec, 0xf1);

    /// Secondary text: #9a9aa8
    pub const DIM: Color = Color::Rgb(0x9a, 0x9a, 0xa8);

    /// Tile border: #3a3a48
    pub const BORDER: Color = Color::Rgb(0x3a, 0x3a, 0x48);

    /// Inline errors: #f87171
    pub const ERROR: Color = Color::Rgb(0xf8, 0x71, 0x71);

    /// Success: #4ade80
    pub const SUCCESS: Color = Color::Rgb(0x4a, 0xde, 0x80);

    // ═══════════════════════════════════════════════════════════════════════
    // STYLES
    // ═══════════════════════════════════════════════════════════════════════

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND)
    }

    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn title() -> Style {
        Style::default().fg(Self::TEXT).add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::ERROR)
    }

    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS).add_modifier(Modifier::BOLD)
    }

    pub fn loading() -> Style {
        Style::default()
            .fg(Self::TINT)
            .add_modifier(Modifier::ITALIC)
    }

    /// Resting tile
    pub fn tile() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_ELEVATED)
    }

    /// Focused or pressed tile
    pub fn tile_focused() -> Style {
        Style::default()
            .fg(Self::TEXT)
            .bg(Self::BACKGROUND_PRESS)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::TINT)
    }

    /// Nav entry of the current route
    pub fn nav_active() -> Style {
        Style::default()
            .fg(Self::TEXT)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn nav_inactive() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn input() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_ELEVATED)
    }

    pub fn keybind() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::TINT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn progress_filled() -> Style {
        Style::default().fg(Self::TINT).bg(Self::TINT)
    }

    pub fn progress_remaining() -> Style {
        Style::default().fg(Self::BORDER).bg(Self::BORDER)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::DIM).bg(Self::BACKGROUND_ELEVATED)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// COLOR UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

/// Relative luminance, https://www.w3.org/TR/WCAG20/#relativeluminancedef
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    fn channel(c: u8) -> f64 {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * channel(r) + 0.7152 * channel(g) + 0.0722 * channel(b)
}

/// Contrast ratio between 1 (identical) and 21 (black on white)
pub fn contrast_ratio(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> f64 {
    let l1 = relative_luminance(fg.0, fg.1, fg.2);
    let l2 = relative_luminance(bg.0, bg.1, bg.2);
    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}

pub fn color_to_rgb(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Rgb(r, g, b) => Some((r, g, b)),
        _ => None,
    }
}
