// Centralized theme for the study browser.
// Colors and styles live here so components never hard-code them.

use ratatui::style::{Color, Modifier, Style};

// =============================================================================
// COLOR PALETTE
// =============================================================================

/// App background
pub const BG_APP: Color = Color::Rgb(0, 0, 0);

/// Active tab background
pub const BG_TAB_ACTIVE: Color = Color::Rgb(28, 28, 32);

/// Keyboard or pointer hover highlight
pub const BG_HOVER: Color = Color::Rgb(40, 40, 48);

/// Grouping affordance once the hover timer fired
pub const BG_ARMED: Color = Color::Rgb(34, 52, 40);

pub const BG_STATUSBAR: Color = Color::Rgb(12, 12, 12);

pub const TEXT_PRIMARY: Color = Color::Rgb(220, 220, 220);
pub const TEXT_MUTED: Color = Color::Rgb(128, 128, 128);
pub const TEXT_DIM: Color = Color::Rgb(90, 90, 90);

/// Interactive elements, focus
pub const ACCENT_PRIMARY: Color = Color::Rgb(86, 156, 214);
pub const ACCENT_SUCCESS: Color = Color::Rgb(106, 153, 85);
pub const ACCENT_WARNING: Color = Color::Rgb(206, 145, 120);
pub const ACCENT_ERROR: Color = Color::Rgb(244, 112, 112);

/// Groups and group targets
pub const ACCENT_SPECIAL: Color = Color::Rgb(169, 154, 203);

pub const BORDER_INACTIVE: Color = Color::Rgb(60, 60, 60);

// -----------------------------------------------------------------------------
// Text Styles
// -----------------------------------------------------------------------------

pub fn text_primary() -> Style {
    Style::default().fg(TEXT_PRIMARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn text_dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn text_bold() -> Style {
    Style::default()
        .fg(TEXT_PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn border_inactive() -> Style {
    Style::default().fg(BORDER_INACTIVE)
}

// -----------------------------------------------------------------------------
// Status Styles
// -----------------------------------------------------------------------------

pub fn status_success() -> Style {
    Style::default().fg(ACCENT_SUCCESS)
}

pub fn status_warning() -> Style {
    Style::default().fg(ACCENT_WARNING)
}

pub fn status_error() -> Style {
    Style::default().fg(ACCENT_ERROR)
}

pub fn status_info() -> Style {
    Style::default().fg(ACCENT_PRIMARY)
}

// -----------------------------------------------------------------------------
// Tab Styles
// -----------------------------------------------------------------------------

pub fn tab_active() -> Style {
    Style::default()
        .fg(TEXT_PRIMARY)
        .bg(BG_TAB_ACTIVE)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn tab_group() -> Style {
    Style::default().fg(ACCENT_SPECIAL)
}

pub fn tab_sub() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn tab_drag_source() -> Style {
    Style::default()
        .fg(TEXT_DIM)
        .add_modifier(Modifier::DIM | Modifier::ITALIC)
}

pub fn tab_hover() -> Style {
    Style::default().fg(TEXT_PRIMARY).bg(BG_HOVER)
}

pub fn tab_armed() -> Style {
    Style::default()
        .fg(ACCENT_SUCCESS)
        .bg(BG_ARMED)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_selected() -> Style {
    Style::default()
        .fg(ACCENT_PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_target() -> Style {
    Style::default()
        .fg(ACCENT_SPECIAL)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}
