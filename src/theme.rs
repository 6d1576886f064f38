//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between the Dark, Light and High Contrast
//! palettes, and `StyleMap` resolves role names to concrete styles.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
    HighContrast,
}

impl ThemeVariant {
    /// Parse a variant name (case-insensitive, `-`/`_` interchangeable).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            "high-contrast" | "highcontrast" => Some(Self::HighContrast),
            _ => None,
        }
    }

    /// Build the `ColorPalette` for this variant.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
            Self::HighContrast => ColorPalette::high_contrast(),
        }
    }

    /// Cycle: Dark → Light → High Contrast → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::HighContrast,
            Self::HighContrast => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
            Self::HighContrast => "High Contrast",
        }
    }
}

// ============================================================================
// Color Palette — semantic roles to Style
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Post list --
    pub post_title: Style,
    pub post_selected: Style,
    pub post_byline: Style,

    // -- Rating control --
    pub rating_star: Style,
    pub rating_label: Style,

    // -- Detail --
    pub detail_heading: Style,
    pub detail_body: Style,
    pub detail_metadata: Style,
    pub detail_link: Style,

    // -- Load state --
    pub loading: Style,
    pub error: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            post_title: Style::default().add_modifier(Modifier::BOLD),
            post_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            post_byline: Style::default().fg(Color::Gray),

            rating_star: Style::default().fg(Color::Yellow),
            rating_label: Style::default(),

            detail_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            detail_body: Style::default(),
            detail_metadata: Style::default().fg(Color::DarkGray),
            detail_link: Style::default().fg(Color::Blue),

            loading: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
        }
    }

    fn light() -> Self {
        Self {
            post_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            post_selected: Style::default().bg(Color::Blue).fg(Color::White),
            post_byline: Style::default().fg(Color::DarkGray),

            rating_star: Style::default().fg(Color::Magenta),
            rating_label: Style::default().fg(Color::Black),

            detail_heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            detail_body: Style::default().fg(Color::Black),
            detail_metadata: Style::default().fg(Color::DarkGray),
            detail_link: Style::default().fg(Color::Blue),

            loading: Style::default().fg(Color::Magenta),
            error: Style::default().fg(Color::Red),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
        }
    }

    /// Pure black/white with bold and underline instead of hue for emphasis,
    /// so nothing depends on color perception alone.
    fn high_contrast() -> Self {
        let base = Style::default().fg(Color::White).bg(Color::Black);
        Self {
            post_title: base.add_modifier(Modifier::BOLD),
            post_selected: Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
            post_byline: base,

            rating_star: base.add_modifier(Modifier::BOLD),
            rating_label: base,

            detail_heading: base.add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            detail_body: base,
            detail_metadata: base,
            detail_link: base.add_modifier(Modifier::UNDERLINED),

            loading: base.add_modifier(Modifier::BOLD),
            error: base.add_modifier(Modifier::BOLD | Modifier::REVERSED),

            status_bar: Style::default().fg(Color::Black).bg(Color::White),
            panel_border: base,
            panel_border_focused: base.add_modifier(Modifier::BOLD),
        }
    }
}

// ============================================================================
// Style Map — string-keyed lookup
// ============================================================================

/// String-keyed style lookup, resolving role names (e.g. `"detail_heading"`)
/// to their concrete `Style` at runtime.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; 14] = [
    "post_title",
    "post_selected",
    "post_byline",
    "rating_star",
    "rating_label",
    "detail_heading",
    "detail_body",
    "detail_metadata",
    "detail_link",
    "loading",
    "error",
    "status_bar",
    "panel_border",
    "panel_border_focused",
];

impl StyleMap {
    /// Build a `StyleMap` from a `ColorPalette`.
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 14] = [
            p.post_title,
            p.post_selected,
            p.post_byline,
            p.rating_star,
            p.rating_label,
            p.detail_heading,
            p.detail_body,
            p.detail_metadata,
            p.detail_link,
            p.loading,
            p.error,
            p.status_bar,
            p.panel_border,
            p.panel_border_focused,
        ];

        let map = ROLE_NAMES.iter().copied().zip(styles).collect();
        Self { map }
    }

    /// Resolve a role name to its `Style`. Returns `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================
