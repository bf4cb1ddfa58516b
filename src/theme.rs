//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes,
//! and `StyleMap` resolves role names to concrete styles.

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
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Cycle to the next variant: Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// Brand green used for the header and selection accents.
const AGRO_GREEN: Color = Color::Rgb(22, 163, 74);
const AGRO_GREEN_DARK: Color = Color::Rgb(21, 128, 61);
const URGENT_RED: Color = Color::Rgb(220, 38, 38);

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Header --
    pub header: Style,
    pub header_subtitle: Style,

    // -- Category bar --
    pub category_selected: Style,
    pub category_normal: Style,
    pub section_title: Style,

    // -- Cards --
    pub card_border: Style,
    pub card_selected: Style,
    pub card_title: Style,
    pub card_summary: Style,
    pub card_meta: Style,
    pub badge_category: Style,
    pub badge_urgent: Style,
    pub hero_border: Style,
    pub hero_title: Style,

    // -- View states --
    pub state_loading: Style,
    pub state_error: Style,
    pub state_empty: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub status_message: Style,
    pub help_heading: Style,
    pub help_key: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            header: Style::default()
                .bg(AGRO_GREEN_DARK)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            header_subtitle: Style::default().bg(AGRO_GREEN_DARK).fg(Color::Gray),

            category_selected: Style::default()
                .bg(AGRO_GREEN)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            category_normal: Style::default().fg(Color::Gray),
            section_title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            card_border: Style::default().fg(Color::DarkGray),
            card_selected: Style::default().fg(AGRO_GREEN),
            card_title: Style::default().add_modifier(Modifier::BOLD),
            card_summary: Style::default().fg(Color::Gray),
            card_meta: Style::default().fg(Color::DarkGray),
            badge_category: Style::default().fg(AGRO_GREEN).add_modifier(Modifier::BOLD),
            badge_urgent: Style::default()
                .bg(URGENT_RED)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            hero_border: Style::default().fg(Color::Yellow),
            hero_title: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),

            state_loading: Style::default().fg(Color::Cyan),
            state_error: Style::default().fg(Color::Red),
            state_empty: Style::default().fg(Color::DarkGray),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            status_message: Style::default().bg(Color::DarkGray).fg(Color::Yellow),
            help_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            help_key: Style::default().fg(Color::Yellow),
        }
    }

    /// Light palette, for light terminal backgrounds.
    fn light() -> Self {
        Self {
            header: Style::default()
                .bg(AGRO_GREEN)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            header_subtitle: Style::default().bg(AGRO_GREEN).fg(Color::White),

            category_selected: Style::default()
                .bg(AGRO_GREEN_DARK)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            category_normal: Style::default().fg(Color::Black),
            section_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            card_border: Style::default().fg(Color::Gray),
            card_selected: Style::default().fg(AGRO_GREEN_DARK),
            card_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            card_summary: Style::default().fg(Color::DarkGray),
            card_meta: Style::default().fg(Color::DarkGray),
            badge_category: Style::default()
                .fg(AGRO_GREEN_DARK)
                .add_modifier(Modifier::BOLD),
            badge_urgent: Style::default()
                .bg(URGENT_RED)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            hero_border: Style::default().fg(Color::Magenta),
            hero_title: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),

            state_loading: Style::default().fg(Color::Blue),
            state_error: Style::default().fg(Color::Red),
            state_empty: Style::default().fg(Color::DarkGray),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            status_message: Style::default().bg(Color::White).fg(Color::Magenta),
            help_heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            help_key: Style::default().fg(Color::Magenta),
        }
    }
}

// ============================================================================
// Style Map
// ============================================================================

/// String-keyed style lookup, built from a `ColorPalette`.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; 21] = [
    "header",
    "header_subtitle",
    "category_selected",
    "category_normal",
    "section_title",
    "card_border",
    "card_selected",
    "card_title",
    "card_summary",
    "card_meta",
    "badge_category",
    "badge_urgent",
    "hero_border",
    "hero_title",
    "state_loading",
    "state_error",
    "state_empty",
    "status_bar",
    "status_message",
    "help_heading",
    "help_key",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 21] = [
            p.header,
            p.header_subtitle,
            p.category_selected,
            p.category_normal,
            p.section_title,
            p.card_border,
            p.card_selected,
            p.card_title,
            p.card_summary,
            p.card_meta,
            p.badge_category,
            p.badge_urgent,
            p.hero_border,
            p.hero_title,
            p.state_loading,
            p.state_error,
            p.state_empty,
            p.status_bar,
            p.status_message,
            p.help_heading,
            p.help_key,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urgent_badge_is_red_in_both_variants() {
        for variant in [ThemeVariant::Dark, ThemeVariant::Light] {
            assert_eq!(variant.palette().badge_urgent.bg, Some(URGENT_RED));
        }
    }

    #[test]
    fn light_palette_differs_from_dark() {
        let dark = ThemeVariant::Dark.palette();
        let light = ThemeVariant::Light.palette();
        assert_ne!(dark.category_selected, light.category_selected);
        assert_ne!(dark.status_bar, light.status_bar);
    }

    #[test]
    fn variant_from_str_name() {
        assert_eq!(ThemeVariant::from_str_name("dark"), Some(ThemeVariant::Dark));
        assert_eq!(ThemeVariant::from_str_name("Light"), Some(ThemeVariant::Light));
        assert_eq!(ThemeVariant::from_str_name("neon"), None);
    }

    #[test]
    fn variant_cycles() {
        assert_eq!(ThemeVariant::Dark.next(), ThemeVariant::Light);
        assert_eq!(ThemeVariant::Light.next().next(), ThemeVariant::Light);
    }

    #[test]
    fn style_map_resolves_known_roles() {
        let palette = ThemeVariant::Dark.palette();
        let sm = StyleMap::from_palette(&palette);
        assert_eq!(sm.resolve("header"), palette.header);
        assert_eq!(sm.resolve("badge_urgent"), palette.badge_urgent);
        assert_eq!(sm.resolve("help_key"), palette.help_key);
    }

    #[test]
    fn style_map_returns_default_for_unknown() {
        let sm = StyleMap::from_palette(&ThemeVariant::Light.palette());
        assert_eq!(sm.resolve("nonexistent_role"), Style::default());
    }

    #[test]
    fn style_map_has_all_roles() {
        let sm = StyleMap::from_palette(&ThemeVariant::Dark.palette());
        assert_eq!(sm.map.len(), ROLE_NAMES.len());
        for name in ROLE_NAMES {
            assert!(sm.map.contains_key(name), "Role '{}' missing from StyleMap", name);
        }
    }
}
