use ratatui::style::Color;

use crate::model::{Priority, Status, Tag};
use crate::ops::dates::DueUrgency;

/// Config keys of the built-in themes, in picker order
pub const THEME_NAMES: [&str; 5] = ["purple", "ocean", "forest", "sunset", "mono"];

/// Default theme key
pub const DEFAULT_THEME: &str = "purple";

/// Color palette for the TUI. Selecting a theme replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Config key, e.g. `ocean`
    pub key: &'static str,
    /// Display name, e.g. `Ocean`
    pub name: &'static str,
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub danger: Color,
    pub info: Color,
    pub muted: Color,
    pub background: Color,
    pub surface: Color,
    pub border: Color,
    pub foreground: Color,
}

const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            key: "purple",
            name: "Purple",
            primary: rgb(0x8B5CF6),
            secondary: rgb(0x10B981),
            accent: rgb(0xF59E0B),
            danger: rgb(0xEF4444),
            info: rgb(0x3B82F6),
            muted: rgb(0x9CA3AF),
            background: rgb(0x111827),
            surface: rgb(0x1F2937),
            border: rgb(0x374151),
            foreground: rgb(0xF9FAFB),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Look up a built-in theme by its config key (case-insensitive)
    pub fn named(key: &str) -> Option<Theme> {
        let base = Theme::default();
        let theme = match key.trim().to_ascii_lowercase().as_str() {
            "purple" => base,
            "ocean" => Theme {
                key: "ocean",
                name: "Ocean",
                primary: rgb(0x0EA5E9),
                secondary: rgb(0x14B8A6),
                accent: rgb(0xFBBF24),
                info: rgb(0x38BDF8),
                background: rgb(0x0B1220),
                surface: rgb(0x13203A),
                border: rgb(0x1E3A5F),
                ..base
            },
            "forest" => Theme {
                key: "forest",
                name: "Forest",
                primary: rgb(0x22C55E),
                secondary: rgb(0x84CC16),
                accent: rgb(0xEAB308),
                info: rgb(0x2DD4BF),
                background: rgb(0x0C1A12),
                surface: rgb(0x14281C),
                border: rgb(0x1F3D2B),
                ..base
            },
            "sunset" => Theme {
                key: "sunset",
                name: "Sunset",
                primary: rgb(0xF97316),
                secondary: rgb(0xF472B6),
                accent: rgb(0xFACC15),
                danger: rgb(0xDC2626),
                info: rgb(0xFB923C),
                background: rgb(0x1C1017),
                surface: rgb(0x2A1820),
                border: rgb(0x4A2432),
                ..base
            },
            "mono" => Theme {
                key: "mono",
                name: "Mono",
                primary: rgb(0xE5E7EB),
                secondary: rgb(0xD1D5DB),
                accent: rgb(0xFFFFFF),
                danger: rgb(0xF87171),
                info: rgb(0xD1D5DB),
                muted: rgb(0x6B7280),
                background: rgb(0x000000),
                surface: rgb(0x1F1F1F),
                border: rgb(0x3F3F46),
                foreground: rgb(0xFAFAFA),
                ..base
            },
            _ => return None,
        };
        Some(theme)
    }

    /// The configured theme, falling back to the default for unknown names
    pub fn from_config(name: &str) -> Theme {
        Theme::named(name).unwrap_or_else(|| {
            tracing::warn!(theme = name, "unknown theme, using default");
            Theme::default()
        })
    }

    pub fn status_color(&self, status: Status) -> Color {
        match status {
            Status::Todo => self.muted,
            Status::Doing => self.info,
            Status::Done => self.secondary,
        }
    }

    pub fn priority_color(&self, priority: Priority) -> Color {
        match priority {
            Priority::None | Priority::Low => self.muted,
            Priority::Medium => self.accent,
            Priority::High => self.danger,
        }
    }

    pub fn due_color(&self, urgency: DueUrgency) -> Color {
        match urgency {
            DueUrgency::Overdue => self.danger,
            DueUrgency::Today => self.accent,
            DueUrgency::Later => self.muted,
        }
    }

    /// Get the color for a tag, falling back to the primary color
    pub fn tag_color(&self, tag: &Tag) -> Color {
        parse_hex_color(&tag.color).unwrap_or(self.primary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            parse_hex_color("#FF4444"),
            Some(Color::Rgb(0xFF, 0x44, 0x44))
        );
        assert_eq!(parse_hex_color("FF4444"), None); // missing #
        assert_eq!(parse_hex_color("#FF44"), None); // too short
        assert_eq!(parse_hex_color("#ZZZZZZ"), None); // invalid hex
    }

    #[test]
    fn test_every_listed_theme_resolves() {
        for key in THEME_NAMES {
            let theme = Theme::named(key).unwrap();
            assert_eq!(theme.key, key);
        }
        assert_eq!(Theme::named("OCEAN").unwrap().name, "Ocean");
        assert!(Theme::named("neon").is_none());
    }

    #[test]
    fn test_from_config_falls_back_to_default() {
        assert_eq!(Theme::from_config("neon"), Theme::default());
        assert_eq!(Theme::from_config(DEFAULT_THEME).primary, rgb(0x8B5CF6));
    }

    #[test]
    fn test_tag_color_fallback() {
        let theme = Theme::default();
        let mut tag = Tag {
            id: 1,
            name: "work".into(),
            color: "#112233".into(),
        };
        assert_eq!(theme.tag_color(&tag), Color::Rgb(0x11, 0x22, 0x33));
        tag.color = "blue".into();
        assert_eq!(theme.tag_color(&tag), theme.primary);
    }

    #[test]
    fn test_status_color() {
        let theme = Theme::default();
        assert_eq!(theme.status_color(Status::Doing), theme.info);
        assert_eq!(theme.status_color(Status::Done), theme.secondary);
        assert_eq!(theme.priority_color(Priority::High), theme.danger);
    }
}
