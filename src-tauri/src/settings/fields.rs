//! Typed settings fields and the small value types they carry.

use serde::{Deserialize, Serialize};

/// Every observable settings field. Subscribers register for the fields
/// they render from and are notified with the field that changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ChatUrl,
    AlertsUrl,
    ChatBackgroundOpacity,
    ContentOpacity,
    AlertsBackgroundOpacity,
    MinimalStyle,
    TextSize,
    FontFamily,
    AlertKeywords,
    HighlightColor,
    HotkeyKeyCode,
    HotkeyModifiers,
    ClickThrough,
    ChatWindowGeometry,
    AlertsWindowGeometry,
}

impl Field {
    /// Store key for scalar fields. Geometry fields persist as four keys
    /// (see [`WindowId::geometry_keys`]) and click-through is never
    /// persisted, so those return `None`.
    pub fn key(self) -> Option<&'static str> {
        match self {
            Field::ChatUrl => Some("CHAT_URL"),
            Field::AlertsUrl => Some("ALERTS_URL"),
            Field::ChatBackgroundOpacity => Some("CHAT_BACKGROUND_OPACITY"),
            Field::ContentOpacity => Some("CONTENT_OPACITY"),
            Field::AlertsBackgroundOpacity => Some("ALERTS_BACKGROUND_OPACITY"),
            Field::MinimalStyle => Some("MINIMAL_STYLE"),
            Field::TextSize => Some("TEXT_SIZE"),
            Field::FontFamily => Some("FONT_FAMILY"),
            Field::AlertKeywords => Some("ALERT_KEYWORDS"),
            Field::HighlightColor => Some("HIGHLIGHT_COLOR"),
            Field::HotkeyKeyCode => Some("HOTKEY_KEY_CODE"),
            Field::HotkeyModifiers => Some("HOTKEY_MODIFIERS"),
            Field::ClickThrough
            | Field::ChatWindowGeometry
            | Field::AlertsWindowGeometry => None,
        }
    }

    /// Resolve a store key back to its field (settings-panel write path).
    pub fn from_key(key: &str) -> Option<Field> {
        const SCALAR_FIELDS: &[Field] = &[
            Field::ChatUrl,
            Field::AlertsUrl,
            Field::ChatBackgroundOpacity,
            Field::ContentOpacity,
            Field::AlertsBackgroundOpacity,
            Field::MinimalStyle,
            Field::TextSize,
            Field::FontFamily,
            Field::AlertKeywords,
            Field::HighlightColor,
            Field::HotkeyKeyCode,
            Field::HotkeyModifiers,
        ];
        SCALAR_FIELDS.iter().copied().find(|f| f.key() == Some(key))
    }
}

/// Chat text size presets, persisted as lowercase names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl TextSize {
    /// Parse a persisted value; anything unrecognized falls back to medium.
    pub fn from_raw(raw: &str) -> TextSize {
        match raw {
            "small" => TextSize::Small,
            "large" => TextSize::Large,
            _ => TextSize::Medium,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TextSize::Small => "small",
            TextSize::Medium => "medium",
            TextSize::Large => "large",
        }
    }

    /// Point size used by the injected minimal style.
    pub fn font_size(self) -> u32 {
        match self {
            TextSize::Small => 12,
            TextSize::Medium => 16,
            TextSize::Large => 20,
        }
    }
}

/// The two overlay windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowId {
    Chat,
    Alerts,
}

impl WindowId {
    pub fn label(self) -> &'static str {
        match self {
            WindowId::Chat => "chat",
            WindowId::Alerts => "alerts",
        }
    }

    pub fn from_label(label: &str) -> Option<WindowId> {
        match label {
            "chat" => Some(WindowId::Chat),
            "alerts" => Some(WindowId::Alerts),
            _ => None,
        }
    }

    /// Store keys for the persisted geometry: x, y, width, height.
    pub fn geometry_keys(self) -> [&'static str; 4] {
        match self {
            WindowId::Chat => [
                "CHAT_WINDOW_X",
                "CHAT_WINDOW_Y",
                "CHAT_WINDOW_WIDTH",
                "CHAT_WINDOW_HEIGHT",
            ],
            WindowId::Alerts => [
                "ALERTS_WINDOW_X",
                "ALERTS_WINDOW_Y",
                "ALERTS_WINDOW_WIDTH",
                "ALERTS_WINDOW_HEIGHT",
            ],
        }
    }

    pub fn geometry_field(self) -> Field {
        match self {
            WindowId::Chat => Field::ChatWindowGeometry,
            WindowId::Alerts => Field::AlertsWindowGeometry,
        }
    }
}

/// A window rectangle in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Global hotkey binding as persisted: a platform virtual key code plus a
/// modifier bitmask (see the constants in `hotkey`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotkeyBinding {
    pub key_code: u32,
    pub modifiers: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_keys_round_trip_through_from_key() {
        for field in [
            Field::ChatUrl,
            Field::AlertsUrl,
            Field::ChatBackgroundOpacity,
            Field::ContentOpacity,
            Field::AlertsBackgroundOpacity,
            Field::MinimalStyle,
            Field::TextSize,
            Field::FontFamily,
            Field::AlertKeywords,
            Field::HighlightColor,
            Field::HotkeyKeyCode,
            Field::HotkeyModifiers,
        ] {
            let key = field.key().unwrap();
            assert_eq!(Field::from_key(key), Some(field));
        }
    }

    #[test]
    fn click_through_and_geometry_have_no_scalar_key() {
        assert_eq!(Field::ClickThrough.key(), None);
        assert_eq!(Field::ChatWindowGeometry.key(), None);
        assert_eq!(Field::from_key("CLICK_THROUGH"), None);
    }

    #[test]
    fn text_size_falls_back_to_medium() {
        assert_eq!(TextSize::from_raw("small"), TextSize::Small);
        assert_eq!(TextSize::from_raw("large"), TextSize::Large);
        assert_eq!(TextSize::from_raw("gigantic"), TextSize::Medium);
        assert_eq!(TextSize::from_raw(""), TextSize::Medium);
    }

    #[test]
    fn text_size_maps_to_fixed_point_sizes() {
        assert_eq!(TextSize::Small.font_size(), 12);
        assert_eq!(TextSize::Medium.font_size(), 16);
        assert_eq!(TextSize::Large.font_size(), 20);
    }
}
