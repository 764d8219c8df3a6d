//! All scalar setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

type DefTuple = (&'static str, &'static str, &'static str);

// Click-through and window geometries are intentionally absent: the former
// resets every launch, the latter signal "first use" by their absence.
const DEFS: &[DefTuple] = &[
    ("CHAT_URL", "", "Twitch popout chat URL (empty shows a placeholder)"),
    ("ALERTS_URL", "", "Alerts feed URL (empty shows a placeholder)"),
    ("CHAT_BACKGROUND_OPACITY", "0.5", "Chat window background opacity (0-1)"),
    ("CONTENT_OPACITY", "1.0", "Chat content opacity (0-1)"),
    ("ALERTS_BACKGROUND_OPACITY", "1.0", "Alerts window background opacity (0-1)"),
    ("MINIMAL_STYLE", "false", "Strip the hosted page down to bare chat messages"),
    ("TEXT_SIZE", "medium", "Chat text size: small, medium, or large"),
    ("FONT_FAMILY", "System", "Chat font family ('System' uses the platform font)"),
    ("ALERT_KEYWORDS", "[]", "JSON array of keywords that highlight a message"),
    ("HIGHLIGHT_COLOR", "#FFFF00", "Keyword highlight color as #RRGGBB"),
    ("HOTKEY_KEY_CODE", "10", "Click-through hotkey virtual key code"),
    ("HOTKEY_MODIFIERS", "2", "Click-through hotkey modifier mask"),
];

/// Scalar setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_scalar_field_has_a_definition() {
        use crate::settings::Field;
        for (key, def) in DEFAULT_SETTINGS.iter() {
            assert_eq!(def.key, *key);
            assert!(Field::from_key(key).is_some(), "orphan definition: {key}");
        }
        assert_eq!(DEFAULT_SETTINGS.len(), 12);
    }

    #[test]
    fn documented_defaults() {
        assert_eq!(get_default("HIGHLIGHT_COLOR"), Some("#FFFF00"));
        assert_eq!(get_default("TEXT_SIZE"), Some("medium"));
        assert_eq!(get_default("HOTKEY_KEY_CODE"), Some("10"));
        assert_eq!(get_default("CLICK_THROUGH"), None);
    }
}
