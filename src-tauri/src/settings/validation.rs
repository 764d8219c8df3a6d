//! Setting value validation for the generic (panel-driven) write path.

use regex::Regex;
use std::sync::LazyLock;

static RE_HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap());

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
///
/// Opacity values are only required to parse; out-of-range inputs are
/// accepted here and clamped by the service before storing.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "CHAT_BACKGROUND_OPACITY" | "CONTENT_OPACITY" | "ALERTS_BACKGROUND_OPACITY" => {
            value.parse::<f64>().map_err(|_| "must be a float")?;
        }
        "MINIMAL_STYLE" => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        "TEXT_SIZE" => {
            if !["small", "medium", "large"].contains(&value) {
                return Err("must be small, medium, or large".into());
            }
        }
        "HIGHLIGHT_COLOR" => {
            if !RE_HEX_COLOR.is_match(value) {
                return Err("must be a #RRGGBB color".into());
            }
        }
        "ALERT_KEYWORDS" => {
            serde_json::from_str::<Vec<String>>(value)
                .map_err(|_| "must be a JSON array of strings")?;
        }
        "HOTKEY_KEY_CODE" | "HOTKEY_MODIFIERS" => {
            value.parse::<u32>().map_err(|_| "must be an unsigned integer")?;
        }
        _ => {}
    }
    Ok(())
}

/// Check a color string against the persisted format.
pub fn is_valid_hex_color(value: &str) -> bool {
    RE_HEX_COLOR.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        assert!(validate_setting("HIGHLIGHT_COLOR", "#FFFF00").is_ok());
        assert!(validate_setting("HIGHLIGHT_COLOR", "#a1B2c3").is_ok());
        assert!(validate_setting("HIGHLIGHT_COLOR", "FFFF00").is_err());
        assert!(validate_setting("HIGHLIGHT_COLOR", "#FFF").is_err());
        assert!(validate_setting("HIGHLIGHT_COLOR", "#FFFF0040").is_err());
    }

    #[test]
    fn test_opacity_parses_but_is_not_range_checked() {
        assert!(validate_setting("CONTENT_OPACITY", "0.5").is_ok());
        // Out of range is accepted; the service clamps before storing.
        assert!(validate_setting("CONTENT_OPACITY", "1.5").is_ok());
        assert!(validate_setting("CONTENT_OPACITY", "opaque").is_err());
    }

    #[test]
    fn test_text_size() {
        assert!(validate_setting("TEXT_SIZE", "small").is_ok());
        assert!(validate_setting("TEXT_SIZE", "gigantic").is_err());
    }

    #[test]
    fn test_keywords_must_be_json_array() {
        assert!(validate_setting("ALERT_KEYWORDS", r#"["hello","raid"]"#).is_ok());
        assert!(validate_setting("ALERT_KEYWORDS", "[]").is_ok());
        assert!(validate_setting("ALERT_KEYWORDS", "hello").is_err());
    }

    #[test]
    fn test_unconstrained_keys_accept_anything() {
        assert!(validate_setting("CHAT_URL", "not a url").is_ok());
        assert!(validate_setting("FONT_FAMILY", "Menlo").is_ok());
    }
}
