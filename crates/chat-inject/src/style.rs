//! Style-sheet builders: scrollbar hiding, opacity, minimal chat style.

use crate::js_template_escape;

/// JS that creates-or-replaces a `<style>` element with the given id and
/// fills it with `css`. Safe to evaluate repeatedly.
pub fn replace_style_js(id: &str, css: &str) -> String {
    let css = js_template_escape(css);
    format!(
        "var style = document.getElementById('{id}');\n\
         if (!style) {{\n\
             style = document.createElement('style');\n\
             style.id = '{id}';\n\
             document.head.appendChild(style);\n\
         }}\n\
         style.textContent = `{css}`;"
    )
}

/// CSS hiding every scrollbar and forcing a transparent page background.
pub fn scrollbar_hide_css() -> String {
    "::-webkit-scrollbar { display: none !important; width: 0 !important; height: 0 !important; }\n\
     * { scrollbar-width: none !important; -ms-overflow-style: none !important; }\n\
     html, body { overflow: -moz-scrollbars-none !important; background: transparent !important; }"
        .to_string()
}

/// CSS applying the window background alpha and the content opacity.
///
/// Rendered as page-level CSS rather than native window alpha so an
/// opacity change never needs a reload.
pub fn opacity_css(background_opacity: f64, content_opacity: f64) -> String {
    let bg = background_opacity.clamp(0.0, 1.0);
    let content = content_opacity.clamp(0.0, 1.0);
    format!(
        "html {{ background-color: rgba(0, 0, 0, {bg:.3}) !important; }}\n\
         body {{ opacity: {content:.3}; }}"
    )
}

/// Minimal chat style for the Twitch popout page: hides chrome around the
/// message list and restyles messages with the configured font.
///
/// `font_family` of `"System"` maps to the platform sans-serif stack.
pub fn minimal_style_css(font_size: u32, font_family: &str) -> String {
    let family = if font_family == "System" {
        "-apple-system, BlinkMacSystemFont, sans-serif".to_string()
    } else {
        format!("'{font_family}', -apple-system, sans-serif")
    };

    format!(
        "/* Hide everything except chat messages */\n\
         .stream-chat-header,\n\
         .chat-input,\n\
         .chat-input__buttons-container,\n\
         .chat-room__content > div:first-child,\n\
         [data-test-selector=\"chat-input\"],\n\
         [data-a-target=\"chat-input\"],\n\
         .chat-input-tray,\n\
         .chat-wysiwyg-input__editor,\n\
         .chat-settings,\n\
         .community-points-summary,\n\
         [class*=\"channel-leaderboard\"],\n\
         [class*=\"community-highlight\"],\n\
         [class*=\"predictions\"],\n\
         [class*=\"poll\"],\n\
         button,\n\
         input {{\n\
             display: none !important;\n\
         }}\n\
         \n\
         /* Transparent background */\n\
         body,\n\
         html,\n\
         .twilight-root,\n\
         .tw-root--theme-dark,\n\
         [class*=\"chat-room\"],\n\
         [class*=\"chat-shell\"],\n\
         .chat-scrollable-area__message-container,\n\
         .simplebar-scroll-content,\n\
         .simplebar-content,\n\
         [data-a-target=\"chat-scroller\"] {{\n\
             background: transparent !important;\n\
             background-color: transparent !important;\n\
         }}\n\
         \n\
         /* Style messages */\n\
         .chat-line__message {{\n\
             padding: 4px 8px !important;\n\
             margin: 2px 0 !important;\n\
             background: transparent !important;\n\
             font-size: {font_size}px !important;\n\
             font-family: {family} !important;\n\
         }}\n\
         \n\
         /* Username styling */\n\
         .chat-author__display-name,\n\
         [data-a-target=\"chat-message-username\"] {{\n\
             font-weight: 600 !important;\n\
             font-size: {font_size}px !important;\n\
             font-family: {family} !important;\n\
         }}\n\
         \n\
         /* Message text */\n\
         .text-fragment,\n\
         [data-a-target=\"chat-message-text\"] {{\n\
             color: white !important;\n\
             font-size: {font_size}px !important;\n\
             font-family: {family} !important;\n\
         }}\n\
         \n\
         /* Hide scrollbar */\n\
         ::-webkit-scrollbar {{\n\
             display: none !important;\n\
         }}\n\
         \n\
         /* Remove borders and shadows */\n\
         * {{\n\
             border: none !important;\n\
             box-shadow: none !important;\n\
         }}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_style_creates_or_replaces_by_id() {
        let js = replace_style_js("overlay-scrollbar-hide", "body { color: red; }");
        assert!(js.contains("getElementById('overlay-scrollbar-hide')"));
        assert!(js.contains("style.id = 'overlay-scrollbar-hide'"));
        assert!(js.contains("style.textContent"));
    }

    #[test]
    fn opacity_css_clamps_out_of_range_inputs() {
        let css = opacity_css(1.7, -0.3);
        assert!(css.contains("rgba(0, 0, 0, 1.000)"));
        assert!(css.contains("opacity: 0.000"));
    }

    #[test]
    fn minimal_style_uses_configured_font() {
        let css = minimal_style_css(20, "Menlo");
        assert!(css.contains("font-size: 20px !important"));
        assert!(css.contains("'Menlo', -apple-system, sans-serif"));
    }

    #[test]
    fn minimal_style_system_font_maps_to_platform_stack() {
        let css = minimal_style_css(12, "System");
        assert!(css.contains("-apple-system, BlinkMacSystemFont, sans-serif"));
        assert!(!css.contains("'System'"));
    }

    #[test]
    fn scrollbar_css_covers_webkit_and_gecko() {
        let css = scrollbar_hide_css();
        assert!(css.contains("::-webkit-scrollbar"));
        assert!(css.contains("scrollbar-width: none"));
    }
}
