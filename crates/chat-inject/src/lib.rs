//! Builders for every script/style snippet injected into the hosted page.
//!
//! Each snippet targets a fixed element id, so injecting it again replaces
//! the previous copy instead of stacking duplicates. All builders are pure
//! string functions; the app evaluates the results fire-and-forget.

pub mod drag;
pub mod keyword;
pub mod placeholder;
pub mod style;

pub use drag::drag_grip_js;
pub use keyword::keyword_alert_js;
pub use placeholder::placeholder_url;
pub use style::{minimal_style_css, opacity_css, replace_style_js, scrollbar_hide_css};

/// Suffix of the keyword-highlight script element id.
pub const KEYWORD_ALERT_ID: &str = "overlay-keyword-alert";

/// Suffix appended to the window prefix for the scrollbar-hiding style.
pub const SCROLLBAR_HIDE_SUFFIX: &str = "scrollbar-hide";

/// Suffix appended to the window prefix for the opacity style.
pub const OPACITY_SUFFIX: &str = "opacity";

/// Suffix appended to the window prefix for the drag grip element.
pub const DRAG_GRIP_SUFFIX: &str = "drag-grip";

/// Element id of the minimal chat style (chat window only).
pub const MINIMAL_STYLE_ID: &str = "overlay-minimal-style";

/// Escape text for embedding inside a JS template literal.
pub(crate) fn js_template_escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
        .replace('\n', " ")
}

/// JS that removes the element with the given id, if present.
pub fn remove_element_js(id: &str) -> String {
    format!(
        "var el = document.getElementById('{id}');\n\
         if (el) el.remove();"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_escape_neutralizes_backticks_and_interpolation() {
        let escaped = js_template_escape("a`b${c}\\d\ne");
        assert!(!escaped.contains('\n'));
        assert!(escaped.contains("\\`"));
        assert!(escaped.contains("\\${"));
        assert!(escaped.contains("\\\\d"));
    }

    #[test]
    fn remove_element_targets_the_id() {
        let js = remove_element_js("overlay-keyword-alert");
        assert!(js.contains("getElementById('overlay-keyword-alert')"));
        assert!(js.contains("el.remove()"));
    }
}
