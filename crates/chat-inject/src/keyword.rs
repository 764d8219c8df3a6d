//! Keyword-highlight script: a MutationObserver over the chat scroller that
//! paints matching messages with the configured highlight color.

use crate::{KEYWORD_ALERT_ID, js_template_escape, remove_element_js};

/// Fixed alpha suffix appended to the 6-digit highlight color.
const HIGHLIGHT_ALPHA: &str = "40";

/// Build the keyword-highlight injection for the given keyword set.
///
/// Matching is a case-insensitive substring test of the message text against
/// every keyword; matches get `{color}40` as the message background. Both
/// messages present at injection time and messages added later are covered.
///
/// An empty keyword set yields a script that removes any prior injection
/// entirely rather than leaving a no-op observer behind. Re-injection always
/// replaces the previous script element (fixed id), so calling this
/// repeatedly is safe.
pub fn keyword_alert_js(keywords: &[String], highlight_color: &str) -> String {
    if keywords.is_empty() {
        return remove_element_js(KEYWORD_ALERT_ID);
    }

    // serde_json output is a valid JS array literal; the extra escaping
    // keeps backticks and `${` in keywords from breaking the template
    // literal the array is embedded in.
    let keywords_json = js_template_escape(
        &serde_json::to_string(keywords).unwrap_or_else(|_| "[]".to_string()),
    );

    format!(
        r#"(function() {{
    var existingScript = document.getElementById('{id}');
    if (existingScript) existingScript.remove();

    var script = document.createElement('script');
    script.id = '{id}';
    script.textContent = `
        (function() {{
            var keywords = {keywords_json};
            var highlightColor = '{highlight_color}';

            function highlightKeywords(element) {{
                if (!element || !element.textContent) return;

                var text = element.textContent.toLowerCase();
                var shouldHighlight = keywords.some(function(keyword) {{
                    return text.includes(keyword.toLowerCase());
                }});

                if (shouldHighlight) {{
                    var messageContainer = element.closest('.chat-line__message');
                    if (messageContainer) {{
                        messageContainer.style.backgroundColor = highlightColor + '{alpha}';
                        messageContainer.style.borderRadius = '4px';
                    }}
                }}
            }}

            function processNewMessages(mutations) {{
                mutations.forEach(function(mutation) {{
                    mutation.addedNodes.forEach(function(node) {{
                        if (node.nodeType === Node.ELEMENT_NODE) {{
                            var messages = node.querySelectorAll('.text-fragment, [data-a-target="chat-message-text"]');
                            messages.forEach(highlightKeywords);

                            if (node.matches && (node.matches('.text-fragment') || node.matches('[data-a-target="chat-message-text"]'))) {{
                                highlightKeywords(node);
                            }}
                        }}
                    }});
                }});
            }}

            var chatContainer = document.querySelector('[data-a-target="chat-scroller"]') ||
                                document.querySelector('.chat-scrollable-area__message-container') ||
                                document.querySelector('.simplebar-content');

            if (chatContainer) {{
                var observer = new MutationObserver(processNewMessages);
                observer.observe(chatContainer, {{ childList: true, subtree: true }});

                // Process existing messages
                var existingMessages = chatContainer.querySelectorAll('.text-fragment, [data-a-target="chat-message-text"]');
                existingMessages.forEach(highlightKeywords);
            }}
        }})();
    `;
    document.head.appendChild(script);
}})();"#,
        id = KEYWORD_ALERT_ID,
        alpha = HIGHLIGHT_ALPHA,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn empty_keywords_produce_removal_script() {
        let js = keyword_alert_js(&[], "#FFFF00");
        assert!(js.contains("el.remove()"));
        assert!(!js.contains("MutationObserver"));
    }

    #[test]
    fn script_embeds_keywords_and_color_with_alpha_suffix() {
        let js = keyword_alert_js(&kw(&["hello", "raid"]), "#FF0000");
        assert!(js.contains(r#"["hello","raid"]"#));
        assert!(js.contains("'#FF0000'"));
        assert!(js.contains("highlightColor + '40'"));
    }

    #[test]
    fn script_replaces_prior_injection_by_fixed_id() {
        let js = keyword_alert_js(&kw(&["hello"]), "#FFFF00");
        // Removal of the existing element precedes the new insertion, so
        // injecting twice leaves exactly one element with the fixed id.
        let remove_pos = js.find("existingScript.remove()").unwrap();
        let append_pos = js.find("document.head.appendChild(script)").unwrap();
        assert!(remove_pos < append_pos);
        assert_eq!(js.matches("script.id = 'overlay-keyword-alert'").count(), 1);
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let js = keyword_alert_js(&kw(&["hello"]), "#FFFF00");
        // Both sides of the comparison are lowercased before the substring test.
        assert!(js.contains("element.textContent.toLowerCase()"));
        assert!(js.contains("keyword.toLowerCase()"));
        assert!(js.contains("text.includes"));
    }

    #[test]
    fn keywords_with_quotes_survive_template_embedding() {
        // JSON escapes the quote as \" and the template-literal escaping
        // doubles the backslash so the evaluated script sees \" again.
        let js = keyword_alert_js(&kw(&["it's \"quoted\""]), "#FFFF00");
        assert!(js.contains(r#"["it's \\"quoted\\""]"#));
    }

    #[test]
    fn keywords_with_backticks_cannot_break_the_template_literal() {
        let js = keyword_alert_js(&kw(&["uh`oh", "${nope}"]), "#FFFF00");
        assert!(js.contains("uh\\`oh"));
        assert!(js.contains("\\${nope}"));
    }

    #[test]
    fn observer_covers_existing_messages_at_injection_time() {
        let js = keyword_alert_js(&kw(&["hello"]), "#FFFF00");
        assert!(js.contains("existingMessages.forEach(highlightKeywords)"));
    }
}
