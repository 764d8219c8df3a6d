//! Placeholder pages shown when no content URL is configured.

/// Render the placeholder page for a window and return it as a `data:` URL
/// the webview can navigate to directly.
pub fn placeholder_url(title: &str, hint: &str) -> String {
    let html = placeholder_html(title, hint);
    format!("data:text/html,{}", urlencoding::encode(&html))
}

fn placeholder_html(title: &str, hint: &str) -> String {
    format!(
        r#"<html>
<head>
    <style>
        body {{
            display: flex;
            align-items: center;
            justify-content: center;
            height: 100vh;
            margin: 0;
            font-family: -apple-system, BlinkMacSystemFont, sans-serif;
            color: rgba(255, 255, 255, 0.6);
            text-align: center;
            background: transparent;
        }}
        .placeholder {{
            padding: 20px;
        }}
        h3 {{
            margin: 0 0 10px 0;
            font-weight: 500;
        }}
        p {{
            margin: 0;
            font-size: 14px;
            opacity: 0.7;
        }}
    </style>
</head>
<body>
    <div class="placeholder">
        <h3>{title}</h3>
        <p>{hint}</p>
    </div>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_a_data_url() {
        let url = placeholder_url("No Chat URL Set", "Open Settings to add your chat URL");
        assert!(url.starts_with("data:text/html,"));
    }

    #[test]
    fn placeholder_carries_title_and_hint() {
        let html = placeholder_html("No Alerts URL Set", "Open Settings to add your alerts URL");
        assert!(html.contains("<h3>No Alerts URL Set</h3>"));
        assert!(html.contains("Open Settings to add your alerts URL"));
    }

    #[test]
    fn encoded_url_round_trips_the_markup() {
        let url = placeholder_url("No Chat URL Set", "hint");
        let encoded = url.strip_prefix("data:text/html,").unwrap();
        let decoded = urlencoding::decode(encoded).unwrap();
        assert!(decoded.contains("No Chat URL Set"));
    }
}
