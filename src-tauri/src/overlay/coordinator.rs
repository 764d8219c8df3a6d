//! Overlay window lifecycle and content injection.
//!
//! Creates the chat and alerts windows at startup, keeps their persisted
//! geometry current, and reacts to settings changes: URL edits navigate
//! the window, style edits re-inject CSS in place, and the minimal-style
//! toggle reloads the page so its injection pipeline runs fresh.

use std::time::Duration;

use tauri::webview::PageLoadEvent;
use tauri::{
    AppHandle, Manager, PhysicalPosition, Theme, Url, WebviewUrl, WebviewWindow,
    WebviewWindowBuilder, WindowEvent, window::Color,
};

use crate::settings::{Field, SettingsService, WindowGeometry, WindowId};

use super::platform::{self, WindowLevel};

const CHAT_TITLE: &str = "Chat Overlay";
const ALERTS_TITLE: &str = "Alerts Overlay";
const CHAT_DEFAULT_WIDTH: u32 = 400;
const CHAT_DEFAULT_HEIGHT: u32 = 600;
const ALERTS_DEFAULT_WIDTH: u32 = 400;
const ALERTS_DEFAULT_HEIGHT: u32 = 300;

/// Twitch popout chat needs a beat to finish its own rendering before the
/// minimal style can stick; keyword observation waits slightly longer so
/// the chat scroller exists.
const MINIMAL_STYLE_DELAY: Duration = Duration::from_secs(1);
const KEYWORD_ALERT_DELAY: Duration = Duration::from_millis(1500);

const SETTINGS_WINDOW_LABEL: &str = "settings";
const SETTINGS_WINDOW_TITLE: &str = "Chat Overlay - Settings";
const SETTINGS_WINDOW_WIDTH: f64 = 460.0;
const SETTINGS_WINDOW_HEIGHT: f64 = 560.0;

/// Create both overlay windows and wire settings-change dispatch.
pub fn initialize(app: &AppHandle, settings: &SettingsService) -> tauri::Result<()> {
    create_overlay_window(app, settings, WindowId::Chat, true)?;
    create_overlay_window(app, settings, WindowId::Alerts, false)?;

    let app_handle = app.clone();
    let settings_in_cb = settings.clone();
    let _ = settings.on_change(
        &[
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
            Field::ClickThrough,
        ],
        move |field| apply_settings_change(&app_handle, &settings_in_cb, field),
    );

    Ok(())
}

fn create_overlay_window(
    app: &AppHandle,
    settings: &SettingsService,
    id: WindowId,
    visible: bool,
) -> tauri::Result<WebviewWindow> {
    let configured = match id {
        WindowId::Chat => settings.chat_url(),
        WindowId::Alerts => settings.alerts_url(),
    };
    let url = content_url(id, &configured);

    let saved = settings.window_geometry(id);
    let (width, height) = saved
        .map(|g| (g.width, g.height))
        .unwrap_or_else(|| default_size(id));

    let settings_on_load = settings.clone();
    let mut builder = WebviewWindowBuilder::new(app, id.label(), WebviewUrl::External(url))
        .title(window_title(id))
        .inner_size(width as f64, height as f64)
        .decorations(false)
        .transparent(true)
        .background_color(Color(0, 0, 0, 0))
        .always_on_top(true)
        .skip_taskbar(true)
        .visible_on_all_workspaces(true)
        .shadow(true)
        .theme(Some(Theme::Dark))
        .visible(false)
        .on_page_load(move |window, payload| {
            if matches!(payload.event(), PageLoadEvent::Finished) {
                on_page_loaded(&window, &settings_on_load, id);
            }
        });

    if saved.is_none() {
        builder = builder.center();
    }

    let window = builder.build()?;

    if let Some(geometry) = saved {
        let _ = window.set_position(PhysicalPosition::new(geometry.x, geometry.y));
    }

    platform::configure_overlay(&window)?;
    install_geometry_persistence(&window, settings.clone(), id);

    if visible {
        window.show()?;
        window.set_focus()?;
    }

    Ok(window)
}

fn window_title(id: WindowId) -> &'static str {
    match id {
        WindowId::Chat => CHAT_TITLE,
        WindowId::Alerts => ALERTS_TITLE,
    }
}

fn default_size(id: WindowId) -> (u32, u32) {
    match id {
        WindowId::Chat => (CHAT_DEFAULT_WIDTH, CHAT_DEFAULT_HEIGHT),
        WindowId::Alerts => (ALERTS_DEFAULT_WIDTH, ALERTS_DEFAULT_HEIGHT),
    }
}

/// Parse the configured URL, falling back to the placeholder page when the
/// setting is empty or unparseable.
fn content_url(id: WindowId, configured: &str) -> Url {
    let trimmed = configured.trim();
    if !trimmed.is_empty() {
        match Url::parse(trimmed) {
            Ok(url) => return url,
            Err(e) => tracing::warn!("Invalid {} URL {trimmed:?}: {e}", id.label()),
        }
    }

    let (title, hint) = match id {
        WindowId::Chat => ("No Chat URL Set", "Open Settings to add your chat URL"),
        WindowId::Alerts => ("No Alerts URL Set", "Open Settings to add your alerts URL"),
    };
    let placeholder = chat_inject::placeholder_url(title, hint);
    Url::parse(&placeholder).expect("placeholder data URL is always valid")
}

fn style_prefix(id: WindowId) -> &'static str {
    match id {
        WindowId::Chat => "overlay",
        WindowId::Alerts => "alerts",
    }
}

/// Injection pipeline run after every page load (including reloads).
fn on_page_loaded(window: &WebviewWindow, settings: &SettingsService, id: WindowId) {
    inject_scrollbar_hide(window, id);
    inject_opacity(window, settings, id);
    inject_drag_grip(window, id);

    if id != WindowId::Chat {
        return;
    }

    if settings.minimal_style() {
        let window = window.clone();
        let settings = settings.clone();
        tauri::async_runtime::spawn(async move {
            tokio::time::sleep(MINIMAL_STYLE_DELAY).await;
            // Settings may have changed during the delay; read them now.
            if settings.minimal_style() {
                inject_minimal_style(&window, &settings);
            }
        });
    }

    let window = window.clone();
    let settings = settings.clone();
    tauri::async_runtime::spawn(async move {
        tokio::time::sleep(KEYWORD_ALERT_DELAY).await;
        inject_keyword_alert(&window, &settings);
    });
}

fn inject_scrollbar_hide(window: &WebviewWindow, id: WindowId) {
    let style_id = format!("{}-{}", style_prefix(id), chat_inject::SCROLLBAR_HIDE_SUFFIX);
    let script = chat_inject::replace_style_js(&style_id, &chat_inject::scrollbar_hide_css());
    eval_logged(window, &script, "scrollbar hide");
}

fn inject_opacity(window: &WebviewWindow, settings: &SettingsService, id: WindowId) {
    let (background, content) = match id {
        WindowId::Chat => (
            settings.chat_background_opacity(),
            settings.content_opacity(),
        ),
        WindowId::Alerts => (settings.alerts_background_opacity(), 1.0),
    };
    let style_id = format!("{}-{}", style_prefix(id), chat_inject::OPACITY_SUFFIX);
    let css = chat_inject::opacity_css(background, content);
    eval_logged(window, &chat_inject::replace_style_js(&style_id, &css), "opacity");
}

fn inject_drag_grip(window: &WebviewWindow, id: WindowId) {
    let grip_id = format!("{}-{}", style_prefix(id), chat_inject::DRAG_GRIP_SUFFIX);
    eval_logged(window, &chat_inject::drag_grip_js(&grip_id), "drag grip");
}

fn inject_minimal_style(window: &WebviewWindow, settings: &SettingsService) {
    let css = chat_inject::minimal_style_css(
        settings.text_size().font_size(),
        &settings.font_family(),
    );
    let script = chat_inject::replace_style_js(chat_inject::MINIMAL_STYLE_ID, &css);
    eval_logged(window, &script, "minimal style");
}

fn inject_keyword_alert(window: &WebviewWindow, settings: &SettingsService) {
    let script =
        chat_inject::keyword_alert_js(&settings.alert_keywords(), &settings.highlight_color());
    eval_logged(window, &script, "keyword alert");
}

fn eval_logged(window: &WebviewWindow, script: &str, what: &str) {
    if let Err(e) = window.eval(script) {
        tracing::warn!("Failed to inject {what} into {}: {e}", window.label());
    }
}

/// React to a settings change with the cheapest intervention that makes the
/// overlay reflect it.
fn apply_settings_change(app: &AppHandle, settings: &SettingsService, field: Field) {
    match field {
        Field::ChatUrl => navigate(app, settings, WindowId::Chat),
        Field::AlertsUrl => navigate(app, settings, WindowId::Alerts),
        Field::ChatBackgroundOpacity | Field::ContentOpacity => {
            with_window(app, WindowId::Chat, |w| inject_opacity(w, settings, WindowId::Chat));
        }
        Field::AlertsBackgroundOpacity => {
            with_window(app, WindowId::Alerts, |w| {
                inject_opacity(w, settings, WindowId::Alerts)
            });
        }
        // Turning minimal style on or off needs the page's own styles back,
        // so reload and let the page-load pipeline re-inject everything.
        Field::MinimalStyle => {
            with_window(app, WindowId::Chat, |w| {
                eval_logged(w, "window.location.reload();", "reload")
            });
        }
        Field::TextSize | Field::FontFamily => {
            if settings.minimal_style() {
                with_window(app, WindowId::Chat, |w| inject_minimal_style(w, settings));
            }
        }
        Field::AlertKeywords | Field::HighlightColor => {
            with_window(app, WindowId::Chat, |w| inject_keyword_alert(w, settings));
        }
        Field::ClickThrough => apply_click_through(app, settings.click_through()),
        Field::HotkeyKeyCode
        | Field::HotkeyModifiers
        | Field::ChatWindowGeometry
        | Field::AlertsWindowGeometry => {}
    }
}

fn with_window(app: &AppHandle, id: WindowId, f: impl FnOnce(&WebviewWindow)) {
    if let Some(window) = app.get_webview_window(id.label()) {
        f(&window);
    }
}

fn navigate(app: &AppHandle, settings: &SettingsService, id: WindowId) {
    let configured = match id {
        WindowId::Chat => settings.chat_url(),
        WindowId::Alerts => settings.alerts_url(),
    };
    let url = content_url(id, &configured);
    if let Some(window) = app.get_webview_window(id.label()) {
        let mut window = window.clone();
        if let Err(e) = window.navigate(url) {
            tracing::error!("Failed to navigate {} window: {e}", id.label());
        }
    }
}

/// Apply the shared click-through flag to both overlays.
fn apply_click_through(app: &AppHandle, enabled: bool) {
    for id in [WindowId::Chat, WindowId::Alerts] {
        with_window(app, id, |window| {
            if let Err(e) = window.set_ignore_cursor_events(enabled) {
                tracing::error!("Failed to set click-through on {}: {e}", id.label());
            }
        });
    }
    tracing::info!("Click-through {}", if enabled { "enabled" } else { "disabled" });
}

/// Show or hide an overlay; returns the new visibility.
pub fn toggle_window_visibility(app: &AppHandle, id: WindowId) -> tauri::Result<bool> {
    let Some(window) = app.get_webview_window(id.label()) else {
        return Ok(false);
    };
    let visible = window.is_visible()?;
    if visible {
        window.hide()?;
    } else {
        window.show()?;
    }
    Ok(!visible)
}

pub fn is_window_visible(app: &AppHandle, id: WindowId) -> bool {
    app.get_webview_window(id.label())
        .and_then(|w| w.is_visible().ok())
        .unwrap_or(false)
}

fn install_geometry_persistence(window: &WebviewWindow, settings: SettingsService, id: WindowId) {
    let tracked = window.clone();
    window.on_window_event(move |event| {
        if matches!(event, WindowEvent::Moved(_) | WindowEvent::Resized(_)) {
            persist_geometry(&tracked, &settings, id);
        }
    });
}

fn persist_geometry(window: &WebviewWindow, settings: &SettingsService, id: WindowId) {
    let (Ok(position), Ok(size)) = (window.outer_position(), window.inner_size()) else {
        return;
    };
    if size.width == 0 || size.height == 0 {
        return;
    }
    settings.set_window_geometry(
        id,
        WindowGeometry {
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
        },
    );
}

/// One final geometry write before the process exits.
pub fn persist_all_geometry(app: &AppHandle, settings: &SettingsService) {
    for id in [WindowId::Chat, WindowId::Alerts] {
        with_window(app, id, |window| persist_geometry(window, settings, id));
    }
}

/// Open (or focus) the settings panel. Overlays drop to the normal window
/// level while it is open so it cannot end up hidden behind them.
pub fn open_settings_panel(app: &AppHandle) {
    if let Some(window) = app.get_webview_window(SETTINGS_WINDOW_LABEL) {
        let _ = window.show();
        let _ = window.unminimize();
        let _ = window.set_focus();
        return;
    }

    let builder = WebviewWindowBuilder::new(
        app,
        SETTINGS_WINDOW_LABEL,
        WebviewUrl::App("settings.html".into()),
    )
    .title(SETTINGS_WINDOW_TITLE)
    .inner_size(SETTINGS_WINDOW_WIDTH, SETTINGS_WINDOW_HEIGHT)
    .decorations(true)
    .resizable(true)
    .center();

    match builder.build() {
        Ok(window) => {
            set_overlay_levels(app, WindowLevel::Normal);

            let app_handle = app.clone();
            window.on_window_event(move |event| {
                if matches!(event, WindowEvent::Destroyed) {
                    set_overlay_levels(&app_handle, WindowLevel::Floating);
                }
            });

            let _ = window.set_focus();
        }
        Err(error) => {
            tracing::error!("Failed to open settings panel: {error}");
        }
    }
}

fn set_overlay_levels(app: &AppHandle, level: WindowLevel) {
    for id in [WindowId::Chat, WindowId::Alerts] {
        with_window(app, id, |window| platform::set_window_level(window, level));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_url_falls_back_to_placeholder() {
        let url = content_url(WindowId::Chat, "");
        assert_eq!(url.scheme(), "data");
        assert!(url.as_str().contains("No%20Chat%20URL%20Set"));

        let url = content_url(WindowId::Alerts, "   ");
        assert!(url.as_str().contains("No%20Alerts%20URL%20Set"));

        let url = content_url(WindowId::Chat, "not a url");
        assert_eq!(url.scheme(), "data");
    }

    #[test]
    fn content_url_passes_valid_urls_through() {
        let url = content_url(
            WindowId::Chat,
            " https://www.twitch.tv/popout/example/chat ",
        );
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("www.twitch.tv"));
    }

    #[test]
    fn default_sizes_differ_per_window() {
        assert_eq!(default_size(WindowId::Chat), (400, 600));
        assert_eq!(default_size(WindowId::Alerts), (400, 300));
    }

    #[test]
    fn style_prefixes_keep_injection_ids_distinct() {
        assert_eq!(style_prefix(WindowId::Chat), "overlay");
        assert_eq!(style_prefix(WindowId::Alerts), "alerts");
    }
}
