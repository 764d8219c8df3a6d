//! Status-bar tray icon and menu.
//!
//! Menu item labels track the live state (window visibility, click-through)
//! and are refreshed after every toggle. Left-clicking the icon opens the
//! settings panel directly.

use tauri::Wry;
use tauri::menu::{MenuBuilder, MenuItem, MenuItemBuilder};
use tauri::tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent};
use tauri::{AppHandle, Manager};

use crate::app::SharedState;
use crate::overlay;
use crate::settings::{Field, SettingsService, WindowId};

const MENU_ID_TOGGLE_CHAT: &str = "tray-toggle-chat";
const MENU_ID_TOGGLE_ALERTS: &str = "tray-toggle-alerts";
const MENU_ID_CLICK_THROUGH: &str = "tray-click-through";
const MENU_ID_SETTINGS: &str = "tray-settings";
const MENU_ID_QUIT: &str = "tray-quit";
const TRAY_ICON: tauri::image::Image<'_> = tauri::include_image!("icons/32x32.png");

/// Handles to the stateful menu items, kept so labels can be rewritten
/// in place.
pub struct TrayMenu {
    chat: MenuItem<Wry>,
    alerts: MenuItem<Wry>,
    click_through: MenuItem<Wry>,
}

pub fn setup_tray(app: &AppHandle, settings: &SettingsService) -> tauri::Result<()> {
    let chat = MenuItemBuilder::with_id(MENU_ID_TOGGLE_CHAT, chat_label(true)).build(app)?;
    let alerts = MenuItemBuilder::with_id(MENU_ID_TOGGLE_ALERTS, alerts_label(false)).build(app)?;
    let click_through =
        MenuItemBuilder::with_id(MENU_ID_CLICK_THROUGH, click_through_label(false)).build(app)?;

    let menu = MenuBuilder::new(app)
        .item(&chat)
        .item(&alerts)
        .separator()
        .item(&click_through)
        .separator()
        .text(MENU_ID_SETTINGS, "Settings")
        .separator()
        .text(MENU_ID_QUIT, "Quit")
        .build()?;

    app.manage(TrayMenu {
        chat,
        alerts,
        click_through,
    });

    let _tray = TrayIconBuilder::with_id("main-tray")
        .menu(&menu)
        .icon(TRAY_ICON.clone())
        .show_menu_on_left_click(false)
        .on_menu_event(|app, event| match event.id().as_ref() {
            MENU_ID_TOGGLE_CHAT => toggle_window(app, WindowId::Chat),
            MENU_ID_TOGGLE_ALERTS => toggle_window(app, WindowId::Alerts),
            MENU_ID_CLICK_THROUGH => {
                let state = app.state::<SharedState>();
                state.settings().toggle_click_through();
            }
            MENU_ID_SETTINGS => overlay::open_settings_panel(app),
            MENU_ID_QUIT => app.exit(0),
            _ => {}
        })
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Down,
                ..
            } = event
            {
                overlay::open_settings_panel(tray.app_handle());
            }
        })
        .build(app)?;

    // Keep the click-through label current no matter where the toggle
    // came from (tray, hotkey, or settings panel).
    let app_handle = app.clone();
    let _ = settings.on_change(&[Field::ClickThrough], move |_| {
        refresh(&app_handle);
    });

    Ok(())
}

fn toggle_window(app: &AppHandle, id: WindowId) {
    if let Err(e) = overlay::toggle_window_visibility(app, id) {
        tracing::error!("Failed to toggle {} window: {e}", id.label());
    }
    refresh(app);
}

/// Rewrite the stateful menu labels from the current app state.
pub fn refresh(app: &AppHandle) {
    let Some(tray_menu) = app.try_state::<TrayMenu>() else {
        return;
    };
    let state = app.state::<SharedState>();

    let chat_visible = overlay::is_window_visible(app, WindowId::Chat);
    let alerts_visible = overlay::is_window_visible(app, WindowId::Alerts);
    let click_through = state.settings().click_through();

    let _ = tray_menu.chat.set_text(chat_label(chat_visible));
    let _ = tray_menu.alerts.set_text(alerts_label(alerts_visible));
    let _ = tray_menu
        .click_through
        .set_text(click_through_label(click_through));
}

fn chat_label(visible: bool) -> &'static str {
    if visible { "Hide Chat" } else { "Show Chat" }
}

fn alerts_label(visible: bool) -> &'static str {
    if visible { "Hide Alerts" } else { "Show Alerts" }
}

fn click_through_label(enabled: bool) -> &'static str {
    if enabled {
        "Disable Click-Through"
    } else {
        "Enable Click-Through"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_reflect_current_state() {
        assert_eq!(chat_label(true), "Hide Chat");
        assert_eq!(chat_label(false), "Show Chat");
        assert_eq!(alerts_label(true), "Hide Alerts");
        assert_eq!(alerts_label(false), "Show Alerts");
        assert_eq!(click_through_label(true), "Disable Click-Through");
        assert_eq!(click_through_label(false), "Enable Click-Through");
    }
}
