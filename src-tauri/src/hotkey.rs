//! Global hotkey that toggles click-through.
//!
//! The binding is persisted as a macOS virtual key code plus a modifier
//! bitmask. Registration goes through the global-shortcut plugin; when the
//! binding changes the previous shortcut is unregistered first.

use std::sync::Mutex;

use anyhow::anyhow;
use tauri::{AppHandle, Manager};
use tauri_plugin_global_shortcut::{Code, GlobalShortcutExt, Modifiers, Shortcut, ShortcutState};

use crate::settings::{Field, HotkeyBinding, SettingsService};

pub const MOD_SHIFT: u32 = 1;
pub const MOD_CONTROL: u32 = 2;
pub const MOD_ALT: u32 = 4;
pub const MOD_SUPER: u32 = 8;

/// Control + the ISO section key (virtual key code 10).
const DEFAULT_CODE: Code = Code::IntlBackslash;

#[derive(Default)]
struct HotkeyManager {
    registered: Mutex<Option<Shortcut>>,
}

/// Register the persisted hotkey and re-register whenever the binding
/// settings change.
pub fn setup(app: &AppHandle, settings: &SettingsService) -> Result<(), anyhow::Error> {
    app.manage(HotkeyManager::default());
    apply(app, settings)?;

    let app_handle = app.clone();
    let settings_in_cb = settings.clone();
    let _ = settings.on_change(&[Field::HotkeyKeyCode, Field::HotkeyModifiers], move |_| {
        if let Err(e) = apply(&app_handle, &settings_in_cb) {
            tracing::error!("Failed to re-register hotkey: {e}");
        }
    });

    Ok(())
}

fn apply(app: &AppHandle, settings: &SettingsService) -> Result<(), anyhow::Error> {
    let binding = settings.hotkey_binding();
    let shortcut = shortcut_for(binding);

    let manager = app.state::<HotkeyManager>();
    let mut guard = manager
        .registered
        .lock()
        .map_err(|_| anyhow!("hotkey state poisoned"))?;

    if let Some(prev) = guard.take() {
        let _ = app.global_shortcut().unregister(prev);
    }

    let settings_on_press = settings.clone();
    app.global_shortcut()
        .on_shortcut(shortcut, move |_app, _shortcut, event| {
            // Fires on both press and release; react to the press only.
            if event.state != ShortcutState::Pressed {
                return;
            }
            let enabled = settings_on_press.toggle_click_through();
            tracing::info!(
                "Hotkey toggled click-through {}",
                if enabled { "on" } else { "off" }
            );
        })?;

    *guard = Some(shortcut);
    tracing::info!(
        "Registered click-through hotkey (key code {}, modifiers {:#06b})",
        binding.key_code,
        binding.modifiers
    );
    Ok(())
}

fn shortcut_for(binding: HotkeyBinding) -> Shortcut {
    let code = match key_code_to_code(binding.key_code) {
        Some(code) => code,
        None => {
            tracing::warn!(
                "Unknown hotkey key code {}, falling back to the default key",
                binding.key_code
            );
            DEFAULT_CODE
        }
    };
    Shortcut::new(modifiers_from_mask(binding.modifiers), code)
}

/// Translate the persisted modifier bitmask into plugin modifiers. An
/// empty mask registers an unmodified key.
fn modifiers_from_mask(mask: u32) -> Option<Modifiers> {
    let mut modifiers = Modifiers::empty();
    if mask & MOD_SHIFT != 0 {
        modifiers |= Modifiers::SHIFT;
    }
    if mask & MOD_CONTROL != 0 {
        modifiers |= Modifiers::CONTROL;
    }
    if mask & MOD_ALT != 0 {
        modifiers |= Modifiers::ALT;
    }
    if mask & MOD_SUPER != 0 {
        modifiers |= Modifiers::SUPER;
    }
    if modifiers.is_empty() { None } else { Some(modifiers) }
}

/// Map a macOS virtual key code onto a layout-independent key code.
fn key_code_to_code(key_code: u32) -> Option<Code> {
    let code = match key_code {
        0 => Code::KeyA,
        1 => Code::KeyS,
        2 => Code::KeyD,
        3 => Code::KeyF,
        4 => Code::KeyH,
        5 => Code::KeyG,
        6 => Code::KeyZ,
        7 => Code::KeyX,
        8 => Code::KeyC,
        9 => Code::KeyV,
        10 => Code::IntlBackslash,
        11 => Code::KeyB,
        12 => Code::KeyQ,
        13 => Code::KeyW,
        14 => Code::KeyE,
        15 => Code::KeyR,
        16 => Code::KeyY,
        17 => Code::KeyT,
        18 => Code::Digit1,
        19 => Code::Digit2,
        20 => Code::Digit3,
        21 => Code::Digit4,
        22 => Code::Digit6,
        23 => Code::Digit5,
        24 => Code::Equal,
        25 => Code::Digit9,
        26 => Code::Digit7,
        27 => Code::Minus,
        28 => Code::Digit8,
        29 => Code::Digit0,
        30 => Code::BracketRight,
        31 => Code::KeyO,
        32 => Code::KeyU,
        33 => Code::BracketLeft,
        34 => Code::KeyI,
        35 => Code::KeyP,
        36 => Code::Enter,
        37 => Code::KeyL,
        38 => Code::KeyJ,
        39 => Code::Quote,
        40 => Code::KeyK,
        41 => Code::Semicolon,
        42 => Code::Backslash,
        43 => Code::Comma,
        44 => Code::Slash,
        45 => Code::KeyN,
        46 => Code::KeyM,
        47 => Code::Period,
        48 => Code::Tab,
        49 => Code::Space,
        50 => Code::Backquote,
        51 => Code::Backspace,
        53 => Code::Escape,
        96 => Code::F5,
        97 => Code::F6,
        98 => Code::F7,
        99 => Code::F3,
        100 => Code::F8,
        101 => Code::F9,
        103 => Code::F11,
        109 => Code::F10,
        111 => Code::F12,
        115 => Code::Home,
        116 => Code::PageUp,
        117 => Code::Delete,
        118 => Code::F4,
        119 => Code::End,
        120 => Code::F2,
        121 => Code::PageDown,
        122 => Code::F1,
        123 => Code::ArrowLeft,
        124 => Code::ArrowRight,
        125 => Code::ArrowDown,
        126 => Code::ArrowUp,
        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_common_virtual_key_codes() {
        assert_eq!(key_code_to_code(10), Some(Code::IntlBackslash));
        assert_eq!(key_code_to_code(49), Some(Code::Space));
        assert_eq!(key_code_to_code(0), Some(Code::KeyA));
        assert_eq!(key_code_to_code(122), Some(Code::F1));
        assert_eq!(key_code_to_code(126), Some(Code::ArrowUp));
        assert_eq!(key_code_to_code(200), None);
    }

    #[test]
    fn modifier_mask_translates_to_plugin_flags() {
        assert_eq!(modifiers_from_mask(0), None);
        assert_eq!(modifiers_from_mask(MOD_CONTROL), Some(Modifiers::CONTROL));
        assert_eq!(
            modifiers_from_mask(MOD_SHIFT | MOD_ALT),
            Some(Modifiers::SHIFT | Modifiers::ALT)
        );
        assert_eq!(
            modifiers_from_mask(MOD_SUPER | MOD_CONTROL),
            Some(Modifiers::SUPER | Modifiers::CONTROL)
        );
    }

    #[test]
    fn rebinding_produces_a_distinct_shortcut() {
        let before = shortcut_for(HotkeyBinding {
            key_code: 10,
            modifiers: MOD_CONTROL,
        });
        let after = shortcut_for(HotkeyBinding {
            key_code: 49,
            modifiers: MOD_SUPER,
        });
        assert_ne!(before, after);
        assert_eq!(after.key, Code::Space);
    }

    #[test]
    fn unknown_key_code_falls_back_to_default_key() {
        let shortcut = shortcut_for(HotkeyBinding {
            key_code: 999,
            modifiers: MOD_CONTROL,
        });
        assert_eq!(shortcut.key, Code::IntlBackslash);
    }
}
