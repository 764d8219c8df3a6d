//! Platform-specific overlay window configuration.
//!
//! Overlay windows float above normal windows, follow the user across
//! virtual desktops, and stay out of the taskbar / window switcher.
//! While the settings panel is open the overlays drop to the normal
//! window level so the panel is not buried under them.

use tauri::WebviewWindow;

/// Overlay stacking level. `Floating` is the steady state; `Normal` is
/// used while the settings panel is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowLevel {
    Floating,
    Normal,
}

/// Apply the one-time overlay configuration after a window is built.
pub fn configure_overlay(window: &WebviewWindow) -> tauri::Result<()> {
    #[cfg(target_os = "macos")]
    macos::configure(window)?;

    #[cfg(target_os = "windows")]
    windows_impl::configure(window)?;

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        // always_on_top from the builder is sufficient elsewhere.
        let _ = window;
    }

    Ok(())
}

/// Move an overlay between the floating and normal stacking levels.
pub fn set_window_level(window: &WebviewWindow, level: WindowLevel) {
    #[cfg(target_os = "macos")]
    macos::set_level(window, level);

    #[cfg(not(target_os = "macos"))]
    {
        if let Err(e) = window.set_always_on_top(level == WindowLevel::Floating) {
            tracing::warn!("Failed to change window level for {}: {e}", window.label());
        }
    }
}

#[cfg(target_os = "macos")]
mod macos {
    use objc2::rc::Retained;
    use objc2_app_kit::{
        NSFloatingWindowLevel, NSNormalWindowLevel, NSWindow, NSWindowCollectionBehavior,
    };
    use tauri::WebviewWindow;

    use super::WindowLevel;

    pub fn configure(window: &WebviewWindow) -> tauri::Result<()> {
        let Some(ns_window) = retain_ns_window(window)? else {
            return Ok(());
        };

        ns_window.setLevel(NSFloatingWindowLevel);

        // The window has no title bar; a background drag is the only way
        // to move it natively (the injected grip covers other platforms).
        ns_window.setMovableByWindowBackground(true);

        // Visible on every space, alongside fullscreen apps, and pinned in
        // place during Mission Control.
        let behavior = NSWindowCollectionBehavior::CanJoinAllSpaces
            | NSWindowCollectionBehavior::Stationary
            | NSWindowCollectionBehavior::FullScreenAuxiliary;
        ns_window.setCollectionBehavior(behavior);

        Ok(())
    }

    pub fn set_level(window: &WebviewWindow, level: WindowLevel) {
        match retain_ns_window(window) {
            Ok(Some(ns_window)) => {
                let value = match level {
                    WindowLevel::Floating => NSFloatingWindowLevel,
                    WindowLevel::Normal => NSNormalWindowLevel,
                };
                ns_window.setLevel(value);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Failed to change window level for {}: {e}", window.label());
            }
        }
    }

    fn retain_ns_window(window: &WebviewWindow) -> tauri::Result<Option<Retained<NSWindow>>> {
        let ptr = window.ns_window()?;
        // SAFETY: the pointer stays valid for the lifetime of the window and
        // is retained for the duration of our calls.
        Ok(unsafe { Retained::retain(ptr as *mut NSWindow) })
    }
}

#[cfg(target_os = "windows")]
mod windows_impl {
    use tauri::WebviewWindow;
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::WindowsAndMessaging::{
        GWL_EXSTYLE, GetWindowLongPtrW, SetWindowLongPtrW, WS_EX_TOOLWINDOW,
    };

    pub fn configure(window: &WebviewWindow) -> tauri::Result<()> {
        let hwnd = window.hwnd()?;

        unsafe {
            let hwnd = HWND(hwnd.0);

            // Keep the overlay out of the taskbar and Alt+Tab switcher.
            let mut ex_style = GetWindowLongPtrW(hwnd, GWL_EXSTYLE);
            ex_style |= WS_EX_TOOLWINDOW.0 as isize;
            SetWindowLongPtrW(hwnd, GWL_EXSTYLE, ex_style);
        }

        Ok(())
    }
}
