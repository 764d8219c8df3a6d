//! Overlay window management: creation, platform configuration, content
//! injection, and the settings panel.

mod coordinator;
mod platform;

pub use coordinator::{
    initialize, is_window_visible, open_settings_panel, persist_all_geometry,
    toggle_window_visibility,
};
