//! Persistent overlay settings: field definitions, defaults, validation,
//! and the observable service wrapping the key-value store.

mod defaults;
mod fields;
mod service;
mod validation;

pub use defaults::{DEFAULT_SETTINGS, get_default};
pub use fields::{Field, HotkeyBinding, TextSize, WindowGeometry, WindowId};
pub use service::{SettingInfo, SettingsService, Subscription, normalize_keywords};
pub use validation::validate_setting;
