//! Store-backed observable settings service.
//!
//! One instance is created at startup and handed to every consumer
//! (coordinator, tray, hotkey manager, commands). Every mutation writes
//! through to the store synchronously, then fans out a change notification
//! to all current subscribers. Identical values are re-persisted and
//! re-notified; there is no dedup and no batching. Each field is an
//! independent unit of consistency.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use overlay_store::Store;
use serde::Serialize;

use super::defaults::{DEFAULT_SETTINGS, get_default};
use super::fields::{Field, HotkeyBinding, TextSize, WindowGeometry, WindowId};
use super::validation::{is_valid_hex_color, validate_setting};

type ChangeCallback = Arc<dyn Fn(Field) + Send + Sync>;

struct Subscriber {
    id: u64,
    fields: Vec<Field>,
    callback: ChangeCallback,
}

/// Token returned by [`SettingsService::on_change`]; pass it back to
/// [`SettingsService::unsubscribe`] on teardown.
#[derive(Debug)]
pub struct Subscription(u64);

/// A setting as returned to the settings panel.
#[derive(Debug, Clone, Serialize)]
pub struct SettingInfo {
    pub key: String,
    pub value: String,
    pub description: String,
}

/// Clone-able handle over the shared settings state.
#[derive(Clone)]
pub struct SettingsService {
    inner: Arc<Inner>,
}

struct Inner {
    store: Store,
    /// Never persisted; resets to false every launch.
    click_through: AtomicBool,
    subscribers: Mutex<Vec<Subscriber>>,
    next_subscriber_id: AtomicU64,
}

impl SettingsService {
    pub fn new(store: Store) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                click_through: AtomicBool::new(false),
                subscribers: Mutex::new(Vec::new()),
                next_subscriber_id: AtomicU64::new(1),
            }),
        }
    }

    /// Write defaults for any scalar key not yet in the store.
    pub fn initialize_defaults(&self) -> Result<(), anyhow::Error> {
        for (key, def) in DEFAULT_SETTINGS.iter() {
            if self.inner.store.contains(key)? {
                continue;
            }
            self.inner.store.set(key, def.default)?;
        }
        Ok(())
    }

    // ----- Subscriptions -----

    /// Register a callback for changes to any of `fields`.
    pub fn on_change(
        &self,
        fields: &[Field],
        callback: impl Fn(Field) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.inner.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        let subscriber = Subscriber {
            id,
            fields: fields.to_vec(),
            callback: Arc::new(callback),
        };
        match self.inner.subscribers.lock() {
            Ok(mut subs) => subs.push(subscriber),
            Err(_) => tracing::error!("Settings subscriber list poisoned, dropping subscription"),
        }
        Subscription(id)
    }

    /// Remove a previously registered callback.
    pub fn unsubscribe(&self, subscription: Subscription) {
        if let Ok(mut subs) = self.inner.subscribers.lock() {
            subs.retain(|s| s.id != subscription.0);
        }
    }

    fn notify(&self, field: Field) {
        // Callbacks run outside the lock so they may call back into the
        // service (including further sets) without deadlocking.
        let callbacks: Vec<ChangeCallback> = match self.inner.subscribers.lock() {
            Ok(subs) => subs
                .iter()
                .filter(|s| s.fields.contains(&field))
                .map(|s| Arc::clone(&s.callback))
                .collect(),
            Err(_) => {
                tracing::error!("Settings subscriber list poisoned, skipping notify");
                return;
            }
        };
        for callback in callbacks {
            callback(field);
        }
    }

    // ----- Raw access -----

    fn raw(&self, field: Field) -> String {
        let Some(key) = field.key() else {
            return String::new();
        };
        match self.inner.store.get(key) {
            Ok(Some(value)) => value,
            Ok(None) => get_default(key).unwrap_or("").to_string(),
            Err(e) => {
                tracing::warn!("Failed to read setting {key}: {e}");
                get_default(key).unwrap_or("").to_string()
            }
        }
    }

    fn persist(&self, field: Field, value: &str) {
        if let Some(key) = field.key() {
            if let Err(e) = self.inner.store.set(key, value) {
                tracing::error!("Failed to persist setting {key}: {e}");
            }
        }
        self.notify(field);
    }

    /// Generic validated write used by the settings panel.
    pub fn set(&self, key: &str, value: &str) -> Result<(), anyhow::Error> {
        let field = Field::from_key(key)
            .ok_or_else(|| anyhow::anyhow!("unknown setting key: {key}"))?;
        validate_setting(key, value)
            .map_err(|e| anyhow::anyhow!("validation error for {key}: {e}"))?;

        match field {
            Field::ChatBackgroundOpacity
            | Field::ContentOpacity
            | Field::AlertsBackgroundOpacity => {
                // validate_setting guarantees this parses.
                let parsed = value.parse::<f64>().unwrap_or(0.0);
                self.set_opacity(field, parsed);
            }
            Field::AlertKeywords => {
                let keywords = serde_json::from_str::<Vec<String>>(value).unwrap_or_default();
                self.set_alert_keywords(keywords);
            }
            _ => self.persist(field, value),
        }
        Ok(())
    }

    /// Every scalar setting with its current value, sorted by key.
    pub fn all_settings(&self) -> Vec<SettingInfo> {
        let mut infos: Vec<SettingInfo> = DEFAULT_SETTINGS
            .values()
            .map(|def| SettingInfo {
                key: def.key.to_string(),
                value: Field::from_key(def.key).map(|f| self.raw(f)).unwrap_or_default(),
                description: def.description.to_string(),
            })
            .collect();
        infos.sort_by(|a, b| a.key.cmp(&b.key));
        infos
    }

    // ----- Typed accessors -----

    pub fn chat_url(&self) -> String {
        self.raw(Field::ChatUrl)
    }

    pub fn set_chat_url(&self, url: &str) {
        self.persist(Field::ChatUrl, url);
    }

    pub fn alerts_url(&self) -> String {
        self.raw(Field::AlertsUrl)
    }

    pub fn set_alerts_url(&self, url: &str) {
        self.persist(Field::AlertsUrl, url);
    }

    pub fn chat_background_opacity(&self) -> f64 {
        parse_f64(&self.raw(Field::ChatBackgroundOpacity), 0.5).clamp(0.0, 1.0)
    }

    pub fn content_opacity(&self) -> f64 {
        parse_f64(&self.raw(Field::ContentOpacity), 1.0).clamp(0.0, 1.0)
    }

    pub fn alerts_background_opacity(&self) -> f64 {
        parse_f64(&self.raw(Field::AlertsBackgroundOpacity), 1.0).clamp(0.0, 1.0)
    }

    /// Set one of the three opacity fields; out-of-range input stores the
    /// clamped boundary, never the raw value.
    pub fn set_opacity(&self, field: Field, value: f64) {
        debug_assert!(matches!(
            field,
            Field::ChatBackgroundOpacity | Field::ContentOpacity | Field::AlertsBackgroundOpacity
        ));
        let clamped = value.clamp(0.0, 1.0);
        self.persist(field, &format!("{clamped}"));
    }

    pub fn minimal_style(&self) -> bool {
        self.raw(Field::MinimalStyle) == "true"
    }

    pub fn set_minimal_style(&self, enabled: bool) {
        self.persist(Field::MinimalStyle, if enabled { "true" } else { "false" });
    }

    pub fn text_size(&self) -> TextSize {
        TextSize::from_raw(&self.raw(Field::TextSize))
    }

    pub fn set_text_size(&self, size: TextSize) {
        self.persist(Field::TextSize, size.as_str());
    }

    pub fn font_family(&self) -> String {
        let family = self.raw(Field::FontFamily);
        if family.is_empty() { "System".into() } else { family }
    }

    pub fn set_font_family(&self, family: &str) {
        self.persist(Field::FontFamily, family);
    }

    pub fn alert_keywords(&self) -> Vec<String> {
        let raw = self.raw(Field::AlertKeywords);
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(keywords) => normalize_keywords(keywords),
            Err(_) => Vec::new(),
        }
    }

    pub fn set_alert_keywords(&self, keywords: Vec<String>) {
        let normalized = normalize_keywords(keywords);
        let encoded =
            serde_json::to_string(&normalized).unwrap_or_else(|_| "[]".to_string());
        self.persist(Field::AlertKeywords, &encoded);
    }

    pub fn highlight_color(&self) -> String {
        let color = self.raw(Field::HighlightColor);
        if is_valid_hex_color(&color) {
            color
        } else {
            get_default("HIGHLIGHT_COLOR").unwrap_or("#FFFF00").to_string()
        }
    }

    pub fn set_highlight_color(&self, color: &str) {
        if !is_valid_hex_color(color) {
            tracing::warn!("Ignoring invalid highlight color: {color}");
            return;
        }
        self.persist(Field::HighlightColor, color);
    }

    pub fn hotkey_binding(&self) -> HotkeyBinding {
        HotkeyBinding {
            key_code: parse_u32(&self.raw(Field::HotkeyKeyCode), 10),
            modifiers: parse_u32(&self.raw(Field::HotkeyModifiers), 2),
        }
    }

    pub fn set_hotkey_binding(&self, binding: HotkeyBinding) {
        // Both keys land in the store before the single notify, so a
        // subscriber re-reading the binding never observes a mix of the
        // old and new values.
        for (field, value) in [
            (Field::HotkeyKeyCode, binding.key_code.to_string()),
            (Field::HotkeyModifiers, binding.modifiers.to_string()),
        ] {
            if let Some(key) = field.key() {
                if let Err(e) = self.inner.store.set(key, &value) {
                    tracing::error!("Failed to persist setting {key}: {e}");
                }
            }
        }
        self.notify(Field::HotkeyKeyCode);
    }

    // ----- Click-through (not persisted) -----

    pub fn click_through(&self) -> bool {
        self.inner.click_through.load(Ordering::Relaxed)
    }

    pub fn set_click_through(&self, enabled: bool) {
        self.inner.click_through.store(enabled, Ordering::Relaxed);
        self.notify(Field::ClickThrough);
    }

    /// Flip the shared flag; returns the new value.
    pub fn toggle_click_through(&self) -> bool {
        let enabled = !self.click_through();
        self.set_click_through(enabled);
        enabled
    }

    // ----- Window geometry -----

    pub fn window_geometry(&self, id: WindowId) -> Option<WindowGeometry> {
        let [kx, ky, kw, kh] = id.geometry_keys();
        let x = self.read_key(kx)?.parse::<i32>().ok()?;
        let y = self.read_key(ky)?.parse::<i32>().ok()?;
        let width = self.read_key(kw)?.parse::<u32>().ok().filter(|v| *v > 0)?;
        let height = self.read_key(kh)?.parse::<u32>().ok().filter(|v| *v > 0)?;
        Some(WindowGeometry {
            x,
            y,
            width,
            height,
        })
    }

    pub fn set_window_geometry(&self, id: WindowId, geometry: WindowGeometry) {
        let [kx, ky, kw, kh] = id.geometry_keys();
        for (key, value) in [
            (kx, geometry.x.to_string()),
            (ky, geometry.y.to_string()),
            (kw, geometry.width.to_string()),
            (kh, geometry.height.to_string()),
        ] {
            if let Err(e) = self.inner.store.set(key, &value) {
                tracing::error!("Failed to persist {key}: {e}");
            }
        }
        self.notify(id.geometry_field());
    }

    fn read_key(&self, key: &str) -> Option<String> {
        match self.inner.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to read setting {key}: {e}");
                None
            }
        }
    }
}

/// Trim, drop empties, and remove case-insensitive duplicates while
/// preserving first-seen order.
pub fn normalize_keywords(keywords: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for keyword in keywords {
        let keyword = keyword.trim().to_string();
        if keyword.is_empty() {
            continue;
        }
        let lowered = keyword.to_lowercase();
        if out.iter().any(|existing| existing.to_lowercase() == lowered) {
            continue;
        }
        out.push(keyword);
    }
    out
}

fn parse_f64(s: &str, default: f64) -> f64 {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}

fn parse_u32(s: &str, default: u32) -> u32 {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn test_service() -> SettingsService {
        let store = Store::open_in_memory().expect("Failed to create test store");
        let service = SettingsService::new(store);
        service.initialize_defaults().unwrap();
        service
    }

    #[test]
    fn opacity_set_stores_clamped_boundary() {
        let service = test_service();
        service.set_opacity(Field::ContentOpacity, 1.5);
        assert_eq!(service.content_opacity(), 1.0);
        service.set_opacity(Field::ContentOpacity, -0.3);
        assert_eq!(service.content_opacity(), 0.0);
        service.set_opacity(Field::ChatBackgroundOpacity, 0.25);
        assert_eq!(service.chat_background_opacity(), 0.25);
    }

    #[test]
    fn generic_set_clamps_opacity_too() {
        let service = test_service();
        service.set("CONTENT_OPACITY", "7.0").unwrap();
        assert_eq!(service.content_opacity(), 1.0);
    }

    #[test]
    fn generic_set_rejects_unknown_key_and_bad_values() {
        let service = test_service();
        assert!(service.set("NOT_A_KEY", "x").is_err());
        assert!(service.set("TEXT_SIZE", "gigantic").is_err());
        assert!(service.set("HIGHLIGHT_COLOR", "yellow").is_err());
        assert!(service.set("TEXT_SIZE", "large").is_ok());
        assert_eq!(service.text_size(), TextSize::Large);
    }

    #[test]
    fn geometry_round_trips() {
        let service = test_service();
        assert_eq!(service.window_geometry(WindowId::Chat), None);

        let geometry = WindowGeometry {
            x: -120,
            y: 48,
            width: 400,
            height: 600,
        };
        service.set_window_geometry(WindowId::Chat, geometry);
        assert_eq!(service.window_geometry(WindowId::Chat), Some(geometry));
        // The other window is untouched.
        assert_eq!(service.window_geometry(WindowId::Alerts), None);
    }

    #[test]
    fn click_through_is_not_persisted() {
        let store = Store::open_in_memory().unwrap();
        let service = SettingsService::new(store.clone());
        assert!(!service.click_through());
        assert!(service.toggle_click_through());
        assert!(service.click_through());

        // A fresh service over the same store starts with the flag off.
        let relaunched = SettingsService::new(store);
        assert!(!relaunched.click_through());
    }

    #[test]
    fn change_notifications_fan_out_without_dedup() {
        let service = test_service();
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_in_cb = Arc::clone(&hits);
        let subscription = service.on_change(&[Field::ContentOpacity], move |field| {
            assert_eq!(field, Field::ContentOpacity);
            hits_in_cb.fetch_add(1, Ordering::SeqCst);
        });

        service.set_opacity(Field::ContentOpacity, 0.8);
        // Identical value still re-notifies.
        service.set_opacity(Field::ContentOpacity, 0.8);
        // Unrelated field does not.
        service.set_chat_url("https://www.twitch.tv/popout/example/chat");
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        service.unsubscribe(subscription);
        service.set_opacity(Field::ContentOpacity, 0.5);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn subscriber_may_read_settings_from_the_callback() {
        let service = test_service();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_in_cb = Arc::clone(&seen);
        let service_in_cb = service.clone();
        let _sub = service.on_change(&[Field::HighlightColor], move |_| {
            seen_in_cb
                .lock()
                .unwrap()
                .push(service_in_cb.highlight_color());
        });
        service.set_highlight_color("#00FF00");
        assert_eq!(seen.lock().unwrap().as_slice(), ["#00FF00"]);
    }

    #[test]
    fn malformed_persisted_values_fall_back_to_defaults() {
        let store = Store::open_in_memory().unwrap();
        store.set("TEXT_SIZE", "gigantic").unwrap();
        store.set("HIGHLIGHT_COLOR", "banana").unwrap();
        store.set("CONTENT_OPACITY", "not a number").unwrap();

        let service = SettingsService::new(store);
        assert_eq!(service.text_size(), TextSize::Medium);
        assert_eq!(service.highlight_color(), "#FFFF00");
        assert_eq!(service.content_opacity(), 1.0);
    }

    #[test]
    fn invalid_highlight_color_set_is_ignored() {
        let service = test_service();
        service.set_highlight_color("#123456");
        service.set_highlight_color("nope");
        assert_eq!(service.highlight_color(), "#123456");
    }

    #[test]
    fn keywords_are_trimmed_and_deduped_case_insensitively() {
        let service = test_service();
        service.set_alert_keywords(vec![
            " hello ".into(),
            "Hello".into(),
            String::new(),
            "raid".into(),
        ]);
        assert_eq!(service.alert_keywords(), vec!["hello", "raid"]);
    }

    #[test]
    fn hotkey_binding_default_and_round_trip() {
        let service = test_service();
        let binding = service.hotkey_binding();
        assert_eq!(binding.key_code, 10);
        assert_eq!(binding.modifiers, 2);

        service.set_hotkey_binding(HotkeyBinding {
            key_code: 49,
            modifiers: 8,
        });
        let updated = service.hotkey_binding();
        assert_eq!(updated.key_code, 49);
        assert_eq!(updated.modifiers, 8);
    }

    #[test]
    fn hotkey_rebind_never_exposes_a_mixed_binding() {
        let service = test_service();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_in_cb = Arc::clone(&seen);
        let service_in_cb = service.clone();
        let _sub = service.on_change(
            &[Field::HotkeyKeyCode, Field::HotkeyModifiers],
            move |_| {
                seen_in_cb
                    .lock()
                    .unwrap()
                    .push(service_in_cb.hotkey_binding());
            },
        );

        let rebound = HotkeyBinding {
            key_code: 49,
            modifiers: 8,
        };
        service.set_hotkey_binding(rebound);

        // One notification, and the binding it observes is already whole.
        assert_eq!(seen.lock().unwrap().as_slice(), [rebound]);
    }

    #[test]
    fn all_settings_covers_every_scalar_field() {
        let service = test_service();
        let infos = service.all_settings();
        assert_eq!(infos.len(), 12);
        assert!(infos.iter().any(|i| i.key == "CHAT_URL"));
        assert!(infos.iter().all(|i| !i.description.is_empty()));
    }
}
