use std::sync::Arc;

use crate::settings::SettingsService;

/// Application shared state accessible from Tauri commands and event
/// handlers.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    /// Settings service over the key-value store
    settings: SettingsService,
}

impl SharedState {
    pub fn new(settings: SettingsService) -> Self {
        Self {
            inner: Arc::new(SharedStateInner { settings }),
        }
    }

    pub fn settings(&self) -> &SettingsService {
        &self.inner.settings
    }
}
