mod app;
mod hotkey;
mod overlay;
mod settings;
mod tray;

use std::path::PathBuf;

use overlay_store::Store;
use tauri::Manager;
use tracing_subscriber::EnvFilter;

use settings::{SettingInfo, SettingsService, WindowId};

#[tauri::command]
fn get_settings(state: tauri::State<'_, app::SharedState>) -> Vec<SettingInfo> {
    state.settings().all_settings()
}

#[tauri::command]
fn set_setting(
    state: tauri::State<'_, app::SharedState>,
    key: String,
    value: String,
) -> Result<(), String> {
    state
        .settings()
        .set(&key, &value)
        .map_err(|e| e.to_string())
}

#[tauri::command]
fn toggle_overlay(
    app: tauri::AppHandle,
    label: String,
) -> Result<bool, String> {
    let id = WindowId::from_label(&label).ok_or_else(|| format!("unknown window: {label}"))?;
    let visible = overlay::toggle_window_visibility(&app, id).map_err(|e| e.to_string())?;
    tray::refresh(&app);
    Ok(visible)
}

#[tauri::command]
fn toggle_click_through(state: tauri::State<'_, app::SharedState>) -> bool {
    state.settings().toggle_click_through()
}

#[tauri::command]
fn get_version() -> &'static str {
    "1.0.0"
}

/// Determine the data directory for the application.
/// Priority: CHAT_OVERLAY_DATA_DIR env var > ~/.chat-overlay
fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CHAT_OVERLAY_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".chat-overlay")
}

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

/// Open the store, seed defaults, and build the settings service.
fn init_settings() -> Result<SettingsService, anyhow::Error> {
    load_dotenv();

    let dir = data_dir();
    std::fs::create_dir_all(&dir)?;
    let db_path = dir.join("local.db");

    tracing::info!("Opening store at {}", db_path.display());
    let store = Store::open(&db_path)?;

    let settings = SettingsService::new(store);
    settings.initialize_defaults()?;

    Ok(settings)
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = init_settings().expect("Failed to initialize settings");
    let shared_state = app::SharedState::new(settings.clone());

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_global_shortcut::Builder::new().build())
        .manage(shared_state)
        .setup(move |app| {
            let handle = app.handle();
            overlay::initialize(handle, &settings)?;
            tray::setup_tray(handle, &settings)?;
            hotkey::setup(handle, &settings)?;
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            get_settings,
            set_setting,
            toggle_overlay,
            toggle_click_through,
            get_version,
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|app_handle, event| {
        if let tauri::RunEvent::ExitRequested { .. } = event {
            let state = app_handle.state::<app::SharedState>();
            overlay::persist_all_geometry(app_handle, state.settings());
        }
    });
}
