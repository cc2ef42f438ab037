use data_dict::settings::Settings;
use data_dict::store::{JsonFileStore, KvStore, MemoryStore};
use data_dict::theme::{Palette, ThemeConfig, ThemeController, THEME_CONFIG_KEY};
use once_cell::sync::Lazy;
use std::sync::Mutex;
use tempfile::tempdir;

static TEST_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

#[test]
fn theme_defaults_to_following_system() {
    let store = MemoryStore::new();
    let theme = ThemeController::new(&store, true).unwrap();
    assert_eq!(theme.config(), ThemeConfig::system(true));
    assert_eq!(theme.config().palette(), Some(Palette::dark()));

    let raw = store.get(THEME_CONFIG_KEY).unwrap().unwrap();
    assert_eq!(raw["followSystem"], true);
    assert_eq!(raw["isDarkMode"], true);
}

#[test]
fn system_change_only_applies_when_following() {
    let store = MemoryStore::new();
    let mut theme = ThemeController::new(&store, false).unwrap();
    theme.system_changed(true).unwrap();
    assert!(theme.config().is_dark_mode);

    theme
        .update(ThemeConfig {
            follow_system: false,
            is_dark_mode: false,
        })
        .unwrap();
    theme.system_changed(true).unwrap();
    assert!(!theme.config().is_dark_mode);
    assert_eq!(theme.config().palette(), None);

    let reloaded = ThemeConfig::load(&store, true).unwrap();
    assert!(!reloaded.follow_system);
    assert!(!reloaded.is_dark_mode);
}

#[test]
fn theme_survives_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");
    {
        let mut theme = ThemeController::new(JsonFileStore::new(&path), false).unwrap();
        theme
            .update(ThemeConfig {
                follow_system: false,
                is_dark_mode: true,
            })
            .unwrap();
    }
    let theme = ThemeController::new(JsonFileStore::new(&path), false).unwrap();
    assert!(theme.config().is_dark_mode);
    assert!(!theme.config().follow_system);
}

#[test]
fn missing_settings_file_gives_defaults() {
    let _lock = TEST_MUTEX.lock().unwrap();
    let dir = tempdir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    let settings = Settings::load("settings.json").unwrap();
    assert!(settings.enable_toasts);
    assert!(settings.show_action_column);
    assert!(!settings.debug_logging);
    assert_eq!(settings.export_dir(), std::path::PathBuf::from("."));
}

#[test]
fn settings_round_trip_and_partial_files() {
    let _lock = TEST_MUTEX.lock().unwrap();
    let dir = tempdir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    std::fs::write("settings.json", r#"{"data_dir":"store_here","enable_toasts":false}"#).unwrap();
    let mut settings = Settings::load("settings.json").unwrap();
    assert_eq!(
        settings.store_path(),
        std::path::Path::new("store_here").join("store.json")
    );
    assert_eq!(settings.toast_log_path(), None);
    assert!(settings.show_action_column);

    settings.debug_logging = true;
    settings.save("settings.json").unwrap();
    let reloaded = Settings::load("settings.json").unwrap();
    assert!(reloaded.debug_logging);
    assert_eq!(reloaded.data_dir.as_deref(), Some("store_here"));
}
