use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const SETTINGS_FILE: &str = "settings.json";
pub const STORE_FILE: &str = "store.json";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    /// Directory holding the key-value store. If `None`, the platform data
    /// directory is used.
    #[serde(default)]
    pub data_dir: Option<String>,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Write log output to this file instead of stderr.
    #[serde(default)]
    pub log_file: Option<String>,
    /// Directory receiving `<collection>_data.json` exports. Defaults to the
    /// current directory.
    #[serde(default)]
    pub export_dir: Option<String>,
    /// Copy notifications into `toast.log` next to the store.
    #[serde(default = "default_toasts")]
    pub enable_toasts: bool,
    /// Show the edit/delete column in collection tables.
    #[serde(default = "default_action_column")]
    pub show_action_column: bool,
}

fn default_toasts() -> bool {
    true
}

fn default_action_column() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: None,
            debug_logging: false,
            log_file: None,
            export_dir: None,
            enable_toasts: default_toasts(),
            show_action_column: default_action_column(),
        }
    }
}

impl Settings {
    /// Load settings from `path`. A missing or empty file yields defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => PathBuf::from(dir),
            None => dirs_next::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("data_dict"),
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir().join(STORE_FILE)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn toast_log_path(&self) -> Option<PathBuf> {
        self.enable_toasts
            .then(|| self.data_dir().join(crate::toast_log::TOAST_LOG_FILE))
    }
}
