use crate::dict::Result;
use crate::store::KvStore;
use serde::{Deserialize, Serialize};

pub const THEME_CONFIG_KEY: &str = "theme_config";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    pub follow_system: bool,
    pub is_dark_mode: bool,
}

impl ThemeConfig {
    /// Follow the system and adopt its current preference.
    pub fn system(system_dark: bool) -> Self {
        Self {
            follow_system: true,
            is_dark_mode: system_dark,
        }
    }

    /// Stored config, or [`ThemeConfig::system`] when nothing is saved.
    pub fn load<S: KvStore>(store: &S, system_dark: bool) -> Result<Self> {
        Ok(store
            .load(THEME_CONFIG_KEY)?
            .unwrap_or_else(|| Self::system(system_dark)))
    }

    pub fn save<S: KvStore>(&self, store: &S) -> Result<()> {
        store.save(THEME_CONFIG_KEY, self)
    }

    /// React to the system switching between light and dark. Returns true
    /// when the config changed.
    pub fn on_system_change(&mut self, system_dark: bool) -> bool {
        if !self.follow_system || self.is_dark_mode == system_dark {
            return false;
        }
        self.is_dark_mode = system_dark;
        true
    }

    /// Colour overrides for dark mode. Light mode uses the defaults.
    pub fn palette(&self) -> Option<Palette> {
        self.is_dark_mode.then(Palette::dark)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub color_bg_container: &'static str,
    pub color_bg_elevated: &'static str,
    pub color_bg_layout: &'static str,
    pub color_text: &'static str,
    pub color_text_secondary: &'static str,
    pub color_border: &'static str,
    pub color_border_secondary: &'static str,
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            color_bg_container: "#2a2a2a",
            color_bg_elevated: "#333333",
            color_bg_layout: "#1f1f1f",
            color_text: "rgba(255, 255, 255, 0.85)",
            color_text_secondary: "rgba(255, 255, 255, 0.65)",
            color_border: "#434343",
            color_border_secondary: "#404040",
        }
    }
}

/// Theme state bound to a store: every change is written back.
pub struct ThemeController<S> {
    store: S,
    config: ThemeConfig,
}

impl<S: KvStore> ThemeController<S> {
    pub fn new(store: S, system_dark: bool) -> Result<Self> {
        let config = ThemeConfig::load(&store, system_dark)?;
        config.save(&store)?;
        Ok(Self { store, config })
    }

    pub fn config(&self) -> ThemeConfig {
        self.config
    }

    pub fn update(&mut self, config: ThemeConfig) -> Result<()> {
        self.config = config;
        self.config.save(&self.store)
    }

    pub fn system_changed(&mut self, system_dark: bool) -> Result<()> {
        if self.config.on_system_change(system_dark) {
            tracing::debug!(dark = system_dark, "following system theme");
            self.config.save(&self.store)?;
        }
        Ok(())
    }
}
