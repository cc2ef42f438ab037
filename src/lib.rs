pub mod actions;
pub mod common;
pub mod dict;
pub mod host;
pub mod launcher;
pub mod logging;
pub mod plugin;
pub mod plugins;
pub mod router;
pub mod settings;
pub mod store;
pub mod theme;
pub mod toast_log;
pub mod views;
