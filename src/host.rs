use crate::toast_log::append_toast_log;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

/// Capabilities the launcher host offers to the plugin.
pub trait HostShell {
    /// Show a non-blocking notification to the user.
    fn show_notification(&self, msg: &str);

    /// Whether [`HostShell::open_external`] is available.
    fn supports_open_external(&self) -> bool {
        false
    }

    fn open_external(&self, url: &str) -> anyhow::Result<()> {
        anyhow::bail!("host cannot open {url}")
    }

    /// Replace the text of the host's sub-input field.
    fn set_sub_input_value(&self, _text: &str) {}

    /// Switch the plugin to the page at `path` (e.g. `#/list`).
    fn navigate(&self, path: &str) {
        tracing::debug!(path, "navigate");
    }

    /// Leave the plugin and hand focus back to the launcher.
    fn out_plugin(&self) {}
}

/// Shell that ignores everything. Useful for headless callers.
pub struct NullShell;

impl HostShell for NullShell {
    fn show_notification(&self, msg: &str) {
        tracing::debug!("notification suppressed: {msg}");
    }
}

/// Shell used by the standalone binary: each notification is written once
/// to its output (stderr by default) and, when enabled, to the toast log
/// file. Hyperlinks use the browser fallback.
pub struct DesktopShell {
    toast_log: Option<PathBuf>,
    out: Mutex<Box<dyn Write + Send>>,
}

impl DesktopShell {
    pub fn new(toast_log: Option<PathBuf>) -> Self {
        Self::with_writer(toast_log, Box::new(io::stderr()))
    }

    pub fn with_writer(toast_log: Option<PathBuf>, out: Box<dyn Write + Send>) -> Self {
        Self {
            toast_log,
            out: Mutex::new(out),
        }
    }
}

impl HostShell for DesktopShell {
    fn show_notification(&self, msg: &str) {
        tracing::debug!("notification: {msg}");
        match self.out.lock() {
            Ok(mut out) => {
                if let Err(e) = writeln!(out, "{msg}") {
                    tracing::warn!("failed to write notification: {e}");
                }
            }
            Err(_) => tracing::warn!("notification output lock poisoned"),
        }
        if let Some(path) = &self.toast_log {
            append_toast_log(path, msg);
        }
    }

    fn navigate(&self, path: &str) {
        tracing::info!(path, "navigate");
    }
}
