use data_dict::host::HostShell;
use std::sync::{Arc, Mutex};

/// Shell that records everything the plugin asks of the host.
#[derive(Clone, Default)]
pub struct MockShell {
    pub notifications: Arc<Mutex<Vec<String>>>,
    pub sub_input: Arc<Mutex<Option<String>>>,
    pub navigations: Arc<Mutex<Vec<String>>>,
    pub opened: Arc<Mutex<Vec<String>>>,
    pub left_plugin: Arc<Mutex<bool>>,
    pub can_open: bool,
}

impl MockShell {
    pub fn with_open_external() -> Self {
        Self {
            can_open: true,
            ..Self::default()
        }
    }

    pub fn notes(&self) -> Vec<String> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn last_note(&self) -> Option<String> {
        self.notifications.lock().unwrap().last().cloned()
    }

    pub fn sub_input(&self) -> Option<String> {
        self.sub_input.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }
}

impl HostShell for MockShell {
    fn show_notification(&self, msg: &str) {
        self.notifications.lock().unwrap().push(msg.to_string());
    }

    fn supports_open_external(&self) -> bool {
        self.can_open
    }

    fn open_external(&self, url: &str) -> anyhow::Result<()> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }

    fn set_sub_input_value(&self, text: &str) {
        *self.sub_input.lock().unwrap() = Some(text.to_string());
    }

    fn navigate(&self, path: &str) {
        self.navigations.lock().unwrap().push(path.to_string());
    }

    fn out_plugin(&self) {
        *self.left_plugin.lock().unwrap() = true;
    }
}
