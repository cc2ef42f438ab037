use crate::dict::{DictError, DictRepository};
use crate::host::HostShell;
use crate::store::KvStore;
use crate::views::report;

pub const SAVED_MSG: &str = "Data saved";
pub const JSON_PLACEHOLDER: &str =
    r#"[{"age":22,"name":"lili","job":"courier"},{"age":28,"name":"erik","job":"engineer"}]"#;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputForm {
    pub json_data: String,
    pub keyword: String,
}

/// Data entry page. After a successful save the page waits for the user to
/// either continue with a fresh form or close the plugin.
#[derive(Debug, Default)]
pub struct InputView {
    pub form: InputForm,
    awaiting_confirm: bool,
}

impl InputView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn awaiting_confirm(&self) -> bool {
        self.awaiting_confirm
    }

    /// Validate and store the form. Returns the number of records saved, or
    /// `None` when the input was rejected.
    pub fn submit<S: KvStore>(
        &mut self,
        repo: &DictRepository<S>,
        shell: &dyn HostShell,
    ) -> Option<usize> {
        let result = if self.form.json_data.trim().is_empty() {
            Err(DictError::MissingField("JSON data"))
        } else if self.form.keyword.trim().is_empty() {
            Err(DictError::MissingField("keyword"))
        } else {
            repo.import_json(&self.form.keyword, &self.form.json_data)
        };
        let saved = report(shell, result)?;
        shell.show_notification(SAVED_MSG);
        self.awaiting_confirm = true;
        Some(saved.len())
    }

    /// Start over with an empty form.
    pub fn continue_entry(&mut self) {
        self.form = InputForm::default();
        self.awaiting_confirm = false;
    }

    pub fn close(&mut self, shell: &dyn HostShell) {
        self.awaiting_confirm = false;
        shell.out_plugin();
    }
}
