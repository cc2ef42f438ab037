use crate::dict::schema::{form_fields, sort_by_create_time, FormField};
use crate::dict::{Collections, ColumnSpec, DictError, DictRepository, Record, Result};
use crate::host::HostShell;
use crate::store::KvStore;
use crate::views::report;
use std::path::{Path, PathBuf};

pub const EMPTY_MSG: &str = "No data yet, use dictinput to record some";
pub const NOTHING_SELECTED_MSG: &str = "Select the records to delete";
pub const NO_ACTIVE_MSG: &str = "Select a collection first";

/// Browse page: one tab per collection with a selectable table.
#[derive(Debug, Default)]
pub struct ListView {
    data: Collections,
    active: Option<String>,
    columns: Vec<ColumnSpec>,
    selected: Vec<String>,
    with_action: bool,
}

impl ListView {
    pub fn new(with_action: bool) -> Self {
        Self {
            with_action,
            ..Self::default()
        }
    }

    /// Load every collection and activate the first tab.
    pub fn load<S: KvStore>(&mut self, repo: &DictRepository<S>, shell: &dyn HostShell) {
        let Some(data) = report(shell, repo.load()) else {
            return;
        };
        self.data = data;
        let first = self.data.keys().next().cloned();
        self.activate(first, repo, shell);
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// `(key, label)` per tab, labelled with the record count.
    pub fn tabs(&self) -> Vec<(String, String)> {
        self.data
            .iter()
            .map(|(name, records)| (name.clone(), format!("{name} ({})", records.len())))
            .collect()
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// Rows of the active tab, newest first.
    pub fn rows(&self) -> Vec<Record> {
        let mut rows = self
            .active
            .as_ref()
            .and_then(|name| self.data.get(name))
            .cloned()
            .unwrap_or_default();
        sort_by_create_time(&mut rows);
        rows
    }

    /// Activate the tab of `name`. An unknown name is reported and leaves
    /// the current tab untouched.
    pub fn switch_tab<S: KvStore>(
        &mut self,
        name: &str,
        repo: &DictRepository<S>,
        shell: &dyn HostShell,
    ) -> bool {
        if !self.data.contains_key(name) {
            let missing: Result<()> = Err(DictError::UnknownCollection(name.to_string()));
            report(shell, missing);
            return false;
        }
        self.activate(Some(name.to_string()), repo, shell);
        true
    }

    pub fn set_selection(&mut self, ids: Vec<String>) {
        self.selected = ids;
    }

    pub fn toggle_selected(&mut self, id: &str) {
        if let Some(pos) = self.selected.iter().position(|s| s == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id.to_string());
        }
    }

    /// Delete the selected records of the active tab (after the user
    /// confirmed). Returns how many were removed.
    pub fn delete_selected<S: KvStore>(
        &mut self,
        repo: &DictRepository<S>,
        shell: &dyn HostShell,
    ) -> usize {
        if self.selected.is_empty() {
            shell.show_notification(NOTHING_SELECTED_MSG);
            return 0;
        }
        let Some(active) = self.active.clone() else {
            shell.show_notification(NO_ACTIVE_MSG);
            return 0;
        };
        let Some(removed) = report(shell, repo.delete_records(&active, &self.selected)) else {
            return 0;
        };
        self.reload(repo, shell);
        shell.show_notification("Deleted");
        removed
    }

    /// Remove the active collection entirely (after the user confirmed).
    pub fn clear_active<S: KvStore>(&mut self, repo: &DictRepository<S>, shell: &dyn HostShell) -> bool {
        let Some(active) = self.active.clone() else {
            shell.show_notification(NO_ACTIVE_MSG);
            return false;
        };
        if report(shell, repo.clear_collection(&active)).is_none() {
            return false;
        }
        self.reload(repo, shell);
        shell.show_notification("Cleared");
        true
    }

    /// Create an empty collection from a header list and switch to it.
    pub fn create_collection<S: KvStore>(
        &mut self,
        name: &str,
        headers: &str,
        repo: &DictRepository<S>,
        shell: &dyn HostShell,
    ) -> bool {
        if report(shell, repo.create_collection(name, headers)).is_none() {
            return false;
        }
        self.reload(repo, shell);
        self.switch_tab(name.trim(), repo, shell)
    }

    /// Inputs of the add form, or of the edit form for record `id`.
    pub fn form(&self, id: Option<&str>) -> Vec<FormField> {
        let existing = id.and_then(|id| {
            self.active
                .as_ref()
                .and_then(|name| self.data.get(name))
                .and_then(|records| records.iter().find(|r| r.id() == Some(id)))
        });
        form_fields(&self.columns, existing)
    }

    /// Save the add form (`id == None`) or the edit form of record `id`.
    pub fn save_form<S: KvStore>(
        &mut self,
        id: Option<&str>,
        values: Vec<(String, String)>,
        repo: &DictRepository<S>,
        shell: &dyn HostShell,
    ) -> bool {
        let Some(active) = self.active.clone() else {
            shell.show_notification(NO_ACTIVE_MSG);
            return false;
        };
        let result = match id {
            Some(id) => repo.update_record(&active, id, values),
            None => repo.add_record(&active, values),
        };
        if report(shell, result).is_none() {
            return false;
        }
        self.reload(repo, shell);
        true
    }

    /// Export the active collection into `dir`.
    pub fn export_active<S: KvStore>(
        &self,
        dir: &Path,
        repo: &DictRepository<S>,
        shell: &dyn HostShell,
    ) -> Option<PathBuf> {
        let Some(active) = self.active.as_deref() else {
            shell.show_notification(NO_ACTIVE_MSG);
            return None;
        };
        let path = report(shell, repo.export_collection(active, dir))?;
        shell.show_notification(&format!("Exported to {}", path.display()));
        Some(path)
    }

    /// Re-read the store, keeping the active tab when it still exists.
    fn reload<S: KvStore>(&mut self, repo: &DictRepository<S>, shell: &dyn HostShell) {
        let Some(data) = report(shell, repo.load()) else {
            return;
        };
        self.data = data;
        let keep = self
            .active
            .clone()
            .filter(|name| self.data.contains_key(name))
            .or_else(|| self.data.keys().next().cloned());
        self.activate(keep, repo, shell);
    }

    fn activate<S: KvStore>(
        &mut self,
        name: Option<String>,
        repo: &DictRepository<S>,
        shell: &dyn HostShell,
    ) {
        self.selected.clear();
        self.columns = match &name {
            Some(n) => report(shell, repo.columns(n, self.with_action)).unwrap_or_default(),
            None => Vec::new(),
        };
        self.active = name;
    }
}
