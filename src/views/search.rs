use crate::dict::suggest::{SuggestEffect, SuggestEvent, SuggestState};
use crate::dict::{filter_records, infer_columns, ColumnSpec, DictRepository, Record, SearchQuery};
use crate::host::HostShell;
use crate::store::KvStore;
use crate::views::report;

pub const SUB_INPUT_PLACEHOLDER: &str = "keyword:search text (e.g. people:tom)";
pub const NO_DATA_MSG: &str = "No data found, use dictinput to record some";

/// Search page driven by the host's sub-input.
#[derive(Debug, Default)]
pub struct SearchView {
    query: SearchQuery,
    columns: Vec<ColumnSpec>,
    results: Vec<Record>,
    suggest: SuggestState,
}

impl SearchView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn results(&self) -> &[Record] {
        &self.results
    }

    pub fn suggestions(&self) -> &SuggestState {
        &self.suggest
    }

    pub fn title(&self) -> String {
        if self.results.is_empty() {
            "Search results".to_string()
        } else {
            format!("Search results ({})", self.results.len())
        }
    }

    /// Enter the page with a query from the launcher.
    pub fn open<S: KvStore>(
        &mut self,
        query: SearchQuery,
        repo: &DictRepository<S>,
        shell: &dyn HostShell,
    ) {
        shell.set_sub_input_value(&format!("{}:{}", query.keyword, query.search_text));
        self.query = query;
        self.refresh(repo, shell);
    }

    /// The sub-input text changed.
    pub fn on_sub_input<S: KvStore>(
        &mut self,
        text: &str,
        repo: &DictRepository<S>,
        shell: &dyn HostShell,
    ) {
        let names = report(shell, repo.names()).unwrap_or_default();
        self.suggest
            .handle(SuggestEvent::TextChanged(text.to_string()), &names);
        if text.is_empty() {
            self.query = SearchQuery::default();
            self.reset();
            return;
        }
        self.query = SearchQuery::parse(text);
        self.refresh(repo, shell);
    }

    /// A navigation key was pressed in the sub-input.
    pub fn on_key<S: KvStore>(
        &mut self,
        event: SuggestEvent,
        repo: &DictRepository<S>,
        shell: &dyn HostShell,
    ) {
        let names = report(shell, repo.names()).unwrap_or_default();
        match self.suggest.handle(event, &names) {
            SuggestEffect::None => {}
            SuggestEffect::SetInput(text) => {
                shell.set_sub_input_value(&text);
                self.query = SearchQuery::parse(&text);
                self.refresh(repo, shell);
            }
            SuggestEffect::Submit(query) => {
                self.query = query;
                self.refresh(repo, shell);
            }
        }
    }

    /// Leave the page, clearing the sub-input.
    pub fn close(&mut self, shell: &dyn HostShell) {
        shell.set_sub_input_value("");
        self.query = SearchQuery::default();
        self.suggest = SuggestState::new();
        self.reset();
    }

    fn reset(&mut self) {
        self.columns.clear();
        self.results.clear();
    }

    fn refresh<S: KvStore>(&mut self, repo: &DictRepository<S>, shell: &dyn HostShell) {
        // A keyword without search text shows nothing until a term is typed.
        if !self.query.is_complete() {
            self.reset();
            return;
        }
        let Some(records) = report(shell, repo.collection(&self.query.keyword)) else {
            self.reset();
            return;
        };
        if records.is_empty() {
            shell.show_notification(NO_DATA_MSG);
            self.reset();
            return;
        }
        self.columns = infer_columns(&records, false);
        self.results = filter_records(&records, &self.query.search_text);
        tracing::debug!(
            keyword = %self.query.keyword,
            hits = self.results.len(),
            "search refreshed"
        );
    }
}
