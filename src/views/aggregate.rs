use crate::dict::aggregate::leaf_records;
use crate::dict::schema::data_keys;
use crate::dict::{build_tree, AggregateConfig, DictRepository, TreeNode};
use crate::host::HostShell;
use crate::store::KvStore;
use crate::views::report;

/// Tree view of one collection grouped by its saved aggregate config.
#[derive(Debug, Default)]
pub struct AggregateView {
    collection: String,
    fields: Vec<String>,
    config: AggregateConfig,
    tree: Vec<TreeNode>,
}

impl AggregateView {
    /// Open `collection`, restoring its saved config.
    pub fn open<S: KvStore>(
        collection: &str,
        repo: &DictRepository<S>,
        shell: &dyn HostShell,
    ) -> Self {
        let mut view = Self {
            collection: collection.to_string(),
            ..Self::default()
        };
        view.config = report(shell, repo.aggregate_config(collection)).unwrap_or_default();
        view.rebuild(repo, shell);
        view
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Fields a level may group by.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn config(&self) -> &AggregateConfig {
        &self.config
    }

    pub fn tree(&self) -> &[TreeNode] {
        &self.tree
    }

    pub fn leaf_count(&self) -> usize {
        leaf_records(&self.tree).len()
    }

    /// Persist a new config and rebuild the tree.
    pub fn apply<S: KvStore>(
        &mut self,
        config: AggregateConfig,
        repo: &DictRepository<S>,
        shell: &dyn HostShell,
    ) -> bool {
        if report(shell, repo.save_aggregate_config(&self.collection, &config)).is_none() {
            return false;
        }
        self.config = config;
        self.rebuild(repo, shell);
        true
    }

    /// Forget the saved config; the tree becomes empty.
    pub fn reset<S: KvStore>(&mut self, repo: &DictRepository<S>, shell: &dyn HostShell) {
        if report(shell, repo.remove_aggregate_config(&self.collection)).is_some() {
            self.config.clear();
            self.tree.clear();
        }
    }

    fn rebuild<S: KvStore>(&mut self, repo: &DictRepository<S>, shell: &dyn HostShell) {
        let records = report(shell, repo.collection(&self.collection)).unwrap_or_default();
        self.fields = data_keys(&records);
        self.tree = build_tree(&records, &self.config);
    }
}
