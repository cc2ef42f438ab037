use crate::actions::Action;
use crate::common::strip_prefix_ci;
use crate::dict::hyperlink::parse_value;
use crate::dict::search::{filter_records, SearchQuery};
use crate::dict::{DictRepository, Record};
use crate::plugin::Plugin;
use crate::router::{CODE_INPUT, CODE_LIST, CODE_SEARCH};
use crate::store::KvStore;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Launcher entry points for the data dictionary (prefixes: `dict`,
/// `dictlist`, `dictinput`).
pub struct DictPlugin<S> {
    repo: DictRepository<S>,
    matcher: SkimMatcherV2,
}

impl<S: KvStore> DictPlugin<S> {
    pub fn new(store: S) -> Self {
        Self {
            repo: DictRepository::new(store),
            matcher: SkimMatcherV2::default(),
        }
    }

    pub fn repository(&self) -> &DictRepository<S> {
        &self.repo
    }

    fn list(&self, filter: &str) -> Vec<Action> {
        let data = match self.repo.load() {
            Ok(d) => d,
            Err(e) => {
                tracing::error!("failed to load collections: {e}");
                return Vec::new();
            }
        };
        data.iter()
            .filter(|(name, _)| filter.is_empty() || self.matcher.fuzzy_match(name, filter).is_some())
            .map(|(name, records)| Action {
                label: format!("{name} ({})", records.len()),
                desc: "Dict".into(),
                action: format!("dict:route:{CODE_LIST}"),
                args: Some(name.clone()),
            })
            .collect()
    }

    fn suggest(&self, partial: &str) -> Vec<Action> {
        let names = match self.repo.names() {
            Ok(n) => n,
            Err(e) => {
                tracing::error!("failed to load collections: {e}");
                return Vec::new();
            }
        };
        names
            .into_iter()
            .filter(|n| partial.is_empty() || self.matcher.fuzzy_match(n, partial).is_some())
            .map(|n| Action {
                label: format!("{n}:"),
                desc: "Dict".into(),
                action: format!("query:{CODE_SEARCH} {n}:"),
                args: None,
            })
            .collect()
    }

    fn lookup(&self, query: &SearchQuery) -> Vec<Action> {
        let records = match self.repo.collection(&query.keyword) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(collection = %query.keyword, "failed to load collection: {e}");
                return Vec::new();
            }
        };
        filter_records(&records, &query.search_text)
            .iter()
            .map(|r| record_action(query, r))
            .collect()
    }
}

/// A search hit. Records holding a hyperlink open it; others open the
/// search page for the query.
fn record_action(query: &SearchQuery, record: &Record) -> Action {
    let cells: Vec<_> = record.data_fields().map(|(_, v)| parse_value(v)).collect();
    let label = cells
        .iter()
        .map(|c| c.display_text.as_str())
        .collect::<Vec<_>>()
        .join(" | ");
    match cells.iter().find(|c| c.is_hyperlink) {
        Some(link) => Action {
            label,
            desc: query.keyword.clone(),
            action: format!("dict:open:{}", link.url),
            args: None,
        },
        None => Action {
            label,
            desc: query.keyword.clone(),
            action: format!("dict:route:{CODE_SEARCH}"),
            args: Some(format!("{}:{}", query.keyword, query.search_text)),
        },
    }
}

impl<S: KvStore + Send + Sync> Plugin for DictPlugin<S> {
    fn search(&self, query: &str) -> Vec<Action> {
        let trimmed = query.trim();
        if trimmed.eq_ignore_ascii_case(CODE_INPUT) {
            return vec![Action {
                label: "dictinput: record new data".into(),
                desc: "Dict".into(),
                action: format!("dict:route:{CODE_INPUT}"),
                args: None,
            }];
        }
        if let Some(rest) = strip_prefix_ci(trimmed, CODE_LIST) {
            if rest.is_empty() || rest.starts_with(' ') {
                return self.list(rest.trim());
            }
        }
        if trimmed.eq_ignore_ascii_case(CODE_SEARCH) {
            return vec![Action {
                label: "Usage: dict <keyword>:<search text>".into(),
                desc: "Dict".into(),
                action: format!("query:{CODE_SEARCH} "),
                args: None,
            }];
        }
        const SEARCH_PREFIX: &str = "dict ";
        if let Some(rest) = strip_prefix_ci(trimmed, SEARCH_PREFIX) {
            let rest = rest.trim();
            if !rest.contains(':') {
                return self.suggest(rest);
            }
            let parsed = SearchQuery::parse(rest);
            return self.lookup(&parsed);
        }
        Vec::new()
    }

    fn name(&self) -> &str {
        "dict"
    }

    fn description(&self) -> &str {
        "Record and search small data tables (prefix: `dict`)"
    }

    fn capabilities(&self) -> &[&str] {
        &["search"]
    }

    fn commands(&self) -> Vec<Action> {
        vec![
            Action {
                label: "dict".into(),
                desc: "Dict".into(),
                action: format!("query:{CODE_SEARCH} "),
                args: None,
            },
            Action {
                label: "dictlist".into(),
                desc: "Dict".into(),
                action: format!("query:{CODE_LIST}"),
                args: None,
            },
            Action {
                label: "dictinput".into(),
                desc: "Dict".into(),
                action: format!("dict:route:{CODE_INPUT}"),
                args: None,
            },
        ]
    }
}
