use crate::dict::hyperlink::parse_value;
use crate::dict::record::Record;
use crate::dict::{DictError, Result};
use serde::{Deserialize, Serialize};

/// A `keyword[:search text]` query as typed into the launcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub keyword: String,
    #[serde(rename = "searchText")]
    pub search_text: String,
}

impl SearchQuery {
    pub fn new(keyword: impl Into<String>, search_text: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            search_text: search_text.into(),
        }
    }

    /// Split at the first `:`; further colons belong to the search text.
    /// Without a colon the whole text is the keyword.
    pub fn parse(text: &str) -> Self {
        match text.split_once(':') {
            Some((keyword, rest)) => Self::new(keyword.trim(), rest.trim()),
            None => Self::new(text.trim(), ""),
        }
    }

    /// Like [`SearchQuery::parse`] but both parts must be present.
    pub fn parse_strict(text: &str) -> Result<Self> {
        let query = Self::parse(text);
        if query.is_complete() {
            Ok(query)
        } else {
            Err(DictError::WrongFormat)
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.keyword.is_empty() && !self.search_text.is_empty()
    }
}

/// Case-insensitive substring match of `needle` against the visible text of
/// every data field. Hyperlink cells match on their label, not their url.
pub fn record_matches(record: &Record, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    record
        .data_fields()
        .any(|(_, v)| parse_value(v).display_text.to_lowercase().contains(&needle))
}

/// Records of one collection matching `search_text`.
///
/// An empty search text means nothing has been typed yet and yields no
/// records, unlike browsing a collection which lists everything.
pub fn filter_records(records: &[Record], search_text: &str) -> Vec<Record> {
    let search_text = search_text.trim();
    if search_text.is_empty() {
        return Vec::new();
    }
    records
        .iter()
        .filter(|r| record_matches(r, search_text))
        .cloned()
        .collect()
}
