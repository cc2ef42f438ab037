use crate::dict::record::{is_reserved, Record, CREATE_TIME_FIELD, CREATE_TIME_FORMAT};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const CREATE_TIME_TITLE: &str = "Created";
pub const ACTION_TITLE: &str = "Action";
pub const ACTION_KEY: &str = "action";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascend,
    Descend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Plain data field.
    Field,
    /// Synthesized creation timestamp column.
    CreateTime,
    /// Rendering hook for edit/delete buttons, backed by no field.
    Action,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub title: String,
    /// Stable identifier of the column.
    pub key: String,
    /// Record field rendered in this column. `None` for the action column.
    pub field_key: Option<String>,
    pub kind: ColumnKind,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default)]
    pub default_sort: Option<SortOrder>,
}

impl ColumnSpec {
    pub fn field(name: &str) -> Self {
        Self {
            title: name.to_string(),
            key: name.to_string(),
            field_key: Some(name.to_string()),
            kind: ColumnKind::Field,
            sortable: false,
            default_sort: None,
        }
    }

    pub fn create_time() -> Self {
        Self {
            title: CREATE_TIME_TITLE.to_string(),
            key: CREATE_TIME_FIELD.to_string(),
            field_key: Some(CREATE_TIME_FIELD.to_string()),
            kind: ColumnKind::CreateTime,
            sortable: true,
            default_sort: Some(SortOrder::Descend),
        }
    }

    pub fn action() -> Self {
        Self {
            title: ACTION_TITLE.to_string(),
            key: ACTION_KEY.to_string(),
            field_key: None,
            kind: ColumnKind::Action,
            sortable: false,
            default_sort: None,
        }
    }

    /// Text shown in this column for `record`.
    pub fn cell(&self, record: &Record) -> String {
        self.field_key
            .as_deref()
            .map(|k| record.text(k))
            .unwrap_or_default()
    }
}

/// Non-reserved keys of the first record, in record order.
///
/// Only the first record is consulted, so collections whose records carry
/// different field sets produce ragged columns.
pub fn data_keys(records: &[Record]) -> Vec<String> {
    records
        .first()
        .map(|first| {
            first
                .keys()
                .filter(|k| !is_reserved(k))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Derive table columns from the first record of `records`.
///
/// Returns an empty list for empty input. The creation time column is always
/// the last data column; the action column, when requested, follows it.
pub fn infer_columns(records: &[Record], with_action: bool) -> Vec<ColumnSpec> {
    if records.is_empty() {
        return Vec::new();
    }
    columns_from_headers(&data_keys(records), with_action)
}

/// Build columns from an explicit header list.
pub fn columns_from_headers(headers: &[String], with_action: bool) -> Vec<ColumnSpec> {
    let mut cols: Vec<ColumnSpec> = headers
        .iter()
        .filter(|h| !is_reserved(h))
        .map(|h| ColumnSpec::field(h))
        .collect();
    cols.push(ColumnSpec::create_time());
    if with_action {
        cols.push(ColumnSpec::action());
    }
    cols
}

/// Split a manually typed header list on `,`, `;` or newlines. Tokens are
/// trimmed, empty tokens dropped and repeated names kept once.
pub fn parse_header_list(text: &str) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for token in text.split([',', ';', '\n']) {
        let token = token.trim();
        if token.is_empty() || headers.iter().any(|h| h == token) {
            continue;
        }
        headers.push(token.to_string());
    }
    headers
}

pub fn parse_create_time(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), CREATE_TIME_FORMAT).ok()
}

/// Order by creation time, newest first. Records without a parseable
/// timestamp sink to the end; ties keep their stored order.
pub fn sort_by_create_time(records: &mut [Record]) {
    records.sort_by(|a, b| {
        let ta = a.create_time().and_then(parse_create_time);
        let tb = b.create_time().and_then(parse_create_time);
        match (ta, tb) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

/// One input of the generated add/edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub key: String,
    pub label: String,
    pub value: String,
}

/// Generate the add/edit form for a collection from its columns. Only data
/// columns become inputs; `existing` pre-fills the values when editing.
pub fn form_fields(columns: &[ColumnSpec], existing: Option<&Record>) -> Vec<FormField> {
    columns
        .iter()
        .filter(|c| c.kind == ColumnKind::Field)
        .filter_map(|c| {
            let key = c.field_key.clone()?;
            let value = existing.map(|r| r.text(&key)).unwrap_or_default();
            Some(FormField {
                label: c.title.clone(),
                key,
                value,
            })
        })
        .collect()
}
