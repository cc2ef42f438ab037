//! Hierarchical grouping of flat records into a tree.
//!
//! Each aggregation level names the fields whose values bucket the records at
//! that depth. Groups keep the order in which their first record was seen.
//! Below the deepest level every group lists a header node followed by one
//! leaf per member record, showing only the fields no level consumed.

use crate::dict::record::{is_reserved, FieldValue, Record};
use crate::dict::schema::data_keys;
use hashlink::LinkedHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AggregationLevel {
    #[serde(default)]
    pub columns: Vec<String>,
}

impl AggregationLevel {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

/// Ordered levels; level 0 is the root grouping.
pub type AggregateConfig = Vec<AggregationLevel>;

/// Composite key of one group. Each segment is the display value of one
/// level column, `None` when the record has no value for it. Comparing the
/// segments directly means `("a-b", "c")` and `("a", "b-c")` stay apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct GroupKey(Vec<Option<String>>);

impl GroupKey {
    pub fn for_record(record: &Record, columns: &[String]) -> Self {
        GroupKey(
            columns
                .iter()
                .map(|c| match record.get(c) {
                    None | Some(FieldValue::Null) => None,
                    Some(v) => Some(v.to_string()),
                })
                .collect(),
        )
    }

    pub fn segments(&self) -> &[Option<String>] {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, seg) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("-")?;
            }
            f.write_str(seg.as_deref().unwrap_or(""))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Group {
        key: GroupKey,
        /// `(column, value)` pairs of this level.
        values: Vec<(String, Option<String>)>,
        count: usize,
    },
    /// Column names of the leaves that follow.
    Header { columns: Vec<String> },
    Leaf { values: Vec<(String, String)> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// Unique within one tree and stable across rebuilds of the same input.
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub children: Vec<TreeNode>,
    /// Records under this node. Leaves hold exactly their own record.
    pub records: Vec<Record>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Label with the record count of group nodes, e.g. `region: E (2)`.
    pub fn title(&self) -> String {
        match &self.kind {
            NodeKind::Group { count, .. } => format!("{} ({count})", self.label),
            _ => self.label.clone(),
        }
    }

    /// All leaf records below this node in tree order.
    pub fn leaf_records(&self) -> Vec<&Record> {
        let mut out = Vec::new();
        collect_leaves(std::slice::from_ref(self), &mut out);
        out
    }
}

/// Every leaf record reachable from `nodes`, in tree order.
pub fn leaf_records(nodes: &[TreeNode]) -> Vec<&Record> {
    let mut out = Vec::new();
    collect_leaves(nodes, &mut out);
    out
}

fn collect_leaves<'a>(nodes: &'a [TreeNode], out: &mut Vec<&'a Record>) {
    for node in nodes {
        if node.is_leaf() {
            out.extend(node.records.iter());
        } else {
            collect_leaves(&node.children, out);
        }
    }
}

/// Fields shown at the leaves: the first record's data fields minus every
/// field any level groups by.
pub fn leaf_columns(records: &[Record], config: &[AggregationLevel]) -> Vec<String> {
    data_keys(records)
        .into_iter()
        .filter(|k| !config.iter().any(|l| l.columns.iter().any(|c| c == k)))
        .collect()
}

/// Group `records` into a tree following `config`.
///
/// An empty config or an empty record list yields no nodes. Columns missing
/// from a record contribute an empty segment instead of failing.
pub fn build_tree(records: &[Record], config: &[AggregationLevel]) -> Vec<TreeNode> {
    if config.is_empty() || records.is_empty() {
        return Vec::new();
    }
    let leaf_cols = leaf_columns(records, config);
    let members: Vec<&Record> = records.iter().collect();
    group_level(&members, config, 0, "", &leaf_cols)
}

fn group_level(
    records: &[&Record],
    config: &[AggregationLevel],
    depth: usize,
    parent_id: &str,
    leaf_cols: &[String],
) -> Vec<TreeNode> {
    let columns = &config[depth].columns;
    let mut groups: LinkedHashMap<GroupKey, Vec<&Record>> = LinkedHashMap::new();
    for &record in records {
        let key = GroupKey::for_record(record, columns);
        if let Some(members) = groups.get_mut(&key) {
            members.push(record);
        } else {
            groups.insert(key, vec![record]);
        }
    }

    groups
        .into_iter()
        .enumerate()
        .map(|(idx, (key, members))| {
            let id = child_id(parent_id, &idx.to_string());
            let values: Vec<(String, Option<String>)> = columns
                .iter()
                .cloned()
                .zip(key.segments().iter().cloned())
                .collect();
            let count = records
                .iter()
                .filter(|r| GroupKey::for_record(r, columns) == key)
                .count();
            let children = if depth + 1 < config.len() {
                group_level(&members, config, depth + 1, &id, leaf_cols)
            } else {
                leaf_nodes(&members, &id, leaf_cols)
            };
            TreeNode {
                label: group_label(&values),
                kind: NodeKind::Group { key, values, count },
                children,
                records: members.into_iter().cloned().collect(),
                id,
            }
        })
        .collect()
}

fn leaf_nodes(members: &[&Record], parent_id: &str, leaf_cols: &[String]) -> Vec<TreeNode> {
    let mut nodes = Vec::with_capacity(members.len() + 1);
    nodes.push(TreeNode {
        id: child_id(parent_id, "header"),
        label: leaf_cols.join(" | "),
        kind: NodeKind::Header {
            columns: leaf_cols.to_vec(),
        },
        children: Vec::new(),
        records: Vec::new(),
    });
    for (idx, record) in members.iter().enumerate() {
        let values: Vec<(String, String)> = leaf_cols
            .iter()
            .filter(|c| !is_reserved(c))
            .map(|c| (c.clone(), record.text(c)))
            .collect();
        let suffix = match record.id() {
            Some(rid) => format!("r:{rid}"),
            None => format!("r#{idx}"),
        };
        nodes.push(TreeNode {
            id: child_id(parent_id, &suffix),
            label: values
                .iter()
                .map(|(_, v)| v.as_str())
                .collect::<Vec<_>>()
                .join(" | "),
            kind: NodeKind::Leaf { values },
            children: Vec::new(),
            records: vec![(*record).clone()],
        });
    }
    nodes
}

fn group_label(values: &[(String, Option<String>)]) -> String {
    values
        .iter()
        .map(|(c, v)| format!("{c}: {}", v.as_deref().unwrap_or("")))
        .collect::<Vec<_>>()
        .join(", ")
}

fn child_id(parent: &str, part: &str) -> String {
    if parent.is_empty() {
        part.to_string()
    } else {
        format!("{parent}/{part}")
    }
}
