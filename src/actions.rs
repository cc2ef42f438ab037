use serde::{Deserialize, Serialize};

/// A launcher result row.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Action {
    pub label: String,
    pub desc: String,
    pub action: String, // `dict:open:<url>`, `dict:route:<code>`, `query:<text>`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
}
