use crate::dict::SearchQuery;
use crate::host::HostShell;
use serde::{Deserialize, Serialize};

pub const CODE_INPUT: &str = "dictinput";
pub const CODE_SEARCH: &str = "dict";
pub const CODE_LIST: &str = "dictlist";

pub const WRONG_FORMAT_MSG: &str = "Please use the format keyword:search text";

/// Activation event sent by the launcher host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnterAction {
    pub code: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl EnterAction {
    pub fn new(code: impl Into<String>, payload: impl Into<serde_json::Value>) -> Self {
        Self {
            code: code.into(),
            payload: payload.into(),
        }
    }

    fn payload_text(&self) -> Option<&str> {
        self.payload.as_str()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Input,
    Search(SearchQuery),
    List,
}

impl Route {
    /// Hash path of the page for this route.
    pub fn path(&self) -> String {
        match self {
            Route::Input => "#/input".into(),
            Route::List => "#/list".into(),
            Route::Search(q) => format!(
                "#/search?keyword={}&searchText={}",
                urlencoding::encode(&q.keyword),
                urlencoding::encode(&q.search_text)
            ),
        }
    }
}

/// Resolve the page for `action`. A malformed search payload notifies the
/// user and aborts navigation; unknown codes are ignored.
pub fn route(action: &EnterAction, shell: &dyn HostShell) -> Option<Route> {
    let route = match action.code.as_str() {
        CODE_INPUT => Route::Input,
        CODE_LIST => Route::List,
        CODE_SEARCH => {
            let parsed = action
                .payload_text()
                .map(SearchQuery::parse_strict);
            match parsed {
                Some(Ok(query)) => Route::Search(query),
                _ => {
                    tracing::warn!(payload = %action.payload, "malformed search payload");
                    shell.show_notification(WRONG_FORMAT_MSG);
                    return None;
                }
            }
        }
        other => {
            tracing::debug!(code = other, "ignoring unknown enter code");
            return None;
        }
    };
    shell.navigate(&route.path());
    Some(route)
}
