use crate::actions::Action;
use crate::dict::hyperlink::open_hyperlink;
use crate::host::HostShell;
use crate::router::{route, EnterAction};

#[derive(Debug, PartialEq, Eq)]
enum ActionKind<'a> {
    OpenUrl(&'a str),
    Route { code: &'a str, payload: Option<&'a str> },
    Query(&'a str),
    Unknown(&'a str),
}

fn parse_action_kind(action: &Action) -> ActionKind<'_> {
    let s = action.action.as_str();
    if let Some(url) = s.strip_prefix("dict:open:") {
        return ActionKind::OpenUrl(url);
    }
    if let Some(code) = s.strip_prefix("dict:route:") {
        return ActionKind::Route {
            code,
            payload: action.args.as_deref(),
        };
    }
    if let Some(q) = s.strip_prefix("query:") {
        return ActionKind::Query(q);
    }
    ActionKind::Unknown(s)
}

/// Execute a launcher action produced by the dictionary plugin.
pub fn launch_action(action: &Action, shell: &dyn HostShell) -> anyhow::Result<()> {
    match parse_action_kind(action) {
        ActionKind::OpenUrl(url) => open_hyperlink(url, shell),
        ActionKind::Route { code, payload } => {
            let enter = EnterAction::new(code, payload.unwrap_or_default());
            route(&enter, shell);
            Ok(())
        }
        ActionKind::Query(q) => {
            shell.set_sub_input_value(q);
            Ok(())
        }
        ActionKind::Unknown(s) => {
            tracing::warn!(action = s, "unknown action");
            Ok(())
        }
    }
}
