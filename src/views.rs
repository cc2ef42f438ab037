//! Page state for the entry, list, search and aggregate screens. Rendering
//! lives in the host; these types hold what the pages show and apply the
//! user's actions to the store.

pub mod aggregate;
pub mod input;
pub mod list;
pub mod search;

use crate::dict::Result;
use crate::host::HostShell;

/// Turn a failed operation into a notification. Validation problems are
/// shown as-is; storage failures are logged as well.
pub(crate) fn report<T>(shell: &dyn HostShell, result: Result<T>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) if e.is_validation() => {
            tracing::debug!("rejected: {e}");
            shell.show_notification(&e.to_string());
            None
        }
        Err(e) => {
            tracing::error!("operation failed: {e}");
            shell.show_notification(&format!("Operation failed: {e}"));
            None
        }
    }
}
