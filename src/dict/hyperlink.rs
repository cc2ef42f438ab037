//! The `[display text|url]` cell format.
//!
//! A cell is a hyperlink only when its whole value is a single bracketed
//! pair. There is no escaping: `|` and `]` cannot appear inside either part.

use crate::dict::record::FieldValue;
use crate::host::HostShell;
use once_cell::sync::Lazy;
use regex::Regex;

static HYPERLINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[([^|]+)\|([^\]]+)\]$").unwrap_or_else(|e| panic!("hyperlink regex: {e}"))
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hyperlink {
    pub is_hyperlink: bool,
    pub display_text: String,
    pub url: String,
}

impl Hyperlink {
    fn plain(text: &str) -> Self {
        Self {
            is_hyperlink: false,
            display_text: text.to_string(),
            url: String::new(),
        }
    }
}

/// Parse `text` as a hyperlink cell. Non-matching text comes back untouched
/// as the display text with an empty url.
pub fn parse_hyperlink(text: &str) -> Hyperlink {
    match HYPERLINK_RE.captures(text) {
        Some(caps) => Hyperlink {
            is_hyperlink: true,
            display_text: caps[1].trim().to_string(),
            url: caps[2].trim().to_string(),
        },
        None => Hyperlink::plain(text),
    }
}

/// Parse a cell value. Only text values can be hyperlinks.
pub fn parse_value(value: &FieldValue) -> Hyperlink {
    match value {
        FieldValue::Text(s) => parse_hyperlink(s),
        other => Hyperlink::plain(&other.to_string()),
    }
}

/// Text that search should match: the visible label of a hyperlink, or the
/// text itself.
pub fn searchable_text(text: &str) -> String {
    parse_hyperlink(text).display_text
}

pub fn is_hyperlink_format(text: &str) -> bool {
    parse_hyperlink(text).is_hyperlink
}

/// Open `url` through the host shell when it can open external links,
/// otherwise in the system browser.
pub fn open_hyperlink(url: &str, shell: &dyn HostShell) -> anyhow::Result<()> {
    open_hyperlink_with(url, shell, |u| open::that(u))
}

pub(crate) fn open_hyperlink_with<F>(
    url: &str,
    shell: &dyn HostShell,
    fallback: F,
) -> anyhow::Result<()>
where
    F: FnOnce(&str) -> std::io::Result<()>,
{
    let url = url.trim();
    if url.is_empty() {
        return Ok(());
    }
    if shell.supports_open_external() {
        tracing::debug!(url, "opening hyperlink through host shell");
        shell.open_external(url)
    } else {
        tracing::debug!(url, "opening hyperlink in browser");
        fallback(url)?;
        Ok(())
    }
}
