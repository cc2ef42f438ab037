//! Keyword completion for the search sub-input.
//!
//! While the user types the keyword part of `keyword:search`, matching
//! collection names are offered. Tab or Enter on a suggestion completes the
//! input to `name:`; the arrow keys move the selection and wrap around.

use crate::dict::search::SearchQuery;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestEvent {
    TextChanged(String),
    Tab,
    ArrowUp,
    ArrowDown,
    Enter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestEffect {
    None,
    /// Replace the sub-input text.
    SetInput(String),
    /// Run the query.
    Submit(SearchQuery),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestState {
    pub query: String,
    pub suggestions: Vec<String>,
    pub selected: Option<usize>,
}

impl SuggestState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_suggestion(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.suggestions.get(i))
            .map(String::as_str)
    }

    /// Apply `event` given the currently known collection names.
    pub fn handle(&mut self, event: SuggestEvent, names: &[String]) -> SuggestEffect {
        match event {
            SuggestEvent::TextChanged(text) => {
                self.suggestions = if text.contains(':') {
                    Vec::new()
                } else {
                    rank_names(text.trim(), names)
                };
                self.selected = if self.suggestions.is_empty() {
                    None
                } else {
                    Some(0)
                };
                self.query = text;
                SuggestEffect::None
            }
            SuggestEvent::ArrowDown => {
                self.step(1);
                SuggestEffect::None
            }
            SuggestEvent::ArrowUp => {
                self.step(-1);
                SuggestEffect::None
            }
            SuggestEvent::Tab => self.complete().unwrap_or(SuggestEffect::None),
            SuggestEvent::Enter => self
                .complete()
                .unwrap_or_else(|| SuggestEffect::Submit(SearchQuery::parse(&self.query))),
        }
    }

    fn step(&mut self, delta: isize) {
        let len = self.suggestions.len();
        if len == 0 {
            self.selected = None;
            return;
        }
        let current = self.selected.unwrap_or(0) as isize;
        self.selected = Some((current + delta).rem_euclid(len as isize) as usize);
    }

    fn complete(&mut self) -> Option<SuggestEffect> {
        let name = self.selected_suggestion()?.to_string();
        self.query = format!("{name}:");
        self.suggestions.clear();
        self.selected = None;
        Some(SuggestEffect::SetInput(self.query.clone()))
    }
}

/// Names fuzzily matching `pattern`, best first; ties keep store order.
/// An empty pattern offers nothing.
fn rank_names(pattern: &str, names: &[String]) -> Vec<String> {
    if pattern.is_empty() {
        return Vec::new();
    }
    let matcher = SkimMatcherV2::default();
    let mut scored: Vec<(i64, &String)> = names
        .iter()
        .filter_map(|n| matcher.fuzzy_match(n, pattern).map(|s| (s, n)))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, n)| n.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        vec!["people".into(), "pets".into(), "links".into()]
    }

    #[test]
    fn typing_offers_matching_names() {
        let mut s = SuggestState::new();
        s.handle(SuggestEvent::TextChanged("pe".into()), &names());
        assert!(s.suggestions.contains(&"people".to_string()));
        assert!(s.suggestions.contains(&"pets".to_string()));
        assert!(!s.suggestions.contains(&"links".to_string()));
        assert_eq!(s.selected, Some(0));
    }

    #[test]
    fn colon_stops_suggesting() {
        let mut s = SuggestState::new();
        s.handle(SuggestEvent::TextChanged("pe:".into()), &names());
        assert!(s.suggestions.is_empty());
        assert_eq!(s.selected, None);
    }

    #[test]
    fn arrows_wrap_and_tab_completes() {
        let mut s = SuggestState::new();
        s.handle(SuggestEvent::TextChanged("pe".into()), &names());
        let len = s.suggestions.len();
        s.handle(SuggestEvent::ArrowUp, &names());
        assert_eq!(s.selected, Some(len - 1));
        s.handle(SuggestEvent::ArrowDown, &names());
        assert_eq!(s.selected, Some(0));
        let first = s.suggestions[0].clone();
        let effect = s.handle(SuggestEvent::Tab, &names());
        assert_eq!(effect, SuggestEffect::SetInput(format!("{first}:")));
        assert!(s.suggestions.is_empty());
    }

    #[test]
    fn enter_without_suggestions_submits() {
        let mut s = SuggestState::new();
        s.handle(SuggestEvent::TextChanged("people:tom".into()), &names());
        let effect = s.handle(SuggestEvent::Enter, &names());
        assert_eq!(effect, SuggestEffect::Submit(SearchQuery::new("people", "tom")));
    }

    #[test]
    fn keys_without_suggestions_do_nothing() {
        let mut s = SuggestState::new();
        assert_eq!(s.handle(SuggestEvent::Tab, &names()), SuggestEffect::None);
        s.handle(SuggestEvent::ArrowDown, &names());
        assert_eq!(s.selected, None);
    }
}
