//! Suggestion and state types

use serde::{Deserialize, Serialize};

/// One candidate result returned by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

impl Suggestion {
    /// Create a suggestion; `None` when the title is blank
    pub fn new(title: impl Into<String>) -> Option<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return None;
        }
        Some(Self {
            title,
            description: None,
            url: None,
        })
    }

    /// Attach a description, ignoring empty text
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = non_empty(description.into());
        self
    }

    /// Attach a link target, ignoring empty text
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = non_empty(url.into());
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Whether this survived deserialization with a usable title
    pub(crate) fn is_valid(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// The single authoritative view of the suggestion lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestState {
    /// Nothing in flight: the term is too short or was cleared
    Idle { term: String, items: Vec<Suggestion> },
    /// A search for `term` is pending; `items` are the previous results
    Loading { term: String, items: Vec<Suggestion> },
    /// The search for `term` succeeded
    Done { term: String, items: Vec<Suggestion> },
    /// The search for `term` failed; `items` are the previous results
    Error {
        term: String,
        items: Vec<Suggestion>,
        message: String,
    },
}

impl SuggestState {
    /// Starting value: a restored snapshot if any, otherwise an empty idle state
    pub fn initial(restored: Option<(String, Vec<Suggestion>)>) -> Self {
        match restored {
            Some((term, items)) => SuggestState::Done { term, items },
            None => SuggestState::Idle {
                term: String::new(),
                items: Vec::new(),
            },
        }
    }

    pub fn term(&self) -> &str {
        match self {
            SuggestState::Idle { term, .. }
            | SuggestState::Loading { term, .. }
            | SuggestState::Done { term, .. }
            | SuggestState::Error { term, .. } => term,
        }
    }

    pub fn items(&self) -> &[Suggestion] {
        match self {
            SuggestState::Idle { items, .. }
            | SuggestState::Loading { items, .. }
            | SuggestState::Done { items, .. }
            | SuggestState::Error { items, .. } => items,
        }
    }

    /// Text for the status label
    pub fn status_text(&self) -> String {
        match self {
            SuggestState::Loading { .. } => "Loading…".to_string(),
            SuggestState::Error { message, .. } => format!("Error: {}", message),
            SuggestState::Idle { .. } | SuggestState::Done { .. } => String::new(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SuggestState::Loading { .. })
    }
}

impl Default for SuggestState {
    fn default() -> Self {
        Self::initial(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_title_rejected() {
        assert!(Suggestion::new("").is_none());
        assert!(Suggestion::new("   ").is_none());
        assert!(Suggestion::new("Cat").is_some());
    }

    #[test]
    fn test_empty_optionals_are_absent() {
        let s = Suggestion::new("Cat").unwrap().with_description("").with_url("");
        assert_eq!(s.description(), None);
        assert_eq!(s.url(), None);
    }

    #[test]
    fn test_serialized_shape() {
        let s = Suggestion::new("Cat").unwrap().with_url("https://x/Cat");
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json, serde_json::json!({"title": "Cat", "url": "https://x/Cat"}));
    }

    #[test]
    fn test_status_text() {
        let loading = SuggestState::Loading {
            term: "cat".into(),
            items: vec![],
        };
        assert_eq!(loading.status_text(), "Loading…");

        let error = SuggestState::Error {
            term: "cat".into(),
            items: vec![],
            message: "timed out".into(),
        };
        assert_eq!(error.status_text(), "Error: timed out");

        assert_eq!(SuggestState::default().status_text(), "");
    }

    #[test]
    fn test_initial_state() {
        assert_eq!(
            SuggestState::initial(None),
            SuggestState::Idle {
                term: String::new(),
                items: vec![]
            }
        );

        let items = vec![Suggestion::new("Cat").unwrap()];
        let state = SuggestState::initial(Some(("cat".into(), items.clone())));
        assert_eq!(state, SuggestState::Done { term: "cat".into(), items });
    }
}
