//! Search providers
//!
//! A provider answers `search(term, limit)` with three parallel arrays of
//! titles, descriptions and urls. How the call is transported is up to the
//! implementation; the state machine only sees `SearchProvider`.

mod opensearch;
#[cfg(test)]
pub(crate) mod scripted;

pub use opensearch::OpenSearch;

use crate::suggest::Suggestion;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Failure talking to the search service
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned HTTP {0}")]
    Status(u16),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected response shape: {0}")]
    Malformed(String),
}

/// Trait for remote suggestion sources
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider name, used in logs
    fn name(&self) -> &str;

    /// Look up at most `limit` candidates for `term`
    async fn search(&self, term: &str, limit: u32) -> Result<ProviderResponse, ProviderError>;
}

/// Parallel arrays as returned by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderResponse {
    pub titles: Vec<String>,
    pub descriptions: Vec<String>,
    pub urls: Vec<String>,
}

impl ProviderResponse {
    /// Parse the `[queryEcho, titles, descriptions, urls]` tuple.
    ///
    /// The echo is ignored. A missing or non-array column counts as empty and
    /// non-string cells become empty strings so positions stay aligned.
    pub fn from_tuple(json: &serde_json::Value) -> Result<Self, ProviderError> {
        let tuple = json
            .as_array()
            .ok_or_else(|| ProviderError::Malformed("expected a JSON array".to_string()))?;

        let column = |idx: usize| -> Vec<String> {
            tuple
                .get(idx)
                .and_then(|v| v.as_array())
                .map(|arr| {
                    arr.iter()
                        .map(|v| v.as_str().unwrap_or_default().to_string())
                        .collect()
                })
                .unwrap_or_default()
        };

        Ok(Self {
            titles: column(1),
            descriptions: column(2),
            urls: column(3),
        })
    }

    /// Zip the columns positionally, truncated to the shortest one
    pub fn into_suggestions(self) -> Vec<Suggestion> {
        self.titles
            .into_iter()
            .zip(self.descriptions)
            .zip(self.urls)
            .filter_map(|((title, description), url)| {
                Suggestion::new(title).map(|s| s.with_description(description).with_url(url))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_tuple_ignores_echo() {
        let json = json!(["cat", ["Cat", "Category"], ["d1", "d2"], ["u1", "u2"]]);
        let response = ProviderResponse::from_tuple(&json).unwrap();
        assert_eq!(response.titles, vec!["Cat", "Category"]);
        assert_eq!(response.urls, vec!["u1", "u2"]);
    }

    #[test]
    fn test_from_tuple_rejects_non_array() {
        let json = json!({"error": "nope"});
        assert!(matches!(
            ProviderResponse::from_tuple(&json),
            Err(ProviderError::Malformed(_))
        ));
    }

    #[test]
    fn test_suggestions_truncate_to_shortest_column() {
        let json = json!(["x", ["A", "B", "C"], ["da", "db"], ["ua", "ub", "uc"]]);
        let items = ProviderResponse::from_tuple(&json)
            .unwrap()
            .into_suggestions();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title(), "A");
        assert_eq!(items[1].description(), Some("db"));
    }

    #[test]
    fn test_missing_column_yields_nothing() {
        let json = json!(["x", ["A", "B"]]);
        let items = ProviderResponse::from_tuple(&json)
            .unwrap()
            .into_suggestions();
        assert!(items.is_empty());
    }

    #[test]
    fn test_blank_titles_skipped_in_order() {
        let json = json!(["x", ["A", "", "C"], ["", "", ""], ["ua", "ub", "uc"]]);
        let items = ProviderResponse::from_tuple(&json)
            .unwrap()
            .into_suggestions();

        let titles: Vec<_> = items.iter().map(|s| s.title()).collect();
        assert_eq!(titles, vec!["A", "C"]);
        assert_eq!(items[1].url(), Some("uc"));
        assert_eq!(items[0].description(), None);
    }
}
