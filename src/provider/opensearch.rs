//! MediaWiki opensearch provider

use super::{ProviderError, ProviderResponse, SearchProvider};
use crate::config::ProviderSettings;
use crate::network::HttpClient;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;
use url::Url;

/// Opensearch endpoint (`action=opensearch`, `format=json`)
pub struct OpenSearch {
    client: HttpClient,
    api_url: Url,
    namespace: String,
    timeout: Duration,
}

impl OpenSearch {
    pub fn new(client: HttpClient, api_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            client,
            api_url: Url::parse(api_url)?,
            namespace: "0".to_string(),
            timeout: Duration::from_secs(5),
        })
    }

    pub fn from_settings(
        client: HttpClient,
        settings: &ProviderSettings,
    ) -> Result<Self, url::ParseError> {
        Ok(Self::new(client, &settings.api_url)?
            .with_namespace(settings.namespace.clone())
            .with_timeout(settings.timeout()))
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Rewrite relative links against the API base so every url is absolute
    fn absolutize(&self, url: String) -> String {
        if url.is_empty() {
            return url;
        }
        match self.api_url.join(&url) {
            Ok(absolute) => absolute.to_string(),
            Err(_) => url,
        }
    }
}

#[async_trait]
impl SearchProvider for OpenSearch {
    fn name(&self) -> &str {
        "opensearch"
    }

    async fn search(&self, term: &str, limit: u32) -> Result<ProviderResponse, ProviderError> {
        let params = [
            ("action", "opensearch".to_string()),
            ("search", term.to_string()),
            ("limit", limit.to_string()),
            ("namespace", self.namespace.clone()),
            ("format", "json".to_string()),
        ];

        debug!("Querying {} for {:?}", self.api_url, term);

        let response = match timeout(
            self.timeout,
            self.client.get_with_params(self.api_url.as_str(), &params),
        )
        .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) if e.is_timeout() => return Err(ProviderError::Timeout(self.timeout)),
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => return Err(ProviderError::Timeout(self.timeout)),
        };

        if !response.is_success() {
            return Err(ProviderError::Status(response.status));
        }

        let json: serde_json::Value = serde_json::from_str(&response.text)?;
        let mut parsed = ProviderResponse::from_tuple(&json)?;
        parsed.urls = parsed
            .urls
            .into_iter()
            .map(|u| self.absolutize(u))
            .collect();

        Ok(parsed)
    }
}
