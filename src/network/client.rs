//! HTTP client for talking to the search provider

use super::user_agent::{accept_json, generate_user_agent};
use crate::config::OutgoingSettings;
use reqwest::{Client, Response};
use std::time::Duration;

/// Raw response as seen by a provider
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub text: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client wrapper with Suggest-RS specific configuration
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> reqwest::Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> reqwest::Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs_f64(settings.request_timeout))
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            default_timeout: Duration::from_secs_f64(settings.request_timeout),
            user_agent: generate_user_agent(settings.useragent_suffix.as_deref()),
        })
    }

    /// GET request with query parameters
    pub async fn get_with_params(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> reqwest::Result<HttpResponse> {
        let response = self
            .client
            .get(url)
            .timeout(self.default_timeout)
            .header("User-Agent", &self.user_agent)
            .header("Accept", accept_json())
            .query(params)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Parse response into HttpResponse
    async fn parse_response(response: Response) -> reqwest::Result<HttpResponse> {
        let status = response.status().as_u16();
        let text = response.text().await?;

        Ok(HttpResponse { status, text })
    }

    /// Get current user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_get_with_params_sends_query_and_agent() {
        let server = MockServer::start().await;
        let client = HttpClient::new().unwrap();

        Mock::given(method("GET"))
            .and(query_param("search", "rust lang"))
            .and(header("User-Agent", client.user_agent()))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;

        let response = client
            .get_with_params(&server.uri(), &[("search", "rust lang".to_string())])
            .await
            .unwrap();

        assert!(response.is_success());
        assert_eq!(response.text, "[]");
    }

    #[test]
    fn test_status_classification() {
        let response = HttpResponse {
            status: 503,
            text: String::new(),
        };
        assert!(!response.is_success());
        assert!(HttpResponse {
            status: 204,
            text: String::new(),
        }
        .is_success());
    }
}
