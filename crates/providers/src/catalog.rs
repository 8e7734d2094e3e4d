//! Assistant catalog sources: the remote listing call and a static list.

use async_trait::async_trait;
use saiachain_config::SaiaConfig;
use saiachain_core::catalog::{AssistantCatalog, AssistantOption, CatalogResponse};
use saiachain_core::error::CatalogError;
use std::time::Duration;
use tracing::debug;

/// Lists assistants via `GET {base}/assistants`.
pub struct RemoteCatalog {
    url: String,
    api_key: String,
    client: reqwest::Client,
}

impl RemoteCatalog {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::NotConfigured(format!("HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            api_key: api_key.into(),
            client,
        })
    }

    pub fn from_config(config: &SaiaConfig) -> Result<Self, CatalogError> {
        let url = config
            .assistant_catalog_url()
            .map_err(|e| CatalogError::NotConfigured(e.to_string()))?;
        let api_key = config
            .require_api_key()
            .map_err(|e| CatalogError::NotConfigured(e.to_string()))?;
        Self::new(url, api_key, Duration::from_secs(config.http.timeout_secs))
    }
}

#[async_trait]
impl AssistantCatalog for RemoteCatalog {
    fn name(&self) -> &str {
        "remote"
    }

    async fn list(&self) -> Result<Vec<AssistantOption>, CatalogError> {
        debug!(url = %self.url, "Fetching assistant catalog");

        let response = self
            .client
            .get(&self.url)
            .header("Authorization", self.api_key.as_str())
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError {
                status_code: status,
                message: body,
            });
        }

        let body: CatalogResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))?;

        let options = body.into_options();
        debug!(count = options.len(), "Assistant catalog fetched");
        Ok(options)
    }
}

/// A fixed list of options.
pub struct StaticCatalog {
    options: Vec<AssistantOption>,
}

impl StaticCatalog {
    pub fn new(options: Vec<AssistantOption>) -> Self {
        Self { options }
    }

    /// The single option offered when discovery is unavailable.
    pub fn contract_comparer() -> Self {
        Self::new(vec![AssistantOption {
            label: "ContractComparer".into(),
            name: "ContractComparer".into(),
            description: "Compare two contracts".into(),
        }])
    }

    pub fn options(&self) -> &[AssistantOption] {
        &self.options
    }
}

#[async_trait]
impl AssistantCatalog for StaticCatalog {
    fn name(&self) -> &str {
        "static"
    }

    async fn list(&self) -> Result<Vec<AssistantOption>, CatalogError> {
        Ok(self.options.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn remote(server: &MockServer) -> RemoteCatalog {
        RemoteCatalog::new(
            format!("{}/assistants", server.uri()),
            "saia-key",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn remote_catalog_lists_assistants() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/assistants"))
            .and(header("Authorization", "saia-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "assistants": [
                    {"assistantName": "Summarizer", "assistantDescription": "Summarize text"}
                ]
            })))
            .mount(&server)
            .await;

        let options = remote(&server).list().await.unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].name, "Summarizer");
        assert_eq!(options[0].description, "Summarize text");
    }

    #[tokio::test]
    async fn remote_catalog_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = remote(&server).list().await.unwrap_err();
        assert!(matches!(err, CatalogError::ApiError { status_code: 503, .. }));
    }

    #[tokio::test]
    async fn static_catalog_contract_comparer() {
        let options = StaticCatalog::contract_comparer().list().await.unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].label, "ContractComparer");
        assert_eq!(options[0].description, "Compare two contracts");
    }

    #[test]
    fn remote_from_config_requires_endpoint() {
        let config = SaiaConfig {
            api_key: Some("k".into()),
            ..SaiaConfig::default()
        };
        assert!(matches!(
            RemoteCatalog::from_config(&config),
            Err(CatalogError::NotConfigured(_))
        ));
    }
}
