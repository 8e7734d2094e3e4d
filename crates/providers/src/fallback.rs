//! Catalog fallback: the remote listing, backed by the static option.
//!
//! Listing never fails. A failing or slow primary is logged and the static
//! `ContractComparer` option is offered instead.

use async_trait::async_trait;
use saiachain_core::catalog::{AssistantCatalog, AssistantOption};
use saiachain_core::error::CatalogError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::catalog::StaticCatalog;

/// Default time allowed for the primary catalog.
pub const DEFAULT_CATALOG_TIMEOUT: Duration = Duration::from_secs(30);

/// A primary catalog with a static fallback.
pub struct FallbackCatalog {
    primary: Option<Arc<dyn AssistantCatalog>>,
    fallback: StaticCatalog,
    timeout: Duration,
}

impl FallbackCatalog {
    /// `primary` first, then the static `ContractComparer` option.
    pub fn with_static_fallback(primary: Arc<dyn AssistantCatalog>) -> Self {
        Self {
            primary: Some(primary),
            fallback: StaticCatalog::contract_comparer(),
            timeout: DEFAULT_CATALOG_TIMEOUT,
        }
    }

    /// Only the static option; used when no remote catalog is configured.
    pub fn static_only() -> Self {
        Self {
            primary: None,
            fallback: StaticCatalog::contract_comparer(),
            timeout: DEFAULT_CATALOG_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    /// The options to offer. Infallible.
    pub async fn options(&self) -> Vec<AssistantOption> {
        let Some(primary) = &self.primary else {
            debug!("No remote catalog, offering static options");
            return self.fallback.options().to_vec();
        };

        match tokio::time::timeout(self.timeout, primary.list()).await {
            Ok(Ok(options)) => options,
            Ok(Err(e)) => {
                warn!(
                    catalog = primary.name(),
                    error = %e,
                    "Catalog failed, offering static options"
                );
                self.fallback.options().to_vec()
            }
            Err(_) => {
                warn!(
                    catalog = primary.name(),
                    timeout_secs = self.timeout.as_secs(),
                    "Catalog timed out, offering static options"
                );
                self.fallback.options().to_vec()
            }
        }
    }
}

#[async_trait]
impl AssistantCatalog for FallbackCatalog {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn list(&self) -> Result<Vec<AssistantOption>, CatalogError> {
        Ok(self.options().await)
    }
}
