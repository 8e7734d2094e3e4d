//! HTTP collaborators of the SAIA chain.
//!
//! - `OpenAiChatModel` implements `saiachain_core::ChatModel` against the
//!   model proxy.
//! - `HttpAssistantTransport` implements `saiachain_core::AssistantTransport`.
//! - `RemoteCatalog`, `StaticCatalog` and `FallbackCatalog` implement
//!   `saiachain_core::AssistantCatalog`.

pub mod assistant;
pub mod catalog;
pub mod fallback;
pub mod openai_compat;

pub use assistant::HttpAssistantTransport;
pub use catalog::{RemoteCatalog, StaticCatalog};
pub use fallback::FallbackCatalog;
pub use openai_compat::OpenAiChatModel;

use saiachain_config::SaiaConfig;
use std::sync::Arc;

/// The catalog a host should offer: the remote listing backed by the static
/// option, or the static option alone when the remote is not configured.
pub fn assistant_catalog(config: &SaiaConfig) -> FallbackCatalog {
    match RemoteCatalog::from_config(config) {
        Ok(remote) => FallbackCatalog::with_static_fallback(Arc::new(remote)),
        Err(e) => {
            tracing::warn!(error = %e, "Remote assistant catalog unavailable, offering static list");
            FallbackCatalog::static_only()
        }
    }
}
