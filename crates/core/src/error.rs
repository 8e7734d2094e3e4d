//! Error types for the SAIA chain domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all chain operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Assistant service errors ---
    #[error("Assistant error: {0}")]
    Assistant(#[from] AssistantError),

    // --- Catalog discovery errors ---
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    // --- Local chat model errors ---
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    // --- Memory errors ---
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Shorthand for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures of the outbound `assistant/chat` call.
///
/// A reply with `success: false` is *not* one of these; it is a business
/// outcome carried by the assistant response itself.
#[derive(Debug, Clone, Error)]
pub enum AssistantError {
    #[error("Assistant service not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unreadable assistant response (status: {status_code}): {message}")]
    Decode { status_code: u16, message: String },
}

/// Failures while listing the available assistants.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Catalog not configured: {0}")]
    NotConfigured(String),

    #[error("Catalog request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed catalog response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Model not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, Error)]
pub enum MemoryError {
    #[error("Storage error: {0}")]
    Storage(String),
}
