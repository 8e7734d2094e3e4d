//! Assistant catalog: the list of assistants a host can offer for selection.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// One selectable assistant, shaped for a host's option list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantOption {
    pub label: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A catalog entry as returned by the assistant service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub assistant_name: String,
    #[serde(default)]
    pub assistant_description: String,
}

/// Body of the catalog listing call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogResponse {
    #[serde(default)]
    pub assistants: Vec<CatalogEntry>,
}

impl From<CatalogEntry> for AssistantOption {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            label: entry.assistant_name.clone(),
            name: entry.assistant_name,
            description: entry.assistant_description,
        }
    }
}

impl CatalogResponse {
    pub fn into_options(self) -> Vec<AssistantOption> {
        self.assistants.into_iter().map(AssistantOption::from).collect()
    }
}

/// A source of assistant options.
#[async_trait]
pub trait AssistantCatalog: Send + Sync {
    /// A human-readable name for this catalog (e.g. "remote", "static").
    fn name(&self) -> &str;

    /// List the assistants this catalog knows about.
    async fn list(&self) -> Result<Vec<AssistantOption>, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn catalog_response_maps_to_options() {
        let body: CatalogResponse = serde_json::from_value(json!({
            "assistants": [
                {"assistantName": "Summarizer", "assistantDescription": "Summarize text"},
                {"assistantName": "Translator"}
            ]
        }))
        .unwrap();

        let options = body.into_options();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].label, "Summarizer");
        assert_eq!(options[0].name, "Summarizer");
        assert_eq!(options[0].description, "Summarize text");
        assert_eq!(options[1].description, "");
    }
}
