//! Supporting documents supplied by the host for a single turn.
//!
//! The host does not guarantee a flat list: entries may be documents,
//! nested lists of documents, or placeholders (`null`, stray scalars).
//! `DocumentInput` accepts all of these so that deserialization never fails
//! on an irregular list; the normalizer decides what is usable.

use serde::{Deserialize, Serialize};

/// A document whose text is injected into the assistant's context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupportingDocument {
    /// The text content. Absent content deserializes as empty.
    #[serde(rename = "pageContent", default)]
    pub page_content: String,

    /// Arbitrary metadata attached by the loader.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl SupportingDocument {
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: serde_json::Map::new(),
        }
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn has_content(&self) -> bool {
        !self.page_content.is_empty()
    }
}

/// One entry of the host-supplied document list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentInput {
    /// A single document.
    Document(SupportingDocument),
    /// A nested list, as produced by loaders that return several documents.
    List(Vec<DocumentInput>),
    /// Anything else: `null`, numbers, strings.
    Other(serde_json::Value),
}

impl DocumentInput {
    /// A `null` placeholder entry.
    pub fn null() -> Self {
        Self::Other(serde_json::Value::Null)
    }

    /// The document, if this entry is one.
    pub fn as_document(&self) -> Option<&SupportingDocument> {
        match self {
            Self::Document(doc) => Some(doc),
            _ => None,
        }
    }
}

impl From<SupportingDocument> for DocumentInput {
    fn from(doc: SupportingDocument) -> Self {
        Self::Document(doc)
    }
}

impl From<Vec<SupportingDocument>> for DocumentInput {
    fn from(docs: Vec<SupportingDocument>) -> Self {
        Self::List(docs.into_iter().map(Self::Document).collect())
    }
}
