//! Supporting documents → numbered context variables.

use saiachain_core::assistant::ContextVariable;
use saiachain_core::document::{DocumentInput, SupportingDocument};

/// Key prefix of every document variable.
pub const DOCUMENT_KEY_PREFIX: &str = "document";

/// Normalize the host's document list.
///
/// One level of nesting is flattened. Entries that are not documents, or
/// whose content is empty, are dropped. Survivors are numbered from 1 in
/// order and have curly braces removed so the remote side never reads them
/// as template placeholders.
pub fn normalize_documents(documents: &[DocumentInput]) -> Vec<ContextVariable> {
    documents
        .iter()
        .flat_map(flatten_once)
        .filter(|doc| doc.has_content())
        .enumerate()
        .map(|(i, doc)| ContextVariable {
            key: format!("{DOCUMENT_KEY_PREFIX}{}", i + 1),
            value: strip_braces(&doc.page_content),
        })
        .collect()
}

fn flatten_once(entry: &DocumentInput) -> Vec<&SupportingDocument> {
    match entry {
        DocumentInput::Document(doc) => vec![doc],
        DocumentInput::List(items) => items.iter().filter_map(DocumentInput::as_document).collect(),
        DocumentInput::Other(_) => Vec::new(),
    }
}

fn strip_braces(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '{' | '}')).collect()
}
