//! # Errors
//!
//! Hard failures only happen at the import boundary. Compilation and preview
//! evaluation recover locally and report through [`crate::Diagnostic`].

/// Errors raised while loading a graph from JSON
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A node carries a `type` tag outside the closed set of kinds
    #[error("Unknown node type '{kind}' on node '{id}'")]
    UnknownNodeKind { id: String, kind: String },

    /// The document envelope is missing required members
    #[error("Invalid graph document: {0}")]
    InvalidDocument(String),

    /// Malformed JSON
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}
