//! # Graph Documents
//!
//! The JSON envelope the editor downloads and uploads:
//! `{ nodes, edges, version, exportedAt }`. Only `nodes` and `edges` are
//! required on import; the version is carried but not checked.

use crate::error::GraphError;
use crate::graph::{Edge, Graph, Node};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Version written into exported documents
pub const DOCUMENT_VERSION: &str = "1.0.0";

/// A saved graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDocument {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub version: String,
    /// ISO 8601 timestamp supplied by the exporting side
    #[serde(default)]
    pub exported_at: String,
}

impl GraphDocument {
    pub fn new(graph: Graph, exported_at: impl Into<String>) -> Self {
        Self {
            nodes: graph.nodes,
            edges: graph.edges,
            version: DOCUMENT_VERSION.to_string(),
            exported_at: exported_at.into(),
        }
    }

    pub fn into_graph(self) -> Graph {
        Graph {
            nodes: self.nodes,
            edges: self.edges,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, GraphError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Read a graph from a document, requiring both `nodes` and `edges`
pub fn import_graph(json: &str) -> Result<Graph, GraphError> {
    let value: Value = serde_json::from_str(json)?;

    let has_member = |key: &str| value.get(key).is_some_and(|member| !member.is_null());
    if !has_member("nodes") || !has_member("edges") {
        return Err(GraphError::InvalidDocument(
            "the file must contain nodes and edges".to_string(),
        ));
    }

    let document: GraphDocument = serde_json::from_value(value)?;
    tracing::info!(
        "[OCGC] Imported graph: {} nodes, {} edges (version '{}')",
        document.nodes.len(),
        document.edges.len(),
        document.version
    );
    Ok(document.into_graph())
}

/// Write `graph` as a pretty-printed document stamped with `exported_at`
pub fn export_graph(graph: &Graph, exported_at: &str) -> Result<String, GraphError> {
    GraphDocument::new(graph.clone(), exported_at).to_json_pretty()
}
