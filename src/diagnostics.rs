//! # Diagnostics
//!
//! Conditions the compiler recovers from on its own. They never abort a
//! compile; they are collected next to the emitted variables so the editor
//! can surface them.

use crate::graph::NodeId;
use serde::{Deserialize, Serialize};

/// A recovered-from problem found while compiling a graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Diagnostic {
    /// An edge points at a node id that isn't in the graph
    #[error("Edge '{edge}' references missing node '{node}'")]
    MissingNode { edge: String, node: NodeId },

    /// A source or output has no export name and emits nothing
    #[error("Node '{node}' has no export name")]
    UnnamedNode { node: NodeId },

    /// An output has no incoming edge and emits nothing
    #[error("Output '{node}' is not connected")]
    DisconnectedOutput { node: NodeId },

    /// No output was free of pending dependencies; these were emitted in
    /// snapshot order instead
    #[error("Outputs depend on each other in a cycle: {}", join(outputs))]
    CyclicOutputs { outputs: Vec<NodeId> },

    /// A node was reached again while its own inputs were being expanded
    #[error("Node '{node}' feeds into itself")]
    CyclicInput { node: NodeId },
}

fn join(ids: &[NodeId]) -> String {
    ids.iter()
        .map(NodeId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
