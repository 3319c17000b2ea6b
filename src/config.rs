//! # Compile Options
//!
//! Knobs shared by the compiler and the interpreter. Every field has a
//! default, so an empty JSON object is a valid configuration.

use crate::error::GraphError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// How edges into a multi-input node are ordered into slots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotOrder {
    /// Plain string comparison of handle ids (`"input-10"` < `"input-2"`)
    #[default]
    Lexicographic,
    /// Compare the integer suffix of handle ids, then the full id
    Numeric,
}

impl SlotOrder {
    /// Compare two target handles. A missing handle sorts as the empty string.
    pub fn compare(self, a: Option<&str>, b: Option<&str>) -> Ordering {
        let a = a.unwrap_or("");
        let b = b.unwrap_or("");
        match self {
            SlotOrder::Lexicographic => a.cmp(b),
            SlotOrder::Numeric => slot_index(a).cmp(&slot_index(b)).then_with(|| a.cmp(b)),
        }
    }
}

fn slot_index(handle: &str) -> Option<u64> {
    handle.rsplit('-').next().and_then(|tail| tail.parse().ok())
}

/// Options for [`crate::compile_graph_with_options`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompileOptions {
    /// Selector of the rendered rule block
    pub selector: String,
    pub slot_order: SlotOrder,
    /// Let later outputs reference earlier ones through `var(--name)`
    pub reuse_bindings: bool,
    /// Kebab-case every exported name before emission
    pub normalize_names: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            selector: ":root".to_string(),
            slot_order: SlotOrder::default(),
            reuse_bindings: true,
            normalize_names: false,
        }
    }
}

impl CompileOptions {
    /// Load options from a JSON object; missing members take their defaults
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(json)?)
    }
}
