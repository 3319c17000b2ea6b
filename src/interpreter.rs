//! # Value Interpreter
//!
//! Computes the concrete value a node currently produces, for live swatches
//! and number readouts in the editor. It walks the same edges in the same
//! slot order as the CSS compiler but does the color math itself.
//!
//! Nothing is cached between calls; graphs are small and previews are
//! redrawn on every edit.

use crate::color::Color;
use crate::config::SlotOrder;
use crate::graph::{Graph, GraphIndex, Node, NodeKind, DEFAULT_COLOR};
use crate::ops::{parse_float, Operation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A node's concrete value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreviewValue {
    Number(f64),
    /// Color string, normally in OKLCH functional notation
    Color(String),
}

impl PreviewValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PreviewValue::Number(n) => Some(*n),
            PreviewValue::Color(_) => None,
        }
    }

    pub fn as_color(&self) -> Option<&str> {
        match self {
            PreviewValue::Color(color) => Some(color),
            PreviewValue::Number(_) => None,
        }
    }

    /// Short text for node UIs
    pub fn label(&self) -> String {
        match self {
            PreviewValue::Number(n) => n.to_string(),
            PreviewValue::Color(raw) => raw
                .parse::<Color>()
                .map(|color| color.label())
                .unwrap_or_else(|_| raw.clone()),
        }
    }

    /// Numeric reading of an operand; text parses as a float, 0 on failure
    fn coerce_number(&self) -> f64 {
        match self {
            PreviewValue::Number(n) => *n,
            PreviewValue::Color(text) => parse_float(text).unwrap_or(0.0),
        }
    }
}

impl fmt::Display for PreviewValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreviewValue::Number(n) => write!(f, "{n}"),
            PreviewValue::Color(color) => f.write_str(color),
        }
    }
}

/// Evaluates nodes of one graph snapshot
pub struct Interpreter<'a> {
    index: GraphIndex<'a>,
    slot_order: SlotOrder,
}

impl<'a> Interpreter<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self {
            index: GraphIndex::build(graph),
            slot_order: SlotOrder::default(),
        }
    }

    pub fn with_slot_order(mut self, slot_order: SlotOrder) -> Self {
        self.slot_order = slot_order;
        self
    }

    /// Value of node `id`, `None` if it doesn't exist or can't be resolved
    pub fn evaluate(&self, id: &str) -> Option<PreviewValue> {
        let node = self.index.node(id)?;
        self.evaluate_node(node, &mut HashSet::new())
    }

    fn evaluate_node(&self, node: &'a Node, stack: &mut HashSet<&'a str>) -> Option<PreviewValue> {
        match &node.kind {
            NodeKind::InputColor { color, .. } => {
                let color = if color.is_empty() { DEFAULT_COLOR } else { color };
                return Some(PreviewValue::Color(color.to_string()));
            }
            NodeKind::InputNumber { value, .. } => return Some(PreviewValue::Number(*value)),
            _ => {}
        }

        if !stack.insert(node.id.as_str()) {
            tracing::trace!("[OCGC] Node {} feeds into itself; treating as unset", node.id);
            return None;
        }

        let value = match Operation::of(&node.kind) {
            Some(op) => {
                let inputs: Vec<Option<PreviewValue>> = self
                    .index
                    .input_edges(node.id.as_str(), self.slot_order)
                    .into_iter()
                    .map(|edge| {
                        self.index
                            .node(edge.source.as_str())
                            .and_then(|source| self.evaluate_node(source, stack))
                    })
                    .collect();
                apply(op, inputs)
            }
            // Outputs preview whatever feeds them.
            None => self
                .index
                .producer_edge(node.id.as_str())
                .and_then(|edge| self.index.node(edge.source.as_str()))
                .and_then(|source| self.evaluate_node(source, stack)),
        };

        stack.remove(node.id.as_str());
        value
    }
}

/// Evaluate a single node of `graph`
pub fn evaluate_node(graph: &Graph, id: &str) -> Option<PreviewValue> {
    Interpreter::new(graph).evaluate(id)
}

fn apply(op: Operation, inputs: Vec<Option<PreviewValue>>) -> Option<PreviewValue> {
    let mut inputs = inputs.into_iter();
    let a = inputs.next().flatten();
    let b = inputs.next().flatten();

    if let Some(default_amount) = op.default_amount() {
        let PreviewValue::Color(raw) = a? else {
            return None;
        };
        let amount = b.map_or(default_amount, |value| value.coerce_number());
        return Some(recolor(raw, |color| match op {
            Operation::Lighten => color.with_lightness(color.lightness() + amount),
            Operation::Darken => color.with_lightness(color.lightness() - amount),
            Operation::Saturate => color.with_chroma(color.chroma() + amount),
            Operation::Desaturate => color.with_chroma(color.chroma() - amount),
            _ => color.with_hue(color.hue() + amount),
        }));
    }

    if let Some((first, second)) = op.default_operands() {
        let x = a.map_or(first, |value| value.coerce_number());
        let y = b.map_or(second, |value| value.coerce_number());
        let result = match op {
            Operation::Add => x + y,
            Operation::Subtract => x - y,
            Operation::Multiply => x * y,
            _ if y == 0.0 => 0.0,
            _ => x / y,
        };
        return Some(PreviewValue::Number(result));
    }

    match op {
        Operation::Mix => match (a, b) {
            (Some(PreviewValue::Color(first)), Some(PreviewValue::Color(second))) => {
                Some(mix(first, &second))
            }
            (a, b) => a.or(b),
        },
        Operation::Invert => match a? {
            PreviewValue::Color(raw) => Some(recolor(raw, |color| {
                color.with_lightness(1.0 - color.lightness())
            })),
            PreviewValue::Number(_) => None,
        },
        _ => match a? {
            PreviewValue::Color(raw) => {
                Some(recolor(raw, |color| color.with_hue(color.hue() + 180.0)))
            }
            PreviewValue::Number(_) => None,
        },
    }
}

/// Apply `f` in OKLCH; an unreadable color passes through unchanged
fn recolor(raw: String, f: impl FnOnce(Color) -> Color) -> PreviewValue {
    match raw.parse::<Color>() {
        Ok(color) => PreviewValue::Color(f(color).to_string()),
        Err(err) => {
            tracing::trace!("[OCGC] Keeping unreadable color '{}': {}", raw, err);
            PreviewValue::Color(raw)
        }
    }
}

fn mix(first: String, second: &str) -> PreviewValue {
    match (first.parse::<Color>(), second.parse::<Color>()) {
        (Ok(a), Ok(b)) => PreviewValue::Color(a.mix(b, 0.5).to_string()),
        _ => {
            tracing::trace!("[OCGC] Cannot mix '{}' with '{}'", first, second);
            PreviewValue::Color(first)
        }
    }
}
