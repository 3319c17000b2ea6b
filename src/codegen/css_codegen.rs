//! # CSS Code Generator
//!
//! Walks the graph backward from each output and synthesizes a CSS
//! expression, remembering which nodes are already exported so later
//! references collapse to `var(--name)`.

use super::node_handlers::operation_expression;
use crate::config::CompileOptions;
use crate::diagnostics::Diagnostic;
use crate::graph::{Edge, GraphIndex, Node, NodeKind, DEFAULT_COLOR};
use crate::names::kebab_case;
use crate::ops::Operation;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// One CSS custom property declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CssVariable {
    /// Property name including the leading `--`
    pub name: String,
    pub value: String,
}

impl CssVariable {
    pub fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: format!("--{name}"),
            value: value.into(),
        }
    }
}

impl fmt::Display for CssVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {};", self.name, self.value)
    }
}

/// CSS custom-property generator over one graph snapshot
pub struct CssCodeGenerator<'a> {
    index: &'a GraphIndex<'a>,
    options: &'a CompileOptions,
    /// Node id -> exported name (without `--`)
    bindings: HashMap<&'a str, String>,
    /// Nodes whose inputs are being expanded right now
    in_progress: HashSet<&'a str>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> CssCodeGenerator<'a> {
    pub fn new(index: &'a GraphIndex<'a>, options: &'a CompileOptions) -> Self {
        Self {
            index,
            options,
            bindings: HashMap::new(),
            in_progress: HashSet::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Emit source variables, then one variable per output in `order`
    pub fn generate_variables(&mut self, order: &[&'a Node]) -> Vec<CssVariable> {
        let mut variables = Vec::new();

        self.emit_sources(&mut variables);
        tracing::debug!("[OCGC] Emitted {} source variables", variables.len());

        for &output in order {
            if let Some(variable) = self.emit_output(output) {
                variables.push(variable);
            }
        }

        variables
    }

    /// Problems recovered from while generating
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn emit_sources(&mut self, variables: &mut Vec<CssVariable>) {
        let index = self.index;
        for node in &index.graph().nodes {
            let (name, value) = match &node.kind {
                NodeKind::InputColor { name, color } => (name, color_literal(color)),
                NodeKind::InputNumber { name, value } => (name, value.to_string()),
                _ => continue,
            };

            if name.is_empty() {
                self.report(Diagnostic::UnnamedNode {
                    node: node.id.clone(),
                });
                continue;
            }

            let name = self.export_name(name);
            self.bindings.insert(node.id.as_str(), name.clone());
            variables.push(CssVariable::new(&name, value));
        }
    }

    fn emit_output(&mut self, output: &'a Node) -> Option<CssVariable> {
        let NodeKind::Output { name } = &output.kind else {
            return None;
        };

        if name.is_empty() {
            self.report(Diagnostic::UnnamedNode {
                node: output.id.clone(),
            });
            return None;
        }

        let Some(edge) = self.index.producer_edge(output.id.as_str()) else {
            self.report(Diagnostic::DisconnectedOutput {
                node: output.id.clone(),
            });
            return None;
        };

        let producer = self.source_node(edge)?;
        let expression = self.generate_expression(producer)?;
        let name = self.export_name(name);

        tracing::debug!(
            "[OCGC] Output {} -> --{} ({} bytes)",
            output.id,
            name,
            expression.len()
        );

        if self.options.reuse_bindings {
            self.bindings
                .entry(producer.id.as_str())
                .or_insert_with(|| name.clone());
        }

        Some(CssVariable::new(&name, expression))
    }

    /// Synthesize the CSS expression producing `node`'s value
    fn generate_expression(&mut self, node: &'a Node) -> Option<String> {
        if let Some(name) = self.bindings.get(node.id.as_str()) {
            tracing::trace!("[OCGC] Reusing --{} for node {}", name, node.id);
            return Some(format!("var(--{name})"));
        }

        match &node.kind {
            NodeKind::InputColor { color, .. } => return Some(color_literal(color)),
            NodeKind::InputNumber { value, .. } => return Some(value.to_string()),
            _ => {}
        }

        // Prevent infinite loops
        if !self.in_progress.insert(node.id.as_str()) {
            self.report(Diagnostic::CyclicInput {
                node: node.id.clone(),
            });
            return None;
        }

        let expression = match Operation::of(&node.kind) {
            Some(op) => {
                let inputs: Vec<Option<String>> = self
                    .index
                    .input_edges(node.id.as_str(), self.options.slot_order)
                    .into_iter()
                    .map(|edge| self.input_expression(edge))
                    .collect();
                Some(operation_expression(op, &inputs))
            }
            // An output used as an input passes its producer through.
            None => self
                .index
                .producer_edge(node.id.as_str())
                .and_then(|edge| self.input_expression(edge)),
        };

        self.in_progress.remove(node.id.as_str());
        expression
    }

    fn input_expression(&mut self, edge: &'a Edge) -> Option<String> {
        let source = self.source_node(edge)?;
        self.generate_expression(source)
    }

    fn source_node(&mut self, edge: &'a Edge) -> Option<&'a Node> {
        let node = self.index.node(edge.source.as_str());
        if node.is_none() {
            self.report(Diagnostic::MissingNode {
                edge: edge.id.clone(),
                node: edge.source.clone(),
            });
        }
        node
    }

    fn export_name(&self, name: &str) -> String {
        if self.options.normalize_names {
            kebab_case(name)
        } else {
            name.to_string()
        }
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        if !self.diagnostics.contains(&diagnostic) {
            tracing::debug!("[OCGC] {}", diagnostic);
            self.diagnostics.push(diagnostic);
        }
    }
}

fn color_literal(color: &str) -> String {
    if color.is_empty() {
        DEFAULT_COLOR.to_string()
    } else {
        color.to_string()
    }
}
