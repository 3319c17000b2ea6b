//! # Color Graph Compiler
//!
//! Main entry points for compiling color graphs to CSS custom properties.

use crate::codegen::{CssCodeGenerator, CssVariable};
use crate::config::CompileOptions;
use crate::diagnostics::Diagnostic;
use crate::graph::{Graph, GraphIndex};
use crate::resolver::order_outputs;
use serde::{Deserialize, Serialize};

/// Placeholder body for a graph that exports nothing
const EMPTY_BLOCK_COMMENT: &str = "/* Add nodes to generate CSS variables */";

/// Variables produced by a compile, plus what was recovered from on the way
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompileReport {
    pub variables: Vec<CssVariable>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileReport {
    /// Render the variables as one rule block
    pub fn stylesheet(&self, selector: &str) -> String {
        render_stylesheet(&self.variables, selector)
    }
}

/// Compile a color graph to CSS custom properties
///
/// This is the main entry point. Named color and number inputs become
/// literal variables; every named, connected output becomes a variable whose
/// value is a `calc()` / `color-mix()` / relative `oklch()` expression.
///
/// # Examples
///
/// ```rust
/// use ocgc::{compile_graph, Graph, NodeKind};
///
/// let mut graph = Graph::new();
/// graph.add_node("n", NodeKind::InputNumber { name: "x".into(), value: 5.0 });
///
/// let variables = compile_graph(&graph);
/// assert_eq!(variables[0].to_string(), "--x: 5;");
/// ```
pub fn compile_graph(graph: &Graph) -> Vec<CssVariable> {
    compile_graph_with_options(graph, &CompileOptions::default()).variables
}

/// Compile a color graph with explicit options
///
/// # Arguments
///
/// * `graph` - The graph snapshot to compile
/// * `options` - Slot ordering, binding reuse and name normalization
///
/// # Returns
///
/// The emitted variables and any diagnostics. Compilation itself never fails.
pub fn compile_graph_with_options(graph: &Graph, options: &CompileOptions) -> CompileReport {
    tracing::info!("[OCGC] Starting color graph compilation");
    tracing::info!(
        "[OCGC] Graph: {} nodes, {} edges",
        graph.nodes.len(),
        graph.edges.len()
    );

    // Phase 1: Build lookup maps
    tracing::info!("[OCGC] Phase 1: Indexing graph...");
    let index = GraphIndex::build(graph);

    // Phase 2: Order outputs so chained outputs can reuse each other
    tracing::info!("[OCGC] Phase 2: Resolving output dependencies...");
    let resolution = order_outputs(&index);
    tracing::info!("[OCGC]   - {} outputs in emission order", resolution.order.len());

    // Phase 3: Generate CSS
    tracing::info!("[OCGC] Phase 3: Generating CSS variables...");
    let mut generator = CssCodeGenerator::new(&index, options);
    let variables = generator.generate_variables(&resolution.order);

    let mut diagnostics = Vec::new();
    if !resolution.cycle.is_empty() {
        diagnostics.push(Diagnostic::CyclicOutputs {
            outputs: resolution.cycle,
        });
    }
    diagnostics.extend(generator.into_diagnostics());

    tracing::info!(
        "[OCGC] Compilation complete ({} variables, {} diagnostics)",
        variables.len(),
        diagnostics.len()
    );

    CompileReport {
        variables,
        diagnostics,
    }
}

/// Compile straight to a `:root { ... }` block
pub fn compile_stylesheet(graph: &Graph) -> String {
    compile_stylesheet_with_options(graph, &CompileOptions::default())
}

/// Compile to a rule block using `options.selector`
pub fn compile_stylesheet_with_options(graph: &Graph, options: &CompileOptions) -> String {
    compile_graph_with_options(graph, options).stylesheet(&options.selector)
}

/// Render variables as `selector { --name: value; ... }`, one per line
pub fn render_stylesheet(variables: &[CssVariable], selector: &str) -> String {
    if variables.is_empty() {
        return format!("{selector} {{\n  {EMPTY_BLOCK_COMMENT}\n}}");
    }

    let body = variables
        .iter()
        .map(|variable| format!("  {variable}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{selector} {{\n{body}\n}}")
}
