//! # OKLCH Color Graph Compiler (OCGC)
//!
//! Turns a node graph of color and number operations into two things:
//!
//! - a list of CSS custom properties that express the graph as composable
//!   `calc()` / `color-mix()` / relative `oklch()` expressions, and
//! - a concrete preview value for any single node, computed from the current
//!   inputs.
//!
//! The graph itself is owned by the editor; every call here takes an
//! immutable snapshot and keeps no state between calls.
//!
//! ## Quick Start
//!
//! ```rust
//! use ocgc::{compile_stylesheet, evaluate_node, Direction, Graph, NodeKind, PreviewValue};
//!
//! let mut graph = Graph::new();
//! graph.add_node("base", NodeKind::InputColor {
//!     name: "base".into(),
//!     color: "oklch(0.5 0.2 180)".into(),
//! });
//! graph.add_node("lift", NodeKind::Lighten(Direction::Up));
//! graph.add_node("out", NodeKind::Output { name: "base-light".into() });
//! graph.connect("base", "lift", Some("input-0"));
//! graph.connect("lift", "out", None);
//!
//! let css = compile_stylesheet(&graph);
//! assert!(css.contains("--base-light: oklch(from var(--base) calc(l + 0.1) c h);"));
//!
//! let preview = evaluate_node(&graph, "lift");
//! assert_eq!(preview, Some(PreviewValue::Color("oklch(60% 0.2 180)".into())));
//! ```
//!
//! ## Architecture
//!
//! Compilation runs in three phases:
//!
//! 1. **Indexing** - Build id and incoming-edge maps over the snapshot
//! 2. **Dependency Resolution** - Order outputs so chained outputs reuse
//!    each other's variables
//! 3. **Code Generation** - Emit source variables, then one expression per
//!    output
//!
//! The preview [`Interpreter`] shares the graph model and operation table but
//! never goes through the compiler.

pub mod codegen;
pub mod color;
pub mod compiler;
pub mod config;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod graph;
pub mod interpreter;
pub mod names;
pub mod ops;
pub mod resolver;

// Re-export the main compilation API
pub use compiler::{
    compile_graph,
    compile_graph_with_options,
    compile_stylesheet,
    compile_stylesheet_with_options,
    render_stylesheet,
    CompileReport,
};

pub use codegen::CssVariable;
pub use color::{color_to_hex, Color, ColorParseError};
pub use config::{CompileOptions, SlotOrder};
pub use diagnostics::Diagnostic;
pub use document::{export_graph, import_graph, GraphDocument, DOCUMENT_VERSION};
pub use error::GraphError;
pub use graph::{Direction, Edge, Graph, GraphIndex, Node, NodeId, NodeKind, DEFAULT_COLOR};
pub use interpreter::{evaluate_node, Interpreter, PreviewValue};
pub use names::kebab_case;
pub use ops::Operation;
pub use resolver::{order_outputs, Resolution};
