//! # CSS Code Generation
//!
//! CSS custom-property generation for color graphs.

mod css_codegen;
pub mod node_handlers;

pub use css_codegen::*;
