// flowmig_ast - Abstract call-expression tree for the flowmig rewrite engine
//! Tree definitions the rewrite engine is specified against.
//!
//! The host parser produces a [`CompilationUnit`] with resolved type
//! information attached to call nodes; the engine mutates the tree logically
//! (node replaced by its rewritten equivalent) and the host re-serializes it.

pub mod comments;
pub mod expression;
pub mod render;
pub mod statement;
pub mod types;

pub use comments::*;
pub use expression::*;
pub use render::{render_expression, render_statement, render_unit, SourceBuilder};
pub use statement::*;
pub use types::*;

#[cfg(test)]
mod tests;
