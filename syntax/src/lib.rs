//! Parser and arena tree for a small Python-like statement language.
//!
//! [`parse`] turns source text into a [`SyntaxTree`] whose nodes carry the node kinds and field
//! names of a classic Python AST (`Module.body`, `Assign.targets`, `Name.id`, ...).

pub mod ast;
mod error;
mod lower;
mod parser;
mod tree;

pub use error::{format_errors, ParseError, TreeError};
pub use tree::{Field, FieldClass, NodeRef, Primitive, SyntaxNode, SyntaxTree};

pub fn parse(source: &str) -> Result<SyntaxTree, Vec<ParseError>> {
    parser::parse(source).map(|body| lower::lower_module(&body))
}
