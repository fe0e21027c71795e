//! The reflection contract a tree must satisfy to be navigated.
//!
//! The engine never looks inside a source tree beyond this: a root, a type name per node, and an
//! ordered list of named fields classified as a child node, a list of child nodes, a scalar or
//! absent. Any arena or object graph can be plugged in by implementing [`SourceTree`].

use serde::{Deserialize, Serialize};
use std::fmt;

mod syntax_tree;

/// Identity of a source node. Two nodes with equal contents still have different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceId(pub u64);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A primitive field value, borrowed from the source tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Str(&'a str),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Scalar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(s) => write!(f, "{s}"),
            Scalar::Int(i) => write!(f, "{i}"),
            // Keep the `.0` of whole floats so `4.0` and `4` stay distinct.
            Scalar::Float(x) => write!(f, "{x:?}"),
            Scalar::Bool(b) => write!(f, "{b}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Node(SourceId),
    List(Vec<SourceId>),
    Scalar(Scalar<'a>),
    Absent,
}

impl FieldValue<'_> {
    /// Name of the value's classification, as used in error messages.
    pub fn class_name(&self) -> &'static str {
        match self {
            FieldValue::Node(_) => "node",
            FieldValue::List(_) | FieldValue::Absent => "list",
            FieldValue::Scalar(_) => "primitive",
        }
    }
}

pub trait SourceTree {
    fn root(&self) -> Option<SourceId>;

    /// `None` when `id` is not part of this tree.
    fn type_name(&self, id: SourceId) -> Option<&str>;

    /// Fields of `id` in a stable, deterministic order.
    fn fields(&self, id: SourceId) -> Option<Vec<(&str, FieldValue<'_>)>>;

    fn field(&self, id: SourceId, name: &str) -> Option<FieldValue<'_>> {
        self.fields(id)?
            .into_iter()
            .find_map(|(field, value)| (field == name).then_some(value))
    }

    /// Length of a list field, with absent values reading as empty. `None` for any other field.
    fn list_len(&self, id: SourceId, name: &str) -> Option<usize> {
        match self.field(id, name)? {
            FieldValue::List(items) => Some(items.len()),
            FieldValue::Absent => Some(0),
            _ => None,
        }
    }

    fn list_item(&self, id: SourceId, name: &str, index: usize) -> Option<SourceId> {
        match self.field(id, name)? {
            FieldValue::List(items) => items.get(index).copied(),
            _ => None,
        }
    }
}
