//! Arena-backed syntax tree with named, typed fields.
//!
//! Every node is allocated once in the [`SyntaxTree`] and addressed by a [`NodeRef`]. A node's
//! identity is its ref: two nodes with identical kind and fields are still distinct nodes.

use crate::error::{
    ClassificationChangedSnafu, IndexOutOfRangeSnafu, NotAListSnafu, TreeError, UnknownFieldSnafu,
    UnknownNodeSnafu,
};
use compact_str::CompactString;
use indexmap::IndexMap;
use snafu::{ensure, OptionExt};
use std::fmt;

/// Handle to a node allocated in a [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef(u32);

impl NodeRef {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn as_raw(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Leaf values stored directly in a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Int(i64),
    Float(f64),
    Str(CompactString),
    Bool(bool),
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Int(i) => write!(f, "{i}"),
            Primitive::Float(x) => write!(f, "{x:?}"),
            Primitive::Str(s) => write!(f, "{s}"),
            Primitive::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<i64> for Primitive {
    fn from(value: i64) -> Self {
        Primitive::Int(value)
    }
}

impl From<f64> for Primitive {
    fn from(value: f64) -> Self {
        Primitive::Float(value)
    }
}

impl From<bool> for Primitive {
    fn from(value: bool) -> Self {
        Primitive::Bool(value)
    }
}

impl From<&str> for Primitive {
    fn from(value: &str) -> Self {
        Primitive::Str(value.into())
    }
}

/// The value held by a named field of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Node(NodeRef),
    List(Vec<NodeRef>),
    Primitive(Primitive),
    Absent,
}

/// Coarse shape of a [`Field`]. Lists and absent values share a class, since an absent optional
/// sequence behaves as an empty one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldClass {
    Sequence,
    Node,
    Primitive,
}

impl fmt::Display for FieldClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldClass::Sequence => "sequence",
            FieldClass::Node => "node",
            FieldClass::Primitive => "primitive",
        };
        write!(f, "{s}")
    }
}

impl Field {
    pub fn class(&self) -> FieldClass {
        match self {
            Field::List(_) | Field::Absent => FieldClass::Sequence,
            Field::Node(_) => FieldClass::Node,
            Field::Primitive(_) => FieldClass::Primitive,
        }
    }

    pub fn primitive(value: impl Into<Primitive>) -> Self {
        Field::Primitive(value.into())
    }
}

impl From<NodeRef> for Field {
    fn from(node: NodeRef) -> Self {
        Field::Node(node)
    }
}

impl From<Vec<NodeRef>> for Field {
    fn from(nodes: Vec<NodeRef>) -> Self {
        Field::List(nodes)
    }
}

impl From<Primitive> for Field {
    fn from(value: Primitive) -> Self {
        Field::Primitive(value)
    }
}

/// A single node: its kind name and ordered fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    kind: CompactString,
    fields: IndexMap<CompactString, Field>,
}

impl SyntaxNode {
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }
}

#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    root: Option<NodeRef>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node. Field order is preserved as given.
    pub fn add<'a>(
        &mut self,
        kind: &str,
        fields: impl IntoIterator<Item = (&'a str, Field)>,
    ) -> NodeRef {
        let node = SyntaxNode {
            kind: kind.into(),
            fields: fields
                .into_iter()
                .map(|(name, field)| (CompactString::from(name), field))
                .collect(),
        };
        let id = NodeRef(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Allocate a node without fields, such as an operator or `Load`.
    pub fn leaf(&mut self, kind: &str) -> NodeRef {
        self.add(kind, std::iter::empty())
    }

    pub fn set_root(&mut self, node: NodeRef) {
        self.root = Some(node);
    }

    pub fn root(&self) -> Option<NodeRef> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, node: NodeRef) -> Option<&SyntaxNode> {
        self.nodes.get(node.index())
    }

    pub fn kind(&self, node: NodeRef) -> Option<&str> {
        self.get(node).map(SyntaxNode::kind)
    }

    pub fn field(&self, node: NodeRef, name: &str) -> Option<&Field> {
        self.get(node)?.field(name)
    }

    /// Items of a list field. Absent fields read as an empty list.
    pub fn list(&self, node: NodeRef, name: &str) -> Option<&[NodeRef]> {
        match self.field(node, name)? {
            Field::List(items) => Some(items),
            Field::Absent => Some(&[]),
            _ => None,
        }
    }

    pub fn push_item(&mut self, node: NodeRef, name: &str, item: NodeRef) -> Result<(), TreeError> {
        self.list_mut(node, name)?.push(item);
        Ok(())
    }

    pub fn insert_item(
        &mut self,
        node: NodeRef,
        name: &str,
        index: usize,
        item: NodeRef,
    ) -> Result<(), TreeError> {
        let list = self.list_mut(node, name)?;
        let len = list.len();
        ensure!(
            index <= len,
            IndexOutOfRangeSnafu {
                node,
                field: name,
                index,
                len
            }
        );
        list.insert(index, item);
        Ok(())
    }

    pub fn remove_item(
        &mut self,
        node: NodeRef,
        name: &str,
        index: usize,
    ) -> Result<NodeRef, TreeError> {
        let list = self.list_mut(node, name)?;
        let len = list.len();
        ensure!(
            index < len,
            IndexOutOfRangeSnafu {
                node,
                field: name,
                index,
                len
            }
        );
        Ok(list.remove(index))
    }

    pub fn truncate_list(
        &mut self,
        node: NodeRef,
        name: &str,
        len: usize,
    ) -> Result<(), TreeError> {
        self.list_mut(node, name)?.truncate(len);
        Ok(())
    }

    /// Replace a field's value, returning the previous one.
    ///
    /// The new value must keep the field's [`FieldClass`]; a node field cannot become a list and
    /// a list cannot become a primitive.
    pub fn set_field(
        &mut self,
        node: NodeRef,
        name: &str,
        value: Field,
    ) -> Result<Field, TreeError> {
        let slot = self.field_mut(node, name)?;
        let (expected, found) = (slot.class(), value.class());
        ensure!(
            expected == found,
            ClassificationChangedSnafu {
                node,
                field: name,
                expected,
                found
            }
        );
        Ok(std::mem::replace(slot, value))
    }

    fn field_mut(&mut self, node: NodeRef, name: &str) -> Result<&mut Field, TreeError> {
        let syntax_node = self
            .nodes
            .get_mut(node.index())
            .context(UnknownNodeSnafu { node })?;
        syntax_node
            .fields
            .get_mut(name)
            .context(UnknownFieldSnafu { node, field: name })
    }

    fn list_mut(&mut self, node: NodeRef, name: &str) -> Result<&mut Vec<NodeRef>, TreeError> {
        let field = self.field_mut(node, name)?;
        if matches!(field, Field::Absent) {
            *field = Field::List(Vec::new());
        }
        match field {
            Field::List(items) => Ok(items),
            _ => NotAListSnafu { node, field: name }.fail(),
        }
    }
}
