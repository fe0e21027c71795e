use super::DisplayId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The whole display tree, rooted at the root source node's container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub name: String,
    pub children: Vec<NodeSnapshot>,
}

/// One display node, with every component's keys inlined next to `name` and `id`.
///
/// ```json
/// {"name": "body = list", "id": 1, "cursor": true, "children": [...]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub id: DisplayId,
    #[serde(flatten)]
    pub components: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    pub fn cursor(&self) -> bool {
        self.components
            .get("cursor")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Pre-order walk over this node and its descendants.
    pub fn walk(&self) -> impl Iterator<Item = &NodeSnapshot> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

impl TreeSnapshot {
    pub fn walk(&self) -> impl Iterator<Item = &NodeSnapshot> {
        self.children.iter().flat_map(NodeSnapshot::walk)
    }

    /// The node holding the cursor, if any.
    pub fn cursor(&self) -> Option<&NodeSnapshot> {
        self.walk().find(|node| node.cursor())
    }

    pub fn find(&self, id: DisplayId) -> Option<&NodeSnapshot> {
        self.walk().find(|node| node.id == id)
    }
}
