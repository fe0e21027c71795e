//! Cursor movement over a [`DisplayTree`].
//!
//! The cursor lives in the [`CursorComponent`](crate::component::CursorComponent) of at most one
//! display node below the root field node, the first field of the root source node's container.
//! Every movement starts by locating the cursor. When none is found the movement only puts the
//! cursor back on the root field node and reports no move.

use crate::{
    display::{DisplayId, DisplayTree},
    error::{MissingRootSnafu, Result},
    source::SourceTree,
};
use snafu::OptionExt;
use tracing::{debug, trace};

pub struct Navigator<'a> {
    display: &'a mut DisplayTree,
    source: &'a dyn SourceTree,
}

impl<'a> Navigator<'a> {
    pub fn new(display: &'a mut DisplayTree, source: &'a dyn SourceTree) -> Self {
        Self { display, source }
    }

    pub fn display(&mut self) -> &mut DisplayTree {
        &mut *self.display
    }

    /// First field node of the root container. `None` for a root without fields.
    pub fn root_field_node(&mut self) -> Result<Option<DisplayId>> {
        let root = self.source.root().context(MissingRootSnafu)?;
        let container = self.display.wrap(self.source, root)?;
        Ok(container.fields().next().map(|(_, id)| id))
    }

    /// Depth-first search for the node with an active cursor.
    pub fn node_with_cursor(&mut self) -> Result<Option<DisplayId>> {
        let Some(root) = self.root_field_node()? else {
            return Ok(None);
        };

        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if self.display.node(id)?.components().cursor().active {
                return Ok(Some(id));
            }
            let children = self.display.child_field_nodes(self.source, id)?;
            stack.extend(children.into_iter().rev());
        }
        Ok(None)
    }

    /// Clear every cursor flag and set the one on the root field node.
    pub fn place_cursor_on_root(&mut self) -> Result<Option<DisplayId>> {
        self.display.clear_cursors();
        let root = self.root_field_node()?;
        if let Some(root) = root {
            self.display.set_cursor(root, true)?;
        }
        Ok(root)
    }

    fn cursor_or_reset(&mut self) -> Result<Option<DisplayId>> {
        if let Some(id) = self.node_with_cursor()? {
            return Ok(Some(id));
        }
        debug!("no cursor found, returning it to the root field node");
        self.place_cursor_on_root()?;
        Ok(None)
    }

    fn move_cursor(&mut self, from: DisplayId, to: DisplayId) -> Result<()> {
        self.display.set_cursor(from, false)?;
        self.display.set_cursor(to, true)?;
        trace!(%from, %to, "cursor moved");
        Ok(())
    }

    /// Move to the first child of the cursor node.
    pub fn deepen(&mut self) -> Result<bool> {
        let Some(current) = self.cursor_or_reset()? else {
            return Ok(false);
        };
        let children = self.display.child_field_nodes(self.source, current)?;
        match children.first() {
            Some(&child) => self.move_cursor(current, child).map(|()| true),
            None => Ok(false),
        }
    }

    /// Move to the parent of the cursor node.
    pub fn rise(&mut self) -> Result<bool> {
        let Some(current) = self.cursor_or_reset()? else {
            return Ok(false);
        };
        match self.parent(current)? {
            Some(parent) => self.move_cursor(current, parent).map(|()| true),
            None => Ok(false),
        }
    }

    pub fn next_sibling(&mut self) -> Result<bool> {
        self.step_sibling(true)
    }

    pub fn previous_sibling(&mut self) -> Result<bool> {
        self.step_sibling(false)
    }

    fn parent(&mut self, id: DisplayId) -> Result<Option<DisplayId>> {
        let Some(root) = self.root_field_node()? else {
            return Ok(None);
        };
        self.display.parent_field_node(self.source, root, id)
    }

    fn step_sibling(&mut self, forward: bool) -> Result<bool> {
        let Some(current) = self.cursor_or_reset()? else {
            return Ok(false);
        };
        let Some(parent) = self.parent(current)? else {
            return Ok(false);
        };

        let siblings = self.display.child_field_nodes(self.source, parent)?;
        let Some(position) = siblings.iter().position(|id| *id == current) else {
            return Ok(false);
        };
        let target = if forward {
            position.checked_add(1)
        } else {
            position.checked_sub(1)
        };

        match target.and_then(|index| siblings.get(index)) {
            Some(&sibling) => self.move_cursor(current, sibling).map(|()| true),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_syntax::SyntaxTree;

    fn setup(source: &str) -> (SyntaxTree, DisplayTree) {
        let tree = arbor_syntax::parse(source).expect("parse");
        let mut display = DisplayTree::new();
        Navigator::new(&mut display, &tree)
            .place_cursor_on_root()
            .expect("place cursor");
        (tree, display)
    }

    fn cursor(tree: &SyntaxTree, display: &mut DisplayTree) -> Option<DisplayId> {
        Navigator::new(display, tree)
            .node_with_cursor()
            .expect("cursor search")
    }

    #[test]
    fn cursor_starts_on_root_field_node() {
        let (tree, mut display) = setup("a = 10");
        assert_eq!(cursor(&tree, &mut display), Some(DisplayId::new(1)));
    }

    #[test]
    fn deepen_walks_first_children() {
        let (tree, mut display) = setup("a = 10");
        let mut nav = Navigator::new(&mut display, &tree);
        assert!(nav.deepen().expect("deepen"));
        assert_eq!(nav.node_with_cursor().expect("cursor"), Some(DisplayId::new(2)));
        assert!(nav.deepen().expect("deepen"));
        assert_eq!(nav.node_with_cursor().expect("cursor"), Some(DisplayId::new(3)));
    }

    #[test]
    fn deepen_at_leaf_is_a_no_op() {
        let (tree, mut display) = setup("pass");
        let mut nav = Navigator::new(&mut display, &tree);
        assert!(nav.deepen().expect("into the item"));
        // `Pass` has no fields.
        assert!(!nav.deepen().expect("leaf"));
        assert_eq!(nav.node_with_cursor().expect("cursor"), Some(DisplayId::new(2)));
    }

    #[test]
    fn rise_at_root_is_a_no_op() {
        let (tree, mut display) = setup("a = 10");
        let mut nav = Navigator::new(&mut display, &tree);
        assert!(!nav.rise().expect("rise"));
        assert_eq!(nav.node_with_cursor().expect("cursor"), Some(DisplayId::new(1)));
    }

    #[test]
    fn siblings_stop_at_the_ends() {
        let (tree, mut display) = setup("a = 10");
        let mut nav = Navigator::new(&mut display, &tree);
        nav.deepen().expect("deepen");
        nav.deepen().expect("deepen");

        assert!(!nav.previous_sibling().expect("first"));
        assert!(nav.next_sibling().expect("to value"));
        assert_eq!(nav.node_with_cursor().expect("cursor"), Some(DisplayId::new(5)));
        assert!(!nav.next_sibling().expect("last"));
        assert!(nav.previous_sibling().expect("back"));
        assert_eq!(nav.node_with_cursor().expect("cursor"), Some(DisplayId::new(3)));
    }

    #[test]
    fn root_has_no_siblings() {
        let (tree, mut display) = setup("a = 10");
        let mut nav = Navigator::new(&mut display, &tree);
        assert!(!nav.next_sibling().expect("next"));
        assert!(!nav.previous_sibling().expect("previous"));
    }

    #[test]
    fn lost_cursor_is_only_restored() {
        let (tree, mut display) = setup("a = 10");
        display.clear_cursors();

        let mut nav = Navigator::new(&mut display, &tree);
        assert!(!nav.deepen().expect("deepen"));
        assert_eq!(nav.node_with_cursor().expect("cursor"), Some(DisplayId::new(1)));
    }

    #[test]
    fn missing_root_is_an_error() {
        let tree = SyntaxTree::new();
        let mut display = DisplayTree::new();
        let mut nav = Navigator::new(&mut display, &tree);
        assert!(matches!(nav.deepen(), Err(crate::Error::MissingRoot)));
    }
}
