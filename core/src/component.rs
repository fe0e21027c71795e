//! Per-node attachments.
//!
//! Every display node carries one instance of every [`ComponentKind`], created with the node and
//! dropped with it. Components are stored in a fixed array indexed by their kind tag and reached
//! through the [`DisplayComponent`] trait, dispatched statically over the [`Component`] enum.
//!
//! Adding a kind means adding a variant to both enums, listing it in [`ComponentKind::ALL`] and
//! giving it a constructor in [`ComponentKind::instantiate`].

use enum_dispatch::enum_dispatch;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Cursor,
}

impl ComponentKind {
    /// Every kind, in tag order.
    pub const ALL: [ComponentKind; 1] = [ComponentKind::Cursor];
    pub const COUNT: usize = Self::ALL.len();

    fn index(self) -> usize {
        self as usize
    }

    fn instantiate(self) -> Component {
        match self {
            ComponentKind::Cursor => CursorComponent::default().into(),
        }
    }
}

#[enum_dispatch]
pub trait DisplayComponent {
    fn kind(&self) -> ComponentKind;

    /// Contribute this component's keys to a node snapshot.
    fn snapshot(&self, out: &mut Map<String, Value>);
}

#[enum_dispatch(DisplayComponent)]
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    Cursor(CursorComponent),
}

/// Marks the node the cursor is on. At most one node per display tree is active, which the
/// navigator maintains; the component only stores the flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorComponent {
    pub active: bool,
}

impl DisplayComponent for CursorComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Cursor
    }

    fn snapshot(&self, out: &mut Map<String, Value>) {
        out.insert("cursor".to_string(), Value::Bool(self.active));
    }
}

#[derive(Debug, Clone)]
pub struct Components([Component; ComponentKind::COUNT]);

impl Default for Components {
    fn default() -> Self {
        Self::new()
    }
}

impl Components {
    pub fn new() -> Self {
        Self(ComponentKind::ALL.map(ComponentKind::instantiate))
    }

    pub fn get(&self, kind: ComponentKind) -> &Component {
        let component = &self.0[kind.index()];
        debug_assert_eq!(component.kind(), kind, "component table out of tag order");
        component
    }

    pub fn get_mut(&mut self, kind: ComponentKind) -> &mut Component {
        let component = &mut self.0[kind.index()];
        debug_assert_eq!(component.kind(), kind, "component table out of tag order");
        component
    }

    pub fn cursor(&self) -> &CursorComponent {
        let Component::Cursor(cursor) = self.get(ComponentKind::Cursor);
        cursor
    }

    pub fn cursor_mut(&mut self) -> &mut CursorComponent {
        let Component::Cursor(cursor) = self.get_mut(ComponentKind::Cursor);
        cursor
    }

    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.0.iter()
    }

    pub fn snapshot(&self, out: &mut Map<String, Value>) {
        for component in self.iter() {
            component.snapshot(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_is_instantiated() {
        let components = Components::new();
        assert_eq!(components.iter().count(), ComponentKind::COUNT);
        for kind in ComponentKind::ALL {
            assert_eq!(components.get(kind).kind(), kind);
        }
    }

    #[test]
    fn cursor_starts_inactive() {
        let mut components = Components::new();
        assert!(!components.cursor().active);

        components.cursor_mut().active = true;
        assert!(components.cursor().active);
    }

    #[test]
    fn snapshot_contributes_cursor_flag() {
        let mut components = Components::new();
        let mut out = Map::new();
        components.snapshot(&mut out);
        assert_eq!(out.get("cursor"), Some(&Value::Bool(false)));

        components.cursor_mut().active = true;
        components.snapshot(&mut out);
        assert_eq!(out.get("cursor"), Some(&Value::Bool(true)));
    }

    #[test]
    fn components_are_not_shared() {
        let mut a = Components::new();
        let b = Components::new();
        a.cursor_mut().active = true;
        assert!(!b.cursor().active);
    }
}
