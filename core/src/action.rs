//! Operations bound to keys.
//!
//! An [`Action`] is performed against a context type `C` and returns an [`Effect`]. Actions are
//! stateless values shared between modes through `Rc`; modes are built by looking action names
//! up in an [`ActionRegistry`].

use crate::{
    context::AstContext,
    effect::{Effect, FrontendEffect},
    error::Result,
    source::SourceTree,
};
use indexmap::IndexMap;
use std::{fmt, rc::Rc};
use tracing::debug;

pub trait Action<C>: fmt::Debug {
    /// Name used to bind the action in a keymap.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn perform(&self, context: &mut C) -> Result<Effect>;
}

/// Actions available to a context type, by name.
pub struct ActionRegistry<C> {
    actions: IndexMap<&'static str, Rc<dyn Action<C>>>,
}

impl<C> Default for ActionRegistry<C> {
    fn default() -> Self {
        Self {
            actions: IndexMap::new(),
        }
    }
}

impl<C> fmt::Debug for ActionRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.actions.keys()).finish()
    }
}

impl<C> ActionRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an action, replacing any action registered under the same name.
    pub fn register(&mut self, action: impl Action<C> + 'static) -> &mut Self {
        self.actions.insert(action.name(), Rc::new(action));
        self
    }

    pub fn get(&self, name: &str) -> Option<Rc<dyn Action<C>>> {
        self.actions.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.actions.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Cursor movement actions plus [`Toggle`], for any [`AstContext`].
pub fn navigation_actions<T: SourceTree + 'static>() -> ActionRegistry<AstContext<T>> {
    let mut registry = ActionRegistry::new();
    registry
        .register(Deepen)
        .register(Rise)
        .register(NextSibling)
        .register(PreviousSibling)
        .register(Toggle);
    registry
}

macro_rules! movement_action {
    ($(#[$doc:meta])* $action:ident, $description:literal, $movement:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $action;

        impl<T: SourceTree + 'static> Action<AstContext<T>> for $action {
            fn name(&self) -> &'static str {
                stringify!($action)
            }

            fn description(&self) -> &'static str {
                $description
            }

            fn perform(&self, context: &mut AstContext<T>) -> Result<Effect> {
                let moved = context.navigator().$movement()?;
                debug!(action = stringify!($action), moved, "cursor action");
                Ok(Effect::frontend(FrontendEffect::refresh_ast()))
            }
        }
    };
}

movement_action!(
    /// Cursor to the first child.
    Deepen,
    "Move the cursor to the first child of the current node",
    deepen
);
movement_action!(
    /// Cursor to the parent.
    Rise,
    "Move the cursor to the parent of the current node",
    rise
);
movement_action!(
    NextSibling,
    "Move the cursor to the next sibling",
    next_sibling
);
movement_action!(
    PreviousSibling,
    "Move the cursor to the previous sibling",
    previous_sibling
);

/// Ask the frontend to expand or collapse the cursor node. Nothing changes on this side.
#[derive(Debug, Clone, Copy, Default)]
pub struct Toggle;

impl<T: SourceTree + 'static> Action<AstContext<T>> for Toggle {
    fn name(&self) -> &'static str {
        "Toggle"
    }

    fn description(&self) -> &'static str {
        "Expand or collapse the node under the cursor"
    }

    fn perform(&self, context: &mut AstContext<T>) -> Result<Effect> {
        match context.navigator().node_with_cursor()? {
            Some(id) => Ok(Effect::frontend(FrontendEffect::toggle(id))),
            None => {
                debug!("toggle without a cursor, ignoring");
                Ok(Effect::none())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DisplayId;
    use arbor_syntax::SyntaxTree;

    fn context(source: &str) -> AstContext<SyntaxTree> {
        AstContext::new(arbor_syntax::parse(source).expect("parse")).expect("context")
    }

    #[test]
    fn registry_holds_navigation_actions() {
        let registry = navigation_actions::<SyntaxTree>();
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["Deepen", "Rise", "NextSibling", "PreviousSibling", "Toggle"]
        );
        assert!(registry.get("Deepen").is_some());
        assert!(registry.get("Jump").is_none());
    }

    #[test]
    fn movement_requests_refresh() {
        let mut cx = context("a = 10");
        let effect = Deepen.perform(&mut cx).expect("deepen");
        assert_eq!(effect.frontend_effects, vec![FrontendEffect::refresh_ast()]);

        // Even a no-op move asks for a refresh.
        let effect = Rise.perform(&mut cx).expect("rise");
        assert_eq!(effect.frontend_effects, vec![FrontendEffect::refresh_ast()]);
        let effect = Rise.perform(&mut cx).expect("rise at root");
        assert_eq!(effect.frontend_effects, vec![FrontendEffect::refresh_ast()]);
    }

    #[test]
    fn toggle_targets_cursor_node() {
        let mut cx = context("a = 10");
        let effect = Toggle.perform(&mut cx).expect("toggle");
        assert_eq!(
            effect.frontend_effects,
            vec![FrontendEffect::toggle(DisplayId::new(1))]
        );
    }

    #[test]
    fn toggle_without_cursor_does_nothing() {
        let mut cx = context("a = 10");
        cx.display_mut().clear_cursors();
        let effect = Toggle.perform(&mut cx).expect("toggle");
        assert_eq!(effect, Effect::none());
    }
}
