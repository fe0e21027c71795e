use super::Context;
use crate::{
    action::navigation_actions,
    config::KeymapConfig,
    display::{DisplayTree, TreeSnapshot},
    effect::Effect,
    error::{MissingRootSnafu, Result, UnrecognizedKeySnafu},
    input::Key,
    mode::ModeStack,
    navigation::Navigator,
    source::SourceTree,
};
use snafu::OptionExt;
use std::any::Any;
use tracing::debug;

/// Navigation over one source tree.
///
/// Owns the source tree, the display state built over it and the modes that drive the cursor.
/// The cursor is placed on the root field node on construction and after every
/// [`reset`](Context::reset).
#[derive(Debug)]
pub struct AstContext<T> {
    source: T,
    display: DisplayTree,
    modes: ModeStack<AstContext<T>>,
}

impl<T: SourceTree + 'static> AstContext<T> {
    pub const NAME: &'static str = "ast";

    /// Context with the built-in navigation keymap.
    pub fn new(source: T) -> Result<Self> {
        Self::with_config(source, &KeymapConfig::default())
    }

    pub fn with_config(source: T, keymap: &KeymapConfig) -> Result<Self> {
        let modes = keymap.build_modes(&navigation_actions::<T>())?;
        let mut context = Self {
            source,
            display: DisplayTree::new(),
            modes,
        };
        context.navigator().place_cursor_on_root()?;
        Ok(context)
    }

    pub fn source(&self) -> &T {
        &self.source
    }

    /// Mutable access to the source tree. List length changes are picked up on the next read;
    /// changing a field's kind is not supported.
    pub fn source_mut(&mut self) -> &mut T {
        &mut self.source
    }

    pub fn display(&self) -> &DisplayTree {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut DisplayTree {
        &mut self.display
    }

    pub fn modes(&self) -> &ModeStack<Self> {
        &self.modes
    }

    pub fn modes_mut(&mut self) -> &mut ModeStack<Self> {
        &mut self.modes
    }

    pub fn navigator(&mut self) -> Navigator<'_> {
        Navigator::new(&mut self.display, &self.source)
    }

    pub fn snapshot(&mut self) -> Result<TreeSnapshot> {
        let root = self.source.root().context(MissingRootSnafu)?;
        self.display.snapshot(&self.source, root)
    }
}

impl<T: SourceTree + 'static> Context for AstContext<T> {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn can_perform_action(&self, key: &Key) -> bool {
        self.modes.can_handle(key)
    }

    fn perform_key(&mut self, key: &Key) -> Result<Effect> {
        let action = self
            .modes
            .resolve(key)
            .context(UnrecognizedKeySnafu { key: key.clone() })?;
        debug!(context = Self::NAME, %key, action = action.name(), "performing action");

        let effect = action.perform(self)?;
        self.modes.apply(&effect)?;
        Ok(effect)
    }

    fn tree_snapshot(&mut self) -> Option<Result<TreeSnapshot>> {
        Some(self.snapshot())
    }

    fn reset(&mut self) -> Result<()> {
        self.display.clear();
        self.navigator().place_cursor_on_root()?;
        debug!(context = Self::NAME, "display state reset");
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
