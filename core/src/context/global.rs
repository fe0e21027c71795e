use super::{AstContext, Context};
use crate::{
    config::KeymapConfig,
    display::TreeSnapshot,
    effect::{Effect, FrontendEffect},
    error::{Error, NoTreeSnafu, Result, UnknownContextSnafu, UnrecognizedKeySnafu},
    input::Key,
    mode::ModeStack,
    source::SourceTree,
};
use snafu::OptionExt;
use std::{any::Any, fmt};
use tracing::{debug, trace};

/// Top of the context hierarchy and the boundary frontends talk to.
///
/// Keys go to the active delegate first. Keys it does not bind fall through to this context's
/// own modes, which start out empty.
pub struct GlobalContext {
    contexts: Vec<Box<dyn Context>>,
    active: Option<usize>,
    modes: ModeStack<GlobalContext>,
}

impl fmt::Debug for GlobalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalContext")
            .field(
                "contexts",
                &self.contexts.iter().map(|cx| cx.name()).collect::<Vec<_>>(),
            )
            .field("active", &self.active)
            .field("modes", &self.modes)
            .finish()
    }
}

impl GlobalContext {
    pub const NAME: &'static str = "global";

    /// A global context delegating to a single [`AstContext`] over `source`.
    pub fn new<T: SourceTree + 'static>(source: T) -> Result<Self> {
        Self::with_config(source, &KeymapConfig::default())
    }

    pub fn with_config<T: SourceTree + 'static>(source: T, keymap: &KeymapConfig) -> Result<Self> {
        let ast = AstContext::with_config(source, keymap)?;
        Ok(Self::with_contexts(vec![Box::new(ast)]))
    }

    /// The first context becomes the active delegate.
    pub fn with_contexts(contexts: Vec<Box<dyn Context>>) -> Self {
        let active = (!contexts.is_empty()).then_some(0);
        Self {
            contexts,
            active,
            modes: ModeStack::new(),
        }
    }

    pub fn context<C: Context>(&self) -> Option<&C> {
        self.contexts
            .iter()
            .find_map(|cx| cx.as_any().downcast_ref::<C>())
    }

    pub fn context_mut<C: Context>(&mut self) -> Option<&mut C> {
        self.contexts
            .iter_mut()
            .find_map(|cx| cx.as_any_mut().downcast_mut::<C>())
    }

    pub fn active_context(&self) -> Option<&dyn Context> {
        self.active
            .and_then(|index| self.contexts.get(index))
            .map(|cx| cx.as_ref())
    }

    pub fn modes(&self) -> &ModeStack<Self> {
        &self.modes
    }

    pub fn modes_mut(&mut self) -> &mut ModeStack<Self> {
        &mut self.modes
    }

    /// Make the context called `name` the active delegate.
    pub fn switch_context(&mut self, name: &str) -> Result<()> {
        let index = self
            .contexts
            .iter()
            .position(|cx| cx.name() == name)
            .context(UnknownContextSnafu { name })?;
        if self.active != Some(index) {
            debug!(context = name, "switching active context");
        }
        self.active = Some(index);
        Ok(())
    }

    /// Handle one key from a frontend.
    ///
    /// Keys that do not parse or that nothing binds produce no effects.
    pub fn key_event(&mut self, key: &str) -> Result<Vec<FrontendEffect>> {
        let key = match key.parse::<Key>() {
            Ok(key) => key,
            Err(err) => {
                debug!(%err, "ignoring key");
                return Ok(Vec::new());
            },
        };

        match self.do_action(&key) {
            Err(Error::UnrecognizedKey { key }) => {
                debug!(%key, "unrecognized key");
                Ok(Vec::new())
            },
            result => result,
        }
    }

    /// Snapshot from the active delegate, or else the first context holding a tree.
    pub fn current_tree(&mut self) -> Result<TreeSnapshot> {
        let order = self
            .active
            .into_iter()
            .chain((0..self.contexts.len()).filter(|index| Some(*index) != self.active))
            .collect::<Vec<_>>();

        for index in order {
            if let Some(snapshot) = self.contexts.get_mut(index).and_then(|cx| cx.tree_snapshot()) {
                return snapshot;
            }
        }
        NoTreeSnafu.fail()
    }

    fn follow(&mut self, effect: &Effect) -> Result<()> {
        match &effect.new_context {
            Some(name) => self.switch_context(name),
            None => Ok(()),
        }
    }
}

impl Context for GlobalContext {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn can_perform_action(&self, key: &Key) -> bool {
        self.active_context()
            .is_some_and(|cx| cx.can_perform_action(key))
            || self.modes.can_handle(key)
    }

    fn perform_key(&mut self, key: &Key) -> Result<Effect> {
        if let Some(delegate) = self.active.and_then(|index| self.contexts.get_mut(index)) {
            if delegate.can_perform_action(key) {
                trace!(context = delegate.name(), %key, "delegating key");
                // The delegate already applied its own mode changes.
                let effect = delegate.perform_key(key)?;
                self.follow(&effect)?;
                return Ok(effect);
            }
        }

        let action = self
            .modes
            .resolve(key)
            .context(UnrecognizedKeySnafu { key: key.clone() })?;
        debug!(context = Self::NAME, %key, action = action.name(), "performing action");

        let effect = action.perform(self)?;
        self.modes.apply(&effect)?;
        self.follow(&effect)?;
        Ok(effect)
    }

    fn tree_snapshot(&mut self) -> Option<Result<TreeSnapshot>> {
        Some(self.current_tree())
    }

    fn reset(&mut self) -> Result<()> {
        for context in &mut self.contexts {
            context.reset()?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
