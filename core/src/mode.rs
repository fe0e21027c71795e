//! Modes and the stack of active modes a context consults.

use crate::{
    action::Action,
    effect::Effect,
    error::{Result, UnknownModeSnafu},
    input::Key,
};
use compact_str::CompactString;
use indexmap::IndexMap;
use snafu::ensure;
use std::{fmt, rc::Rc};
use tracing::debug;

/// A named, immutable set of single-key bindings.
pub struct Mode<C> {
    name: CompactString,
    bindings: IndexMap<Key, Rc<dyn Action<C>>>,
}

impl<C> Clone for Mode<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            bindings: self.bindings.clone(),
        }
    }
}

impl<C> fmt::Debug for Mode<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mode")
            .field("name", &self.name)
            .field(
                "bindings",
                &self
                    .bindings
                    .iter()
                    .map(|(key, action)| (key.to_string(), action.name()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<C> Mode<C> {
    pub fn new(
        name: impl Into<CompactString>,
        bindings: impl IntoIterator<Item = (Key, Rc<dyn Action<C>>)>,
    ) -> Self {
        Self {
            name: name.into(),
            bindings: bindings.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resolve(&self, key: &Key) -> Option<Rc<dyn Action<C>>> {
        self.bindings.get(key).cloned()
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.bindings.contains_key(key)
    }

    /// Bindings in declaration order.
    pub fn bindings(&self) -> impl Iterator<Item = (&Key, &dyn Action<C>)> {
        self.bindings.iter().map(|(key, action)| (key, action.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Modes known to a context and the ordered subset currently active.
///
/// Lookups scan active modes front to back; [`ModeStack::activate`] puts a mode at the front, so
/// the most recently activated mode wins when two modes bind the same key.
pub struct ModeStack<C> {
    available: IndexMap<CompactString, Mode<C>>,
    active: Vec<CompactString>,
}

impl<C> Default for ModeStack<C> {
    fn default() -> Self {
        Self {
            available: IndexMap::new(),
            active: Vec::new(),
        }
    }
}

impl<C> fmt::Debug for ModeStack<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeStack")
            .field("available", &self.available.keys().collect::<Vec<_>>())
            .field("active", &self.active)
            .finish()
    }
}

impl<C> ModeStack<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a mode available, replacing a mode with the same name. Does not activate it.
    pub fn register(&mut self, mode: Mode<C>) {
        self.available.insert(mode.name.clone(), mode);
    }

    pub fn mode(&self, name: &str) -> Option<&Mode<C>> {
        self.available.get(name)
    }

    /// Active modes, highest priority first.
    pub fn active(&self) -> impl Iterator<Item = &Mode<C>> {
        self.active.iter().filter_map(|name| self.available.get(name))
    }

    pub fn active_names(&self) -> impl Iterator<Item = &str> {
        self.active.iter().map(CompactString::as_str)
    }

    pub fn activate(&mut self, name: &str) -> Result<()> {
        ensure!(self.available.contains_key(name), UnknownModeSnafu { name });
        self.active.retain(|active| active != name);
        self.active.insert(0, name.into());
        debug!(mode = name, "mode activated");
        Ok(())
    }

    /// Returns whether the mode was active.
    pub fn deactivate(&mut self, name: &str) -> bool {
        let before = self.active.len();
        self.active.retain(|active| active != name);
        let removed = self.active.len() != before;
        if removed {
            debug!(mode = name, "mode deactivated");
        }
        removed
    }

    pub fn resolve(&self, key: &Key) -> Option<Rc<dyn Action<C>>> {
        self.active().find_map(|mode| mode.resolve(key))
    }

    pub fn can_handle(&self, key: &Key) -> bool {
        self.active().any(|mode| mode.contains(key))
    }

    /// Apply an effect's mode changes: removals first, then additions in order.
    pub fn apply(&mut self, effect: &Effect) -> Result<()> {
        for name in &effect.modes_to_remove {
            self.deactivate(name);
        }
        for name in &effect.modes_to_add {
            self.activate(name)?;
        }
        Ok(())
    }
}
