//! Dispatch scopes.
//!
//! A [`Context`] owns active modes and turns keys into effects. [`GlobalContext`] sits at the
//! boundary and hands keys to its active delegate, an [`AstContext`] unless configured otherwise,
//! before falling back to its own modes.

mod ast;
mod global;

pub use ast::AstContext;
pub use global::GlobalContext;

use crate::{
    display::TreeSnapshot,
    effect::{Effect, FrontendEffect},
    error::Result,
    input::Key,
};
use std::any::Any;

pub trait Context: Any {
    /// Name used by [`Effect::new_context`] to switch to this context.
    fn name(&self) -> &str;

    /// Whether a delegate or an active mode binds `key`.
    fn can_perform_action(&self, key: &Key) -> bool;

    /// Perform the action bound to `key` and apply the mode changes it asks for.
    ///
    /// Fails with [`Error::UnrecognizedKey`](crate::Error::UnrecognizedKey) when nothing binds
    /// the key.
    fn perform_key(&mut self, key: &Key) -> Result<Effect>;

    fn do_action(&mut self, key: &Key) -> Result<Vec<FrontendEffect>> {
        self.perform_key(key).map(|effect| effect.frontend_effects)
    }

    /// Snapshot of the tree this context navigates, if it has one.
    fn tree_snapshot(&mut self) -> Option<Result<TreeSnapshot>> {
        None
    }

    /// Drop display state and put the cursor back on the root.
    fn reset(&mut self) -> Result<()>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
