//! Modal cursor navigation over arbitrary typed trees.
//!
//! A [`SourceTree`] is mirrored into a [`DisplayTree`] of navigable display nodes, one per field
//! or list element. Keys are resolved through the active [`Mode`]s of a [`Context`] into
//! [`Action`]s, and the resulting [`Effect`]s tell the frontend what to redraw.
//!
//! ```no_run
//! # fn main() -> arbor_core::Result<()> {
//! let tree = arbor_syntax::parse("a = 10").expect("valid source");
//! let mut global = arbor_core::GlobalContext::new(tree)?;
//! let effects = global.key_event("l")?;
//! let snapshot = global.current_tree()?;
//! # let _ = (effects, snapshot);
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod component;
pub mod config;
pub mod context;
pub mod display;
pub mod effect;
pub mod error;
pub mod input;
pub mod mode;
pub mod navigation;
pub mod source;

pub use action::{Action, ActionRegistry};
pub use config::KeymapConfig;
pub use context::{AstContext, Context, GlobalContext};
pub use display::{DisplayId, DisplayTree, NodeSnapshot, TreeSnapshot};
pub use effect::{Effect, EffectArg, FrontendEffect};
pub use error::{Error, Result};
pub use input::Key;
pub use mode::{Mode, ModeStack};
pub use navigation::Navigator;
pub use source::{FieldValue, Scalar, SourceId, SourceTree};
