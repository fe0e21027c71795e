//! Keymap configuration loaded from RON.
//!
//! ```ron
//! (
//!     modes: {
//!         "navigation": (
//!             bindings: {
//!                 Char('h'): "Rise",
//!                 Char('l'): "Deepen",
//!             },
//!         ),
//!     },
//!     initial_modes: ["navigation"],
//! )
//! ```

use crate::{
    action::ActionRegistry,
    error::{ConfigParseSnafu, ConfigReadSnafu, ConfigSerializeSnafu, Result, UnknownActionSnafu},
    input::Key,
    mode::{Mode, ModeStack},
};
use compact_str::CompactString;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt};
use std::path::Path;
use tracing::debug;

/// Name of the mode the built-in keymap declares.
pub const NAVIGATION_MODE: &str = "navigation";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct KeymapConfig {
    /// Modes by name, in declaration order
    pub modes: IndexMap<CompactString, ModeDefinition>,

    /// Modes active at startup, highest priority first. Empty activates every declared mode.
    #[serde(default)]
    pub initial_modes: Vec<CompactString>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ModeDefinition {
    /// Key to action name
    pub bindings: IndexMap<Key, CompactString>,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        let bindings = [
            ('h', "Rise"),
            ('l', "Deepen"),
            ('j', "NextSibling"),
            ('k', "PreviousSibling"),
            ('t', "Toggle"),
        ]
        .into_iter()
        .map(|(key, action)| (Key::Char(key), CompactString::from(action)))
        .collect();

        Self {
            modes: IndexMap::from([(NAVIGATION_MODE.into(), ModeDefinition { bindings })]),
            initial_modes: vec![NAVIGATION_MODE.into()],
        }
    }
}

impl KeymapConfig {
    pub fn from_ron(ron_str: &str) -> Result<Self> {
        ron::from_str(ron_str).context(ConfigParseSnafu)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).context(ConfigReadSnafu { path })?;
        let config = Self::from_ron(&contents)?;
        debug!(path = %path.display(), modes = config.modes.len(), "loaded keymap");
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context(ConfigSerializeSnafu)
    }

    /// Build every declared mode against `actions` and activate the initial ones.
    pub fn build_modes<C>(&self, actions: &ActionRegistry<C>) -> Result<ModeStack<C>> {
        let mut stack = ModeStack::new();
        for (name, definition) in &self.modes {
            let mut bindings = Vec::with_capacity(definition.bindings.len());
            for (key, action) in &definition.bindings {
                let resolved = actions.get(action).context(UnknownActionSnafu {
                    name: action.clone(),
                    mode: name.clone(),
                })?;
                bindings.push((key.clone(), resolved));
            }
            stack.register(Mode::new(name.clone(), bindings));
        }

        let initial: Vec<&CompactString> = if self.initial_modes.is_empty() {
            self.modes.keys().collect()
        } else {
            self.initial_modes.iter().collect()
        };
        // Activation pushes to the front, so go backwards to keep the listed order.
        for name in initial.into_iter().rev() {
            stack.activate(name)?;
        }
        Ok(stack)
    }
}
