//! What an action asks for after it ran.

use crate::display::DisplayId;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// The result of performing an [`Action`](crate::action::Action).
///
/// Frontend effects are passed on to the caller untouched. Mode and context changes are applied
/// by the context that performed the action, removals before additions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub frontend_effects: Vec<FrontendEffect>,
    pub new_context: Option<CompactString>,
    pub modes_to_remove: Vec<CompactString>,
    pub modes_to_add: Vec<CompactString>,
}

impl Effect {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn frontend(effect: FrontendEffect) -> Self {
        Self {
            frontend_effects: vec![effect],
            ..Self::default()
        }
    }

    pub fn switch_context(mut self, name: impl Into<CompactString>) -> Self {
        self.new_context = Some(name.into());
        self
    }

    pub fn remove_mode(mut self, name: impl Into<CompactString>) -> Self {
        self.modes_to_remove.push(name.into());
        self
    }

    pub fn add_mode(mut self, name: impl Into<CompactString>) -> Self {
        self.modes_to_add.push(name.into());
        self
    }

    pub fn changes_modes(&self) -> bool {
        !self.modes_to_remove.is_empty() || !self.modes_to_add.is_empty()
    }
}

/// An instruction for the presentation layer: `{"action": "toggle", "args": [5]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontendEffect {
    pub action: CompactString,
    pub args: Vec<EffectArg>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EffectArg {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(CompactString),
}

impl From<bool> for EffectArg {
    fn from(value: bool) -> Self {
        EffectArg::Bool(value)
    }
}

impl From<i64> for EffectArg {
    fn from(value: i64) -> Self {
        EffectArg::Int(value)
    }
}

impl From<u64> for EffectArg {
    fn from(value: u64) -> Self {
        EffectArg::Uint(value)
    }
}

impl From<f64> for EffectArg {
    fn from(value: f64) -> Self {
        EffectArg::Float(value)
    }
}

impl From<&str> for EffectArg {
    fn from(value: &str) -> Self {
        EffectArg::Str(value.into())
    }
}

impl From<DisplayId> for EffectArg {
    fn from(id: DisplayId) -> Self {
        EffectArg::Uint(id.get())
    }
}

impl FrontendEffect {
    pub fn new(action: impl Into<CompactString>) -> Self {
        Self {
            action: action.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<EffectArg>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Ask the frontend to fetch a fresh tree snapshot.
    pub fn refresh_ast() -> Self {
        Self::new("refresh_ast")
    }

    /// Ask the frontend to expand or collapse the node with `id`.
    pub fn toggle(id: DisplayId) -> Self {
        Self::new("toggle").arg(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn frontend_effects_serialize_flat() {
        assert_eq!(
            serde_json::to_value(FrontendEffect::refresh_ast()).expect("json"),
            json!({"action": "refresh_ast", "args": []})
        );
        assert_eq!(
            serde_json::to_value(FrontendEffect::toggle(DisplayId::new(5))).expect("json"),
            json!({"action": "toggle", "args": [5]})
        );
        assert_eq!(
            serde_json::to_value(
                FrontendEffect::new("show")
                    .arg("tip")
                    .arg(true)
                    .arg(-2i64)
                    .arg(0.5)
            )
            .expect("json"),
            json!({"action": "show", "args": ["tip", true, -2, 0.5]})
        );
    }

    #[test]
    fn effect_builders() {
        let effect = Effect::frontend(FrontendEffect::refresh_ast())
            .remove_mode("navigation")
            .add_mode("insert")
            .switch_context("ast");
        assert_eq!(effect.frontend_effects.len(), 1);
        assert_eq!(effect.new_context.as_deref(), Some("ast"));
        assert!(effect.changes_modes());
        assert!(!Effect::none().changes_modes());
    }
}
