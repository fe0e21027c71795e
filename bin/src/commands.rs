pub mod session;

use anyhow::Result;
use arbor_core::{action::navigation_actions, GlobalContext, KeymapConfig};
use arbor_syntax::SyntaxTree;
use std::io::Write;
use tracing::debug;

pub fn tree(global: &mut GlobalContext, mut out: impl Write) -> Result<()> {
    let tree = global.current_tree()?;
    serde_json::to_writer_pretty(&mut out, &tree)?;
    writeln!(out)?;
    Ok(())
}

pub fn keys(
    global: &mut GlobalContext,
    keys: &[String],
    print_tree: bool,
    mut out: impl Write,
) -> Result<()> {
    for key in keys {
        let effects = global.key_event(key)?;
        debug!(key = %key, effects = effects.len(), "key handled");
        serde_json::to_writer(&mut out, &effects)?;
        writeln!(out)?;
    }
    if print_tree {
        tree(global, out)?;
    }
    Ok(())
}

/// Print the keymap as RON, preceded by a comment line describing each binding.
pub fn keymap(keymap: &KeymapConfig, mut out: impl Write) -> Result<()> {
    let modes = keymap.build_modes(&navigation_actions::<SyntaxTree>())?;
    for name in keymap.modes.keys() {
        let Some(mode) = modes.mode(name) else {
            continue;
        };
        writeln!(out, "// {name}")?;
        for (key, action) in mode.bindings() {
            writeln!(out, "//   {key}: {} - {}", action.name(), action.description())?;
        }
    }
    writeln!(out, "{}", keymap.to_ron()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn global() -> GlobalContext {
        GlobalContext::new(crate::parse_source("a = 10").expect("parse")).expect("context")
    }

    #[test]
    fn keys_print_one_line_each() {
        let mut out = Vec::new();
        let keys = ["l", "l", "j", "t", "q"].map(String::from);
        super::keys(&mut global(), &keys, false, &mut out).expect("keys");

        let lines: Vec<Value> = String::from_utf8(out)
            .expect("utf8")
            .lines()
            .map(|line| serde_json::from_str(line).expect("json line"))
            .collect();
        assert_eq!(
            lines,
            vec![
                json!([{"action": "refresh_ast", "args": []}]),
                json!([{"action": "refresh_ast", "args": []}]),
                json!([{"action": "refresh_ast", "args": []}]),
                json!([{"action": "toggle", "args": [5]}]),
                json!([]),
            ]
        );
    }

    #[test]
    fn tree_prints_snapshot() {
        let mut out = Vec::new();
        tree(&mut global(), &mut out).expect("tree");
        let tree: Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(tree["name"], "Module");
        assert_eq!(tree["children"][0]["name"], "body = list");
        assert_eq!(tree["children"][0]["cursor"], true);
    }

    #[test]
    fn keymap_prints_ron() {
        let mut out = Vec::new();
        keymap(&KeymapConfig::default(), &mut out).expect("keymap");
        let ron_str = String::from_utf8(out).expect("utf8");
        assert_eq!(
            KeymapConfig::from_ron(&ron_str).expect("parse"),
            KeymapConfig::default()
        );
    }

    #[test]
    fn keymap_describes_each_binding() {
        let mut out = Vec::new();
        keymap(&KeymapConfig::default(), &mut out).expect("keymap");
        let ron_str = String::from_utf8(out).expect("utf8");
        let comments: Vec<_> = ron_str
            .lines()
            .take_while(|line| line.starts_with("//"))
            .collect();
        assert_eq!(
            comments,
            vec![
                "// navigation",
                "//   h: Rise - Move the cursor to the parent of the current node",
                "//   l: Deepen - Move the cursor to the first child of the current node",
                "//   j: NextSibling - Move the cursor to the next sibling",
                "//   k: PreviousSibling - Move the cursor to the previous sibling",
                "//   t: Toggle - Expand or collapse the node under the cursor",
            ]
        );
    }

    #[test]
    fn keymap_rejects_unknown_actions() {
        let mut config = KeymapConfig::default();
        config.modes[0]
            .bindings
            .insert(arbor_core::Key::Char('x'), "Teleport".into());
        let mut out = Vec::new();
        assert!(keymap(&config, &mut out).is_err());
        assert!(out.is_empty());
    }
}
