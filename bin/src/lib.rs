pub mod cli;
pub mod commands;

use anyhow::{anyhow, Context as _, Result};
use arbor_core::KeymapConfig;
use arbor_syntax::SyntaxTree;
use std::path::Path;

/// Program shown when no source file is given.
pub const DEMO_SOURCE: &str = "a = 10\nb = a + 4\nc = \"hello world\"\n";

/// Parse `path`, or the demo program when there is none. Parse errors are rendered as a report.
pub fn load_source(path: Option<&Path>) -> Result<SyntaxTree> {
    let source = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => DEMO_SOURCE.to_string(),
    };
    parse_source(&source)
}

pub fn parse_source(source: &str) -> Result<SyntaxTree> {
    arbor_syntax::parse(source).map_err(|errors| {
        anyhow!(
            "{} parse error(s)\n{}",
            errors.len(),
            arbor_syntax::format_errors(source, &errors)
        )
    })
}

pub fn load_keymap(path: Option<&Path>) -> Result<KeymapConfig> {
    match path {
        Some(path) => Ok(KeymapConfig::from_file(path)?),
        None => Ok(KeymapConfig::default()),
    }
}
