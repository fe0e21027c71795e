use anyhow::Result;
use arbor_core::{Context, FrontendEffect, GlobalContext};
use std::io::{BufRead, Write};
use tracing::{debug, info};

/// Answer key events read line by line until `:quit` or the end of input.
///
/// Every line is answered with exactly one JSON line: the effect list for a key, the display
/// tree for `:tree`, and a refresh request for `:reset`. A line is taken as the key itself, so a
/// line holding a single space sends `Space`.
pub fn run(global: &mut GlobalContext, input: impl BufRead, mut out: impl Write) -> Result<()> {
    info!("session started");
    for line in input.lines() {
        let line = line?;
        let line = line.strip_suffix('\r').unwrap_or(&line);

        match line {
            ":quit" => break,
            ":tree" => {
                serde_json::to_writer(&mut out, &global.current_tree()?)?;
            },
            ":reset" => {
                global.reset()?;
                serde_json::to_writer(&mut out, &[FrontendEffect::refresh_ast()])?;
            },
            key => {
                let effects = global.key_event(key)?;
                debug!(key, effects = effects.len(), "key handled");
                serde_json::to_writer(&mut out, &effects)?;
            },
        }
        writeln!(out)?;
        out.flush()?;
    }
    info!("session ended");
    Ok(())
}
