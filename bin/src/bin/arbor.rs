use anyhow::Result;
use arbor_bin::{
    cli::{Cli, Command},
    commands, load_keymap, load_source,
};
use arbor_core::GlobalContext;
use clap::Parser;
use std::io;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log = arbor_log::init(arbor_log::LogConfig {
        log_file_path: cli.log_file.clone(),
    })?;

    let keymap = load_keymap(cli.keymap.as_deref())?;
    let stdout = io::stdout().lock();

    match cli.command {
        Command::Tree { source } => {
            let mut global = GlobalContext::with_config(load_source(source.as_deref())?, &keymap)?;
            commands::tree(&mut global, stdout)
        },
        Command::Keys { source, keys, tree } => {
            let mut global = GlobalContext::with_config(load_source(source.as_deref())?, &keymap)?;
            commands::keys(&mut global, &keys, tree, stdout)
        },
        Command::Session { source } => {
            let mut global = GlobalContext::with_config(load_source(source.as_deref())?, &keymap)?;
            commands::session::run(&mut global, io::stdin().lock(), stdout)
        },
        Command::Keymap => commands::keymap(&keymap, stdout),
    }
}
