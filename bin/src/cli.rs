use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "arbor", version, about = "Navigate a syntax tree with modal keys")]
pub struct Cli {
    /// Write logs to this file or directory instead of the platform data directory
    #[arg(long, global = true, env = "ARBOR_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// RON keymap replacing the built-in navigation bindings
    #[arg(long, global = true, env = "ARBOR_KEYMAP")]
    pub keymap: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the display tree as JSON
    Tree {
        /// Source file, the built-in demo program if omitted
        source: Option<PathBuf>,
    },

    /// Send keys and print the effects of each, one JSON list per line
    Keys {
        source: Option<PathBuf>,

        /// Keys to send, e.g. `l`, `<Esc>`, `<C-a>`
        #[arg(short, long, num_args = 1.., required = true)]
        keys: Vec<String>,

        /// Print the display tree after the last key
        #[arg(long)]
        tree: bool,
    },

    /// Read one key per line from stdin and answer each with a JSON line
    ///
    /// `:tree` prints the display tree, `:reset` resets the display state and `:quit` exits.
    Session { source: Option<PathBuf> },

    /// Print the effective keymap as RON, with a comment describing each binding
    Keymap,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn keys_take_many_values() {
        let cli = Cli::try_parse_from(["arbor", "keys", "--keys", "l", "l", "t"]).expect("parse");
        match cli.command {
            Command::Keys { source, keys, tree } => {
                assert!(source.is_none());
                assert_eq!(keys, vec!["l", "l", "t"]);
                assert!(!tree);
            },
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_options_follow_subcommands() {
        let cli = Cli::try_parse_from(["arbor", "tree", "demo.py", "--keymap", "keys.ron"])
            .expect("parse");
        assert_eq!(cli.keymap, Some(PathBuf::from("keys.ron")));
        assert!(matches!(cli.command, Command::Tree { source: Some(_) }));
    }
}
