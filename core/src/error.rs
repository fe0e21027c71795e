use crate::{display::DisplayId, input::Key, source::SourceId};
use compact_str::CompactString;
use snafu::Snafu;
use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("no active mode binds {key}"))]
    UnrecognizedKey { key: Key },

    #[snafu(display("invalid key notation `{notation}`: {reason}"))]
    KeyNotation { notation: String, reason: String },

    #[snafu(display("source node {id} is not part of the tree"))]
    UnknownSourceNode { id: SourceId },

    #[snafu(display("source node {id} has no field `{field}`"))]
    MissingField { id: SourceId, field: CompactString },

    #[snafu(display(
        "field `{field}` of source node {id} changed from a {expected} to a {found} field"
    ))]
    FieldKindChanged {
        id: SourceId,
        field: CompactString,
        expected: &'static str,
        found: &'static str,
    },

    #[snafu(display("display node {id} does not exist"))]
    UnknownDisplayNode { id: DisplayId },

    #[snafu(display("list item {index} of `{field}` is past the end of the list (len {len})"))]
    ListItemOutOfRange {
        field: CompactString,
        index: usize,
        len: usize,
    },

    #[snafu(display("source tree has no root node"))]
    MissingRoot,

    #[snafu(display("unknown mode `{name}`"))]
    UnknownMode { name: CompactString },

    #[snafu(display("unknown action `{name}` bound in mode `{mode}`"))]
    UnknownAction {
        name: CompactString,
        mode: CompactString,
    },

    #[snafu(display("unknown context `{name}`"))]
    UnknownContext { name: CompactString },

    #[snafu(display("no context holds a tree"))]
    NoTree,

    #[snafu(display("failed to parse keymap: {source}"))]
    ConfigParse { source: ron::error::SpannedError },

    #[snafu(display("failed to read keymap {}: {source}", path.display()))]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to serialize keymap: {source}"))]
    ConfigSerialize { source: ron::Error },
}
