use crate::tree::{FieldClass, NodeRef};
use ariadne::{Color, Label, Report, ReportKind, Source};
use compact_str::CompactString;
use snafu::Snafu;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub span: Range<usize>,
    pub message: String,
}

impl ParseError {
    pub fn new(span: Range<usize>, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

/// Render each error as an ariadne report against `source`, one after the other.
pub fn format_errors(source: &str, errors: &[ParseError]) -> String {
    let mut rendered = Vec::new();
    for error in errors {
        let label = Label::new(error.span.clone())
            .with_message(&error.message)
            .with_color(Color::Red);
        let report = Report::build(ReportKind::Error, (), error.span.start)
            .with_message(&error.message)
            .with_label(label)
            .finish();
        // Writing into a Vec does not fail.
        let _ = report.write(Source::from(source), &mut rendered);
    }
    String::from_utf8_lossy(&rendered).into_owned()
}

/// Failures of [`SyntaxTree`](crate::SyntaxTree) mutation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TreeError {
    #[snafu(display("no node {node} in this tree"))]
    UnknownNode { node: NodeRef },

    #[snafu(display("node {node} has no field `{field}`"))]
    UnknownField { node: NodeRef, field: CompactString },

    #[snafu(display("field `{field}` of node {node} is not a list"))]
    NotAList { node: NodeRef, field: CompactString },

    #[snafu(display("index {index} out of range for `{field}` of node {node} (len {len})"))]
    IndexOutOfRange {
        node: NodeRef,
        field: CompactString,
        index: usize,
        len: usize,
    },

    #[snafu(display("field `{field}` of node {node} is a {expected} field, cannot hold a {found}"))]
    ClassificationChanged {
        node: NodeRef,
        field: CompactString,
        expected: FieldClass,
        found: FieldClass,
    },
}
