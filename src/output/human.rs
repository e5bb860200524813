//! Human-readable output formatting

use std::fmt::Write;

use crate::highlight::HighlightSpan;
use crate::output::formatter::{CheckReport, LanguageInfo, OutputConfig, Report};
use crate::tree::{Node, Tree};

pub fn format_human(report: &Report<'_>, config: &OutputConfig) -> String {
    match report {
        Report::Tree(tree) => format_tree(tree, config),
        Report::Highlights(tree, spans) => format_highlights(tree, spans),
        Report::Check(check) => format_check(check),
        Report::Language(info) => format_language(info),
    }
}

/// Named nodes, one per line, indented by depth.
fn format_tree(tree: &Tree, config: &OutputConfig) -> String {
    let mut output = String::new();
    write_node(&mut output, tree.root_node(), 0, config);
    output
}

fn write_node(output: &mut String, node: Node<'_>, depth: usize, config: &OutputConfig) {
    output.push_str(&" ".repeat(depth * config.indent));
    if let Some(field) = node.field_name() {
        output.push_str(field);
        output.push_str(": ");
    }
    output.push_str(node.kind());
    if config.show_positions {
        let (start, end) = (node.start_position(), node.end_position());
        let _ = write!(
            output,
            " [{}, {}] - [{}, {}]",
            start.row, start.column, end.row, end.column
        );
    }
    if node.named_child_count() == 0 && node.kind() != "source_file" {
        let _ = write!(output, " {:?}", node.utf8_text());
    }
    output.push('\n');

    for child in node.named_children() {
        write_node(output, child, depth + 1, config);
    }
}

fn format_highlights(tree: &Tree, spans: &[HighlightSpan]) -> String {
    let source = tree.source();
    let mut output = String::new();
    for span in spans {
        let _ = writeln!(
            output,
            "{}:{}-{}:{}  {:<18} {}",
            span.start.row,
            span.start.column,
            span.end.row,
            span.end.column,
            span.class.name(),
            &source[span.start_byte..span.end_byte]
        );
    }
    output
}

fn format_check(check: &CheckReport) -> String {
    let mut output = String::new();
    for file in &check.files {
        match (&file.error, file.nodes) {
            (Some(error), _) => {
                let _ = writeln!(output, "FAIL  {}: {}", file.path, error);
            }
            (None, Some(nodes)) => {
                let _ = writeln!(output, "ok    {} ({} nodes)", file.path, nodes);
            }
            (None, None) => {
                let _ = writeln!(output, "ok    {}", file.path);
            }
        }
    }
    let _ = write!(
        output,
        "\n{} file(s) checked, {} failed",
        check.files.len(),
        check.failures()
    );
    output
}

fn format_language(info: &LanguageInfo) -> String {
    format!(
        "Language Information\n\
         --------------------\n\
         Name:        {} ({})\n\
         ABI version: {}\n\
         Node kinds:  {} named, {} supertypes, {} tokens\n\
         Fields:      {}\n\
         Keywords:    {} control, {} types, {} statements, {} functions",
        info.display_name,
        info.name,
        info.abi_version,
        info.node_kinds.len(),
        info.supertypes.len(),
        info.anonymous_kinds,
        info.fields.len(),
        info.control_keywords,
        info.types,
        info.builtin_statements,
        info.builtin_functions
    )
}
