//! JSON output formatting

use serde_json::{json, Value};

use crate::output::formatter::Report;
use crate::tree::Node;

pub fn format_json(report: &Report<'_>) -> String {
    let data: Value = match report {
        Report::Tree(tree) => node_to_json(tree.root_node()),
        Report::Highlights(_, spans) => serde_json::to_value(spans).unwrap_or(json!(null)),
        Report::Check(check) => serde_json::to_value(check).unwrap_or(json!(null)),
        Report::Language(info) => serde_json::to_value(info).unwrap_or(json!(null)),
    };

    serde_json::to_string_pretty(&data).unwrap_or_else(|_| "{}".to_string())
}

/// All nodes, anonymous tokens included. Leaves carry their text.
fn node_to_json(node: Node<'_>) -> Value {
    let mut value = json!({
        "kind": node.kind(),
        "named": node.is_named(),
        "start_byte": node.start_byte(),
        "end_byte": node.end_byte(),
        "start": node.start_position(),
        "end": node.end_position(),
    });

    if let Some(field) = node.field_name() {
        value["field"] = json!(field);
    }
    if node.is_extra() {
        value["extra"] = json!(true);
    }
    if node.child_count() == 0 {
        value["text"] = json!(node.utf8_text());
    } else {
        value["children"] = Value::Array(node.children().map(node_to_json).collect());
    }

    value
}
