//! Syntax highlighting over parsed trees
//!
//! Every leaf of the tree gets at most one class; identifiers are classified
//! by the field they fill in their parent.

use std::fmt;

use serde::Serialize;

use crate::tree::{Node, Point, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HighlightClass {
    #[serde(rename = "comment")]
    Comment,
    #[serde(rename = "keyword")]
    Keyword,
    #[serde(rename = "preprocessor")]
    Preprocessor,
    #[serde(rename = "type")]
    Type,
    #[serde(rename = "function.builtin")]
    FunctionBuiltin,
    #[serde(rename = "function")]
    Function,
    #[serde(rename = "variable.parameter")]
    Parameter,
    #[serde(rename = "variable")]
    Variable,
    #[serde(rename = "label")]
    Label,
    #[serde(rename = "string")]
    String,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "color")]
    Color,
    #[serde(rename = "operator")]
    Operator,
}

impl HighlightClass {
    pub fn name(&self) -> &'static str {
        match self {
            HighlightClass::Comment => "comment",
            HighlightClass::Keyword => "keyword",
            HighlightClass::Preprocessor => "preprocessor",
            HighlightClass::Type => "type",
            HighlightClass::FunctionBuiltin => "function.builtin",
            HighlightClass::Function => "function",
            HighlightClass::Parameter => "variable.parameter",
            HighlightClass::Variable => "variable",
            HighlightClass::Label => "label",
            HighlightClass::String => "string",
            HighlightClass::Number => "number",
            HighlightClass::Boolean => "boolean",
            HighlightClass::Color => "color",
            HighlightClass::Operator => "operator",
        }
    }
}

impl fmt::Display for HighlightClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightSpan {
    pub class: HighlightClass,
    pub start_byte: usize,
    pub end_byte: usize,
    pub start: Point,
    pub end: Point,
}

/// Classify the leaves of `tree`, in document order.
pub fn highlight(tree: &Tree) -> Vec<HighlightSpan> {
    let spans: Vec<_> = tree
        .walk()
        .filter(|node| node.child_count() == 0)
        .filter_map(|node| {
            classify(node).map(|class| HighlightSpan {
                class,
                start_byte: node.start_byte(),
                end_byte: node.end_byte(),
                start: node.start_position(),
                end: node.end_position(),
            })
        })
        .collect();

    tracing::debug!(spans = spans.len(), "highlighted tree");
    spans
}

fn classify(node: Node<'_>) -> Option<HighlightClass> {
    if !node.is_named() {
        return if node.kind().starts_with(';') {
            Some(HighlightClass::Preprocessor)
        } else {
            Some(HighlightClass::Keyword)
        };
    }

    let class = match node.kind() {
        "comment" => HighlightClass::Comment,
        "type" => HighlightClass::Type,
        "builtin_statement" | "builtin_function" => HighlightClass::FunctionBuiltin,
        "string_literal" => HighlightClass::String,
        "int_number" | "float_number" | "hex_number" => HighlightClass::Number,
        "boolean_literal" => HighlightClass::Boolean,
        "at_color_code" => HighlightClass::Color,
        "operator" => HighlightClass::Operator,
        "identifier" => classify_identifier(node),
        _ => return None,
    };
    Some(class)
}

fn classify_identifier(node: Node<'_>) -> HighlightClass {
    let parent = match node.parent() {
        Some(parent) => parent.kind(),
        None => return HighlightClass::Variable,
    };

    match (parent, node.field_name()) {
        (
            "function_declaration"
            | "procedure_declaration"
            | "function_implementation"
            | "procedure_implementation",
            Some("name"),
        ) => HighlightClass::Function,
        ("call_expression", Some("function")) | ("procedure_call", Some("name")) => {
            HighlightClass::Function
        }
        ("parameter", Some("name")) => HighlightClass::Parameter,
        ("label", _) | ("goto_statement" | "gosub_statement", Some("label")) => {
            HighlightClass::Label
        }
        ("define_directive" | "undef_directive", Some("name")) | ("version_directive", Some("key")) => {
            HighlightClass::Preprocessor
        }
        _ => HighlightClass::Variable,
    }
}
