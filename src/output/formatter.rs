//! Output formatting

use serde::{Deserialize, Serialize};

use crate::highlight::HighlightSpan;
use crate::keywords;
use crate::language::Language;
use crate::output::human::format_human;
use crate::output::json::format_json;
use crate::tree::Tree;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Print `[row, column] - [row, column]` ranges next to tree nodes.
    pub show_positions: bool,
    /// Spaces per nesting level in human tree output.
    pub indent: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            format: OutputFormat::Human,
            show_positions: true,
            indent: 2,
        }
    }
}

/// Parse outcome for a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStatus {
    pub path: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileStatus {
    pub fn passed(path: impl Into<String>, nodes: usize) -> Self {
        FileStatus {
            path: path.into(),
            ok: true,
            nodes: Some(nodes),
            error: None,
        }
    }

    pub fn failed(path: impl Into<String>, error: impl ToString) -> Self {
        FileStatus {
            path: path.into(),
            ok: false,
            nodes: None,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub files: Vec<FileStatus>,
}

impl CheckReport {
    pub fn failures(&self) -> usize {
        self.files.iter().filter(|f| !f.ok).count()
    }

    pub fn is_success(&self) -> bool {
        self.failures() == 0
    }
}

/// Summary of a loaded language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageInfo {
    pub name: &'static str,
    pub display_name: &'static str,
    pub abi_version: u32,
    pub node_kinds: Vec<&'static str>,
    pub supertypes: Vec<&'static str>,
    pub anonymous_kinds: usize,
    pub fields: Vec<&'static str>,
    pub control_keywords: usize,
    pub types: usize,
    pub builtin_statements: usize,
    pub builtin_functions: usize,
}

impl LanguageInfo {
    pub fn new(language: &Language) -> Self {
        let descriptor = language.descriptor();
        LanguageInfo {
            name: language.name(),
            display_name: language.display_name(),
            abi_version: language.abi_version(),
            node_kinds: language.visible_node_kinds().collect(),
            supertypes: descriptor.supertypes.to_vec(),
            anonymous_kinds: descriptor.keywords.len() + descriptor.directives.len(),
            fields: descriptor.field_names.to_vec(),
            control_keywords: keywords::CONTROL_KEYWORDS.len(),
            types: keywords::TYPES.len(),
            builtin_statements: keywords::BUILTIN_STATEMENTS.len(),
            builtin_functions: keywords::BUILTIN_FUNCTIONS.len(),
        }
    }
}

/// Anything the CLI prints.
pub enum Report<'a> {
    Tree(&'a Tree),
    Highlights(&'a Tree, &'a [HighlightSpan]),
    Check(&'a CheckReport),
    Language(&'a LanguageInfo),
}

pub fn format_output(report: &Report<'_>, config: &OutputConfig) -> String {
    match config.format {
        OutputFormat::Human => format_human(report, config),
        OutputFormat::Json => format_json(report),
    }
}
