//! Grammar descriptor and language handle
//!
//! [`LANGUAGE`] is the raw description of the PPL grammar: its name, the node
//! kinds the syntax tree builder emits and the field names it assigns.
//! [`Language::new`] validates a descriptor and turns it into a [`Language`]
//! handle that parsers and trees share.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::{LoadFailure, PplError, Result};
use crate::keywords::{self, KeywordClass};

/// Version of the node/field table layout. A parser only accepts languages
/// built for the same version.
pub const ABI_VERSION: u32 = 1;

/// Static description of a grammar, as compiled into the crate.
#[derive(Debug, Clone, Copy)]
pub struct GrammarDescriptor {
    /// Short machine name (`ppl`).
    pub name: &'static str,
    /// Human readable name used in diagnostics.
    pub display_name: &'static str,
    pub abi_version: u32,
    /// Kind of the node every tree is rooted at.
    pub root_kind: &'static str,
    /// Named node kinds that appear in syntax trees.
    pub node_kinds: &'static [&'static str],
    /// Named kinds the grammar groups rules under but which never appear in
    /// a tree.
    pub supertypes: &'static [&'static str],
    /// Keyword tokens, emitted as anonymous nodes.
    pub keywords: &'static [&'static str],
    /// Preprocessor directive tokens, emitted as anonymous nodes.
    pub directives: &'static [&'static str],
    pub field_names: &'static [&'static str],
}

impl GrammarDescriptor {
    /// A descriptor with nothing in it. Loading it always fails.
    pub const EMPTY: GrammarDescriptor = GrammarDescriptor {
        name: "",
        display_name: "",
        abi_version: 0,
        root_kind: "",
        node_kinds: &[],
        supertypes: &[],
        keywords: &[],
        directives: &[],
        field_names: &[],
    };
}

/// The PCBoard Programming Language grammar.
pub const LANGUAGE: GrammarDescriptor = GrammarDescriptor {
    name: "ppl",
    display_name: "PCBoard Programming Language",
    abi_version: ABI_VERSION,
    root_kind: "source_file",
    node_kinds: NODE_KINDS,
    supertypes: SUPERTYPES,
    keywords: keywords::CONTROL_KEYWORDS,
    directives: DIRECTIVES,
    field_names: FIELD_NAMES,
};

const NODE_KINDS: &[&str] = &[
    "source_file",
    // preprocessor
    "preprocessor_section",
    "define_directive",
    "undef_directive",
    "include_directive",
    "if_directive",
    "elif_directive",
    "else_directive",
    "endif_directive",
    "version_directive",
    // declarations
    "function_declaration",
    "function_implementation",
    "procedure_declaration",
    "procedure_implementation",
    "parameter_list",
    "parameter",
    "variable_declaration",
    "array_dimensions",
    // statements
    "expression_statement",
    "let_statement",
    "if_single_line_statement",
    "if_block_statement",
    "elseif_block",
    "else_block",
    "select_statement",
    "case_block",
    "case_specifier_list",
    "case_specifier",
    "default_block",
    "while_single_line_statement",
    "while_block_statement",
    "repeat_until_statement",
    "loop_block_statement",
    "for_block_statement",
    "goto_statement",
    "gosub_statement",
    "return_statement",
    "break_statement",
    "continue_statement",
    "end_statement",
    "stop_statement",
    "block_statement",
    "predefined_call",
    "procedure_call",
    "parenthesized_args",
    "bare_args",
    "argument_sequence",
    // expressions
    "call_expression",
    "parens_expression",
    "member_reference",
    "index_expression",
    "binary_expression",
    "unary_expression",
    "operator",
    // leaves
    "label",
    "comment",
    "type",
    "builtin_statement",
    "builtin_function",
    "string_literal",
    "int_number",
    "float_number",
    "hex_number",
    "boolean_literal",
    "at_color_code",
    "identifier",
];

const SUPERTYPES: &[&str] = &[
    "top_level_item",
    "statement",
    "expression",
    "constant",
    "number_literal",
    "preprocessor_directive",
];

const DIRECTIVES: &[&str] = &[
    ";$DEFINE", ";$UNDEF", ";$INCLUDE", ";$IF", ";$ELIF", ";$ELSE", ";$ENDIF", ";#",
];

const FIELD_NAMES: &[&str] = &[
    "array",
    "body",
    "condition",
    "cond",
    "end",
    "function",
    "index",
    "initializer",
    "key",
    "label",
    "left",
    "member",
    "name",
    "object",
    "operand",
    "operator",
    "path",
    "return_type",
    "right",
    "selector",
    "start",
    "step",
    "target",
    "then",
    "type",
    "value",
    "var",
    "var_repeat",
];

/// The raw PPL grammar descriptor.
pub fn grammar() -> &'static GrammarDescriptor {
    &LANGUAGE
}

/// Shared PPL language handle, loaded on first use.
pub fn language() -> Result<Language> {
    static PPL: OnceCell<Language> = OnceCell::new();
    PPL.get_or_try_init(|| Language::new(grammar())).cloned()
}

#[derive(Debug, Clone, Copy)]
struct Symbol {
    name: &'static str,
    named: bool,
    visible: bool,
}

struct LanguageInner {
    descriptor: GrammarDescriptor,
    symbols: Vec<Symbol>,
    named_ids: HashMap<&'static str, u16>,
    anonymous_ids: HashMap<&'static str, u16>,
    field_ids: HashMap<&'static str, u16>,
}

/// A loaded grammar. Cloning is cheap; clones share the same tables.
#[derive(Clone)]
pub struct Language {
    inner: Arc<LanguageInner>,
}

impl Language {
    /// Build a language handle from a grammar descriptor.
    pub fn new(descriptor: &GrammarDescriptor) -> Result<Language> {
        let inner = LanguageInner::build(descriptor).map_err(|reason| {
            let grammar = match (descriptor.display_name, descriptor.name) {
                ("", "") => "unnamed".to_string(),
                ("", name) => name.to_string(),
                (display, _) => display.to_string(),
            };
            tracing::debug!(%grammar, %reason, "grammar descriptor rejected");
            PplError::GrammarLoad { grammar, reason }
        })?;

        tracing::debug!(
            grammar = descriptor.name,
            symbols = inner.symbols.len(),
            fields = descriptor.field_names.len(),
            "loaded grammar"
        );

        Ok(Language {
            inner: Arc::new(inner),
        })
    }

    pub fn name(&self) -> &'static str {
        self.inner.descriptor.name
    }

    pub fn display_name(&self) -> &'static str {
        self.inner.descriptor.display_name
    }

    pub fn abi_version(&self) -> u32 {
        self.inner.descriptor.abi_version
    }

    pub fn root_kind(&self) -> &'static str {
        self.inner.descriptor.root_kind
    }

    pub fn descriptor(&self) -> &GrammarDescriptor {
        &self.inner.descriptor
    }

    /// Number of symbols: named kinds, supertypes and anonymous tokens.
    pub fn node_kind_count(&self) -> usize {
        self.inner.symbols.len()
    }

    pub fn node_kind_for_id(&self, id: u16) -> Option<&'static str> {
        self.inner.symbols.get(id as usize).map(|s| s.name)
    }

    /// Look up a node kind. Anonymous tokens are matched without regard to
    /// case.
    pub fn id_for_node_kind(&self, kind: &str, named: bool) -> Option<u16> {
        if named {
            self.inner.named_ids.get(kind).copied()
        } else {
            self.inner
                .anonymous_ids
                .get(kind.to_ascii_uppercase().as_str())
                .copied()
        }
    }

    pub fn node_kind_is_named(&self, id: u16) -> bool {
        self.inner
            .symbols
            .get(id as usize)
            .map_or(false, |s| s.named)
    }

    /// Supertypes are named but never appear in a tree.
    pub fn node_kind_is_visible(&self, id: u16) -> bool {
        self.inner
            .symbols
            .get(id as usize)
            .map_or(false, |s| s.visible)
    }

    pub fn field_count(&self) -> usize {
        self.inner.descriptor.field_names.len()
    }

    pub fn field_id_for_name(&self, name: &str) -> Option<u16> {
        self.inner.field_ids.get(name).copied()
    }

    pub fn field_name_for_id(&self, id: u16) -> Option<&'static str> {
        self.inner.descriptor.field_names.get(id as usize).copied()
    }

    /// Named kinds that can appear in a syntax tree, in id order.
    pub fn visible_node_kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.inner
            .symbols
            .iter()
            .filter(|s| s.named && s.visible)
            .map(|s| s.name)
    }

    pub fn keyword_class(&self, word: &str) -> Option<KeywordClass> {
        keywords::classify(word)
    }
}

impl LanguageInner {
    fn build(descriptor: &GrammarDescriptor) -> std::result::Result<Self, LoadFailure> {
        if descriptor.name.is_empty() {
            return Err(LoadFailure::MissingName);
        }
        if descriptor.abi_version != ABI_VERSION {
            return Err(LoadFailure::IncompatibleVersion {
                expected: ABI_VERSION,
                found: descriptor.abi_version,
            });
        }
        if descriptor.node_kinds.is_empty() {
            return Err(LoadFailure::EmptyNodeTable);
        }

        let total = descriptor.node_kinds.len()
            + descriptor.supertypes.len()
            + descriptor.keywords.len()
            + descriptor.directives.len();
        if total > u16::MAX as usize {
            return Err(LoadFailure::TooManySymbols(total));
        }

        let mut symbols = Vec::with_capacity(total);
        let mut named_ids = HashMap::new();
        let mut anonymous_ids = HashMap::new();

        let named = descriptor
            .node_kinds
            .iter()
            .map(|name| (*name, true))
            .chain(descriptor.supertypes.iter().map(|name| (*name, false)));
        for (name, visible) in named {
            let id = symbols.len() as u16;
            if named_ids.insert(name, id).is_some() {
                return Err(LoadFailure::DuplicateKind(name.to_string()));
            }
            symbols.push(Symbol {
                name,
                named: true,
                visible,
            });
        }

        for &name in descriptor.keywords.iter().chain(descriptor.directives) {
            let id = symbols.len() as u16;
            if anonymous_ids.insert(name, id).is_some() {
                return Err(LoadFailure::DuplicateKind(name.to_string()));
            }
            symbols.push(Symbol {
                name,
                named: false,
                visible: true,
            });
        }

        match named_ids.get(descriptor.root_kind) {
            Some(id) if symbols[*id as usize].visible => {}
            _ => return Err(LoadFailure::MissingRoot(descriptor.root_kind.to_string())),
        }

        let mut field_ids = HashMap::new();
        for (id, name) in descriptor.field_names.iter().enumerate() {
            if field_ids.insert(*name, id as u16).is_some() {
                return Err(LoadFailure::DuplicateField(name.to_string()));
            }
        }

        Ok(LanguageInner {
            descriptor: *descriptor,
            symbols,
            named_ids,
            anonymous_ids,
            field_ids,
        })
    }
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name() && self.abi_version() == other.abi_version()
    }
}

impl Eq for Language {}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Language")
            .field("name", &self.name())
            .field("abi_version", &self.abi_version())
            .field("node_kinds", &self.node_kind_count())
            .field("fields", &self.field_count())
            .finish()
    }
}

impl TryFrom<&GrammarDescriptor> for Language {
    type Error = PplError;

    fn try_from(descriptor: &GrammarDescriptor) -> Result<Self> {
        Language::new(descriptor)
    }
}
