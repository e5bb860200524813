//! Parser module for PPL
//!
//! [`Parser`] binds a [`Language`] and turns source text into a [`Tree`].

mod builder;
pub mod grammar;

use serde::{Deserialize, Serialize};

use crate::error::{PplError, Result};
use crate::language::{self, Language, ABI_VERSION, LANGUAGE};
use crate::tree::Tree;

use builder::TreeBuilder;

pub use grammar::{PplParser, Rule};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Keep `;`, `'` and `*` comments as extra nodes.
    pub keep_comments: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            keep_comments: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct Parser {
    language: Option<Language>,
    options: ParserOptions,
}

impl Parser {
    pub fn new() -> Self {
        Parser::default()
    }

    pub fn with_options(options: ParserOptions) -> Self {
        Parser {
            language: None,
            options,
        }
    }

    /// Bind a language. The handle must describe the PPL grammar this crate
    /// was compiled with.
    pub fn set_language(&mut self, language: &Language) -> Result<()> {
        check_compatible(language)?;
        tracing::trace!(language = language.name(), "parser language set");
        self.language = Some(language.clone());
        Ok(())
    }

    pub fn language(&self) -> Option<&Language> {
        self.language.as_ref()
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn parse(&self, source: &str) -> Result<Tree> {
        let language = self.language.as_ref().ok_or(PplError::LanguageNotSet)?;

        let root = grammar::parse_source_file(source)?;
        let nodes = TreeBuilder::new(language, source, &self.options).build(root)?;
        let tree = Tree::new(language.clone(), source.to_string(), nodes);

        tracing::debug!(
            bytes = source.len(),
            nodes = tree.node_count(),
            "parsed source"
        );
        Ok(tree)
    }
}

fn check_compatible(language: &Language) -> Result<()> {
    let incompatible = || PplError::IncompatibleLanguage {
        expected: format!("{} (ABI {})", LANGUAGE.name, ABI_VERSION),
        found: format!("{} (ABI {})", language.name(), language.abi_version()),
    };

    if language.name() != LANGUAGE.name || language.abi_version() != ABI_VERSION {
        return Err(incompatible());
    }

    let kinds_present = LANGUAGE
        .node_kinds
        .iter()
        .all(|kind| language.id_for_node_kind(kind, true).is_some())
        && LANGUAGE
            .keywords
            .iter()
            .chain(LANGUAGE.directives)
            .all(|token| language.id_for_node_kind(token, false).is_some())
        && LANGUAGE
            .field_names
            .iter()
            .all(|field| language.field_id_for_name(field).is_some());
    if !kinds_present {
        return Err(incompatible());
    }

    Ok(())
}

/// Parse PPL source with the shared language and default options.
pub fn parse(source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser.set_language(&language::language()?)?;
    parser.parse(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::GrammarDescriptor;

    fn sexp(source: &str) -> String {
        parse(source).unwrap().root_node().to_sexp()
    }

    #[test]
    fn test_parse_without_language() {
        let parser = Parser::new();
        assert!(matches!(parser.parse("BREAK"), Err(PplError::LanguageNotSet)));
    }

    #[test]
    fn test_incompatible_language_rejected() {
        let other = GrammarDescriptor {
            name: "other",
            ..LANGUAGE
        };
        let language = Language::new(&other).unwrap();
        let mut parser = Parser::new();
        assert!(matches!(
            parser.set_language(&language),
            Err(PplError::IncompatibleLanguage { .. })
        ));
        assert!(parser.language().is_none());
    }

    #[test]
    fn test_language_missing_kinds_rejected() {
        let partial = GrammarDescriptor {
            node_kinds: &["source_file", "identifier"],
            ..LANGUAGE
        };
        let language = Language::new(&partial).unwrap();
        let mut parser = Parser::new();
        assert!(parser.set_language(&language).is_err());
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(sexp(""), "(source_file)");
        assert_eq!(sexp("\n\n"), "(source_file)");
    }

    #[test]
    fn test_predefined_call() {
        assert_eq!(
            sexp("PRINTLN \"Hello\""),
            "(source_file (predefined_call name: (builtin_statement) \
             (bare_args (argument_sequence (string_literal)))))"
        );
    }

    #[test]
    fn test_assignment_precedence() {
        assert_eq!(
            sexp("x = 1 + 2 * 3"),
            "(source_file (let_statement target: (identifier) operator: (operator) \
             value: (binary_expression left: (int_number) operator: (operator) \
             right: (binary_expression left: (int_number) operator: (operator) right: (int_number)))))"
        );
    }

    #[test]
    fn test_unary_and_logical() {
        assert_eq!(
            sexp("ok = !a && b"),
            "(source_file (let_statement target: (identifier) operator: (operator) \
             value: (binary_expression left: (unary_expression operator: (operator) operand: (identifier)) \
             operator: (operator) right: (identifier))))"
        );
    }

    #[test]
    fn test_member_and_index() {
        assert_eq!(
            sexp("v = rec.field"),
            "(source_file (let_statement target: (identifier) operator: (operator) \
             value: (member_reference object: (identifier) member: (identifier))))"
        );
        let tree = parse("v = (a)(1, 2)").unwrap();
        let value = tree
            .root_node()
            .named_child(0)
            .and_then(|s| s.child_by_field_name("value"))
            .unwrap();
        assert_eq!(value.kind(), "index_expression");
        assert_eq!(value.utf8_text(), "(a)(1, 2)");
        assert_eq!(value.children_by_field_name("index").count(), 2);
    }

    #[test]
    fn test_keep_comments_option() {
        let source = "; header\nCLS ; clear\n";
        let tree = parse(source).unwrap();
        let comments: Vec<_> = tree.walk().filter(|n| n.kind() == "comment").collect();
        assert_eq!(comments.len(), 2);
        assert!(comments.iter().all(|c| c.is_extra()));
        assert_eq!(comments[1].utf8_text(), "; clear");

        let mut parser = Parser::with_options(ParserOptions {
            keep_comments: false,
        });
        parser.set_language(&language::language().unwrap()).unwrap();
        let tree = parser.parse(source).unwrap();
        assert_eq!(tree.root_node().to_sexp(), "(source_file (predefined_call name: (builtin_statement)))");
    }

    #[test]
    fn test_syntax_error_reports_line() {
        match parse("WHILE (x) DO\n  INC x\n") {
            Err(PplError::Parse { line, message, .. }) => {
                assert_eq!(line, 3);
                assert!(message.contains("ENDWHILE"), "message was {}", message);
            }
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_is_repeatable() {
        let source = "INTEGER i\nFOR i = 1 TO 10\n  PRINTLN i\nNEXT\n";
        assert_eq!(sexp(source), sexp(source));
    }
}
