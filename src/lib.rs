//! ppl-grammar - the PCBoard Programming Language grammar for Rust
//!
//! The crate ships the PPL grammar as a [`GrammarDescriptor`], turns it into
//! a [`Language`] handle and parses source text into concrete syntax trees.
//!
//! # Example
//!
//! ```
//! use ppl_grammar::{grammar, Language, Parser};
//!
//! let language = Language::new(grammar()).expect("Error loading PCBoard Programming Language grammar");
//! let mut parser = Parser::new();
//! parser.set_language(&language).unwrap();
//!
//! let tree = parser.parse("PRINTLN \"Hello, World!\"\n").unwrap();
//! assert_eq!(tree.root_node().kind(), "source_file");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod highlight;
pub mod keywords;
pub mod language;
pub mod output;
pub mod parser;
pub mod tree;

pub use config::Config;
pub use error::{LoadFailure, PplError, Result};
pub use highlight::{highlight, HighlightClass, HighlightSpan};
pub use keywords::KeywordClass;
pub use language::{grammar, language, GrammarDescriptor, Language, ABI_VERSION, LANGUAGE};
pub use output::{format_output, OutputFormat};
pub use parser::{parse, Parser, ParserOptions};
pub use tree::{Node, Point, Tree};
