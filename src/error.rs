//! Error types for ppl-grammar

use thiserror::Error;

/// Why a grammar descriptor could not be turned into a [`Language`](crate::Language).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadFailure {
    #[error("descriptor has no name")]
    MissingName,

    #[error("incompatible ABI version {found} (expected {expected})")]
    IncompatibleVersion { expected: u32, found: u32 },

    #[error("descriptor has no node kinds")]
    EmptyNodeTable,

    #[error("root kind `{0}` is not a named node kind")]
    MissingRoot(String),

    #[error("node kind `{0}` is declared twice")]
    DuplicateKind(String),

    #[error("field `{0}` is declared twice")]
    DuplicateField(String),

    #[error("too many symbols ({0})")]
    TooManySymbols(usize),
}

#[derive(Error, Debug)]
pub enum PplError {
    #[error("Error loading {grammar} grammar: {reason}")]
    GrammarLoad { grammar: String, reason: LoadFailure },

    #[error("Incompatible language `{found}` (parser expects `{expected}`)")]
    IncompatibleLanguage { expected: String, found: String },

    #[error("No language set on parser")]
    LanguageNotSet,

    #[error("Parse error at {line}:{column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Node kind `{0}` is not part of the language")]
    UnknownNodeKind(String),

    #[error("Field `{0}` is not part of the language")]
    UnknownField(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PplError>;
