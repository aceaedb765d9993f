//! Error types for scopepaint

use thiserror::Error;

/// Result type alias for scopepaint operations
pub type Result<T> = std::result::Result<T, Error>;

/// A grammar rule that cannot be used for tokenization
///
/// Any of these fails the whole tokenize call; no partial token
/// list is produced.
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("invalid regex `{pattern}`: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("rule with begin `{begin}` has no end pattern")]
    MissingEnd { begin: String },

    #[error("rule with end `{end}` has no begin pattern")]
    MissingBegin { end: String },

    #[error("rule `{rule}` sets more than one of match, begin/end and include")]
    ConflictingStrategies { rule: String },
}

/// Crate-level error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Grammar error: {0}")]
    Grammar(#[from] GrammarError),

    #[error("No such grammar: {0}")]
    UnknownGrammar(String),

    #[error("No such theme: {0}")]
    UnknownTheme(String),

    #[error("{0}")]
    Message(String),
}
