//! scopepaint - TextMate-style syntax highlighting
//!
//! Interprets TextMate grammars over a whole buffer, resolves the
//! resulting scopes against a theme, and renders disjoint styled spans.

pub mod config;
pub mod error;
pub mod render;
pub mod syntax;

pub use config::Config;
pub use error::{Error, GrammarError, Result};
pub use syntax::{highlight, Grammar, HighlightOptions, Registry, Span, Theme};
