//! Syntax and styling module
//!
//! This module provides the TextMate-style highlighting pipeline:
//! - Grammar and theme documents
//! - Whole-buffer tokenization into scoped tokens
//! - Theme resolution into disjoint styled spans

mod builtin;
pub mod grammar;
mod manager;
pub mod pipeline;
pub mod rules;
pub mod spans;
pub mod style;
pub mod theme;
pub mod tokenizer;

pub use grammar::{Capture, Grammar, Pattern};
pub use manager::Registry;
pub use pipeline::{highlight, HighlightOptions};
pub use spans::{resolve_spans, resolve_spans_with};
pub use style::{Color, FontStyle, FontWeight, Span, StyleAttributes};
pub use theme::{SelectorPolicy, Theme};
pub use tokenizer::{tokenize, tokenize_with, NestedMatchScope, Token, TokenizeOptions};
