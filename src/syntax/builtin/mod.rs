//! Built-in grammars and themes
//!
//! These are registered by `Registry::new` so the crate is usable
//! without any grammar or theme files on disk.

mod abc;
mod c;
mod cs;
mod json;
mod rust;
mod themes;

use super::grammar::Grammar;
use super::theme::Theme;

/// Get all built-in grammars
pub fn all_grammars() -> Vec<Grammar> {
    vec![
        rust::rust_grammar(),
        c::c_grammar(),
        cs::cs_grammar(),
        json::json_grammar(),
        abc::abc_grammar(),
    ]
}

/// Get all built-in themes
pub fn all_themes() -> Vec<Theme> {
    vec![
        themes::dark_theme(),
        themes::light_theme(),
        themes::dark_plus_theme(),
        themes::light_plus_theme(),
        themes::monokai_theme(),
    ]
}
