//! The small recursive grammar from the TextMate grammar documentation

use crate::syntax::grammar::{Capture, Grammar, Pattern};

/// Letters `a`, `b`, `c` and arbitrarily nested parentheses
pub fn abc_grammar() -> Grammar {
    Grammar::new("source.abc")
        .named("ABC")
        .with_file_type("abc")
        .with_pattern(Pattern::include("#expression"))
        .with_rule(
            "expression",
            Pattern::group(vec![
                Pattern::include("#letter"),
                Pattern::include("#paren-expression"),
            ]),
        )
        .with_rule("letter", Pattern::matching("a|b|c").named("keyword.letter"))
        .with_rule(
            "paren-expression",
            Pattern::block(r"\(", r"\)")
                .named("expression.group")
                .with_begin_capture(0, Capture::scope("punctuation.paren.open"))
                .with_end_capture(0, Capture::scope("punctuation.paren.close"))
                .with_patterns(vec![Pattern::include("#expression")]),
        )
}
