//! JSON grammar

use crate::syntax::grammar::{Capture, Grammar, Pattern};

/// Create the JSON grammar
pub fn json_grammar() -> Grammar {
    let string = r#""(?:[^"\\\n]|\\.)*"?"#;

    Grammar::new("source.json")
        .named("JSON")
        .with_file_type("json")
        .with_pattern(Pattern::matching(r"[{}\[\],:]").named("punctuation.separator.json"))
        .with_pattern(
            Pattern::matching(r"-?(?:0|[1-9]\d*)(?:\.\d+)?(?:[eE][+-]?\d+)?")
                .named("constant.numeric.json"),
        )
        .with_pattern(Pattern::matching(r"\b(?:true|false|null)\b").named("constant.language.json"))
        .with_pattern(
            Pattern::matching(string)
                .named("string.quoted.double.json")
                .with_patterns(vec![Pattern::include("#escapes")]),
        )
        .with_pattern(
            Pattern::matching(&format!(r"({})\s*:", string))
                .with_capture(1, Capture::scope("support.type.property-name.json")),
        )
        .with_rule(
            "escapes",
            Pattern::group(vec![
                Pattern::matching(r#"\\(?:["\\/bfnrt]|u[0-9a-fA-F]{4})"#)
                    .named("constant.character.escape.json"),
                Pattern::matching(r"\\.").named("invalid.illegal.unrecognized-string-escape.json"),
            ]),
        )
}
