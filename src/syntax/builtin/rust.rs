//! Rust grammar

use crate::syntax::grammar::{Capture, Grammar, Pattern};

/// Create the Rust grammar
pub fn rust_grammar() -> Grammar {
    let keywords = r"\b(as|async|await|const|crate|dyn|enum|extern|fn|impl|in|let|mod|move|mut|pub|ref|self|Self|static|struct|super|trait|type|union|unsafe|use|where)\b";
    let control = r"\b(break|continue|else|for|if|loop|match|return|while)\b";
    let types = r"\b(bool|char|str|u8|u16|u32|u64|u128|usize|i8|i16|i32|i64|i128|isize|f32|f64|String|Vec|Box|Rc|Arc|Option|Result)\b";

    Grammar::new("source.rust")
        .named("Rust")
        .with_file_type("rs")
        .with_pattern(Pattern::include("#keywords"))
        .with_pattern(Pattern::include("#types"))
        .with_pattern(Pattern::include("#functions"))
        .with_pattern(Pattern::include("#numbers"))
        .with_pattern(Pattern::matching(r"[+\-*/%&|^!<>=@]+").named("keyword.operator.rust"))
        .with_pattern(Pattern::matching(r"'[A-Za-z_]\w*").named("storage.modifier.lifetime.rust"))
        .with_pattern(Pattern::matching(r"#!?\[[^\]\n]*\]").named("meta.attribute.rust"))
        .with_pattern(Pattern::include("#literals"))
        .with_rule(
            "keywords",
            Pattern::group(vec![
                Pattern::matching(control).named("keyword.control.rust"),
                Pattern::matching(keywords).named("keyword.other.rust"),
                Pattern::matching(r"\b(true|false|None|Some|Ok|Err)\b").named("constant.language.rust"),
            ]),
        )
        .with_rule(
            "types",
            Pattern::group(vec![
                Pattern::matching(types).named("support.type.rust"),
                Pattern::matching(r"\b[A-Z][a-zA-Z0-9_]*\b").named("entity.name.type.rust"),
            ]),
        )
        .with_rule(
            "functions",
            Pattern::group(vec![
                Pattern::matching(r"\bfn\s+([A-Za-z_]\w*)")
                    .with_capture(1, Capture::scope("entity.name.function.rust")),
                Pattern::matching(r"\b[a-z_]\w*!").named("entity.name.function.macro.rust"),
            ]),
        )
        .with_rule(
            "numbers",
            Pattern::group(vec![
                Pattern::matching(r"\b0x[0-9a-fA-F_]+\b").named("constant.numeric.hex.rust"),
                Pattern::matching(r"\b0b[01_]+\b").named("constant.numeric.binary.rust"),
                Pattern::matching(r"\b0o[0-7_]+\b").named("constant.numeric.octal.rust"),
                Pattern::matching(r"\b\d[\d_]*\.\d[\d_]*(?:[eE][+-]?\d+)?\b").named("constant.numeric.float.rust"),
                Pattern::matching(r"\b\d[\d_]*(?:u8|u16|u32|u64|u128|usize|i8|i16|i32|i64|i128|isize)?\b")
                    .named("constant.numeric.integer.rust"),
            ]),
        )
        .with_rule("literals", literals())
        .with_rule(
            "escapes",
            Pattern::matching(r"\\(?:[nrt\\0'\x22]|x[0-9a-fA-F]{2}|u\{[0-9a-fA-F]{1,6}\})")
                .named("constant.character.escape.rust"),
        )
}

/// Comments, strings and char literals as one alternation
///
/// The leftmost literal wins, so comment markers inside a string and
/// quotes inside a comment start nothing. An unclosed block comment or
/// string runs to the end of the region.
fn literals() -> Pattern {
    let alternatives = [
        r"(/\*(?s:.*?)(?:\*/|\z))",
        r"(///.*$)",
        r"(//.*$)",
        r###"(\br"[^"]*"?|\br#"(?s:.*?)(?:"#|\z)|\br##"(?s:.*?)(?:"##|\z))"###,
        r#"("(?:[^"\\]|\\.)*"?)"#,
        r"('(?:[^'\\\n]|\\.)')",
    ];
    let escapes = || vec![Pattern::include("#escapes")];

    Pattern::matching(&alternatives.join("|"))
        .with_capture(1, Capture::scope("comment.block.rust"))
        .with_capture(2, Capture::scope("comment.line.documentation.rust"))
        .with_capture(3, Capture::scope("comment.line.double-slash.rust"))
        .with_capture(4, Capture::scope("string.quoted.raw.rust"))
        .with_capture(5, Capture::scope("string.quoted.double.rust").with_patterns(escapes()))
        .with_capture(6, Capture::scope("string.quoted.single.rust").with_patterns(escapes()))
}
