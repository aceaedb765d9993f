//! C# grammar

use crate::syntax::grammar::{Capture, Grammar, Pattern};

/// Create the C# grammar
pub fn cs_grammar() -> Grammar {
    let control = r"\b(break|case|catch|continue|default|do|else|finally|for|foreach|goto|if|return|switch|throw|try|when|while|yield)\b";
    let keywords = r"\b(abstract|as|async|await|base|checked|class|const|delegate|enum|event|explicit|extern|fixed|get|implicit|in|init|interface|internal|is|lock|namespace|new|operator|out|override|params|partial|private|protected|public|readonly|record|ref|sealed|set|sizeof|stackalloc|static|struct|this|typeof|unchecked|unsafe|using|var|virtual|volatile|where|with)\b";
    let types = r"\b(bool|byte|char|decimal|double|dynamic|float|int|long|nint|nuint|object|sbyte|short|string|uint|ulong|ushort|void)\b";

    Grammar::new("source.cs")
        .named("C#")
        .with_file_type("cs")
        .with_file_type("csx")
        .with_pattern(Pattern::matching(r"^\s*#\s*\w+").named("meta.preprocessor.cs"))
        .with_pattern(Pattern::include("#keywords"))
        .with_pattern(
            Pattern::matching(r"\b(?:class|struct|interface|enum|record)\s+([A-Za-z_]\w*)")
                .with_capture(1, Capture::scope("entity.name.type.cs")),
        )
        .with_pattern(Pattern::include("#numbers"))
        .with_pattern(Pattern::matching(r"[+\-*/%&|^!<>=~?:]+").named("keyword.operator.cs"))
        .with_pattern(
            Pattern::matching(r"^\s*\[[A-Za-z_][\w.]*(?:\([^)\n]*\))?\]").named("meta.attribute.cs"),
        )
        .with_pattern(Pattern::include("#literals"))
        .with_rule(
            "keywords",
            Pattern::group(vec![
                Pattern::matching(control).named("keyword.control.cs"),
                Pattern::matching(keywords).named("keyword.other.cs"),
                Pattern::matching(types).named("storage.type.cs"),
                Pattern::matching(r"\b(true|false|null)\b").named("constant.language.cs"),
            ]),
        )
        .with_rule(
            "numbers",
            Pattern::group(vec![
                Pattern::matching(r"\b0[xX][0-9a-fA-F_]+[uUlL]*\b").named("constant.numeric.hex.cs"),
                Pattern::matching(r"\b0[bB][01_]+[uUlL]*\b").named("constant.numeric.binary.cs"),
                Pattern::matching(r"\b\d[\d_]*\.\d[\d_]*(?:[eE][+-]?\d+)?[fFdDmM]?\b")
                    .named("constant.numeric.float.cs"),
                Pattern::matching(r"\b\d[\d_]*(?:[uU][lL]?|[lL][uU]?|[fFdDmM])?\b")
                    .named("constant.numeric.integer.cs"),
            ]),
        )
        .with_rule("literals", literals())
        .with_rule(
            "escapes",
            Pattern::matching(r"\\(?:[0abfnrtv\\'\x22]|x[0-9a-fA-F]{1,4}|u[0-9a-fA-F]{4}|U[0-9a-fA-F]{8})")
                .named("constant.character.escape.cs"),
        )
}

/// Comments, strings and char literals as one alternation
///
/// Verbatim strings double their quotes and take no backslash escapes.
fn literals() -> Pattern {
    let alternatives = [
        r"(/\*(?s:.*?)(?:\*/|\z))",
        r"(///.*$)",
        r"(//.*$)",
        r#"((?:\$?@|@\$)"(?:[^"]|"")*"?)"#,
        r#"(\$?"(?:[^"\\\n]|\\.)*"?)"#,
        r"('(?:[^'\\\n]|\\(?:u[0-9a-fA-F]{4}|.))')",
    ];
    let escapes = || vec![Pattern::include("#escapes")];

    Pattern::matching(&alternatives.join("|"))
        .with_capture(1, Capture::scope("comment.block.cs"))
        .with_capture(2, Capture::scope("comment.line.documentation.cs"))
        .with_capture(3, Capture::scope("comment.line.double-slash.cs"))
        .with_capture(4, Capture::scope("string.quoted.double.verbatim.cs"))
        .with_capture(5, Capture::scope("string.quoted.double.cs").with_patterns(escapes()))
        .with_capture(6, Capture::scope("string.quoted.single.cs").with_patterns(escapes()))
}
