//! C/C++ grammar

use crate::syntax::grammar::{Capture, Grammar, Pattern};

/// Create the C grammar (also covers common C++ keywords)
///
/// Literals come last so that, at equal theme specificity, they paint
/// over keywords and numbers they contain.
pub fn c_grammar() -> Grammar {
    let control = r"\b(break|case|continue|default|do|else|for|goto|if|return|switch|while)\b";
    let storage = r"\b(auto|char|const|double|enum|extern|float|inline|int|long|register|restrict|short|signed|sizeof|static|struct|typedef|union|unsigned|void|volatile|_Alignas|_Alignof|_Atomic|_Bool|_Complex|_Generic|_Imaginary|_Noreturn|_Static_assert|_Thread_local)\b";
    let cpp_keywords = r"\b(alignas|alignof|and|and_eq|asm|bitand|bitor|bool|catch|class|compl|concept|consteval|constexpr|constinit|const_cast|co_await|co_return|co_yield|decltype|delete|dynamic_cast|explicit|export|friend|mutable|namespace|new|noexcept|not|not_eq|operator|or|or_eq|private|protected|public|reinterpret_cast|requires|static_assert|static_cast|template|this|thread_local|throw|try|typeid|typename|using|virtual|xor|xor_eq)\b";
    let types = r"\b(size_t|ptrdiff_t|intptr_t|uintptr_t|int8_t|int16_t|int32_t|int64_t|uint8_t|uint16_t|uint32_t|uint64_t|FILE)\b";

    Grammar::new("source.c")
        .named("C")
        .with_file_type("c")
        .with_file_type("h")
        .with_file_type("cpp")
        .with_file_type("hpp")
        .with_file_type("cc")
        .with_file_type("cxx")
        .with_pattern(Pattern::include("#preprocessor"))
        .with_pattern(Pattern::include("#keywords"))
        .with_pattern(Pattern::include("#numbers"))
        .with_pattern(Pattern::include("#operators"))
        .with_pattern(Pattern::include("#literals"))
        .with_rule(
            "preprocessor",
            Pattern::matching(r"^\s*#\s*\w+").named("meta.preprocessor.c"),
        )
        .with_rule(
            "keywords",
            Pattern::group(vec![
                Pattern::matching(control).named("keyword.control.c"),
                Pattern::matching(storage).named("storage.type.c"),
                Pattern::matching(cpp_keywords).named("keyword.other.cpp"),
                Pattern::matching(types).named("support.type.c"),
                Pattern::matching(r"\b(NULL|nullptr|true|false)\b").named("constant.language.c"),
            ]),
        )
        .with_rule(
            "numbers",
            Pattern::group(vec![
                Pattern::matching(r"\b0[xX][0-9a-fA-F]+[uUlL]*\b").named("constant.numeric.hex.c"),
                Pattern::matching(r"\b\d+\.\d*(?:[eE][+-]?\d+)?[fFlL]?\b|\B\.\d+(?:[eE][+-]?\d+)?[fFlL]?\b")
                    .named("constant.numeric.float.c"),
                Pattern::matching(r"\b\d+[uUlL]*\b").named("constant.numeric.integer.c"),
            ]),
        )
        .with_rule(
            "operators",
            Pattern::matching(r"[+\-*/%&|^!<>=~?:]+").named("keyword.operator.c"),
        )
        .with_rule("literals", literals())
        .with_rule(
            "escapes",
            Pattern::matching(r"\\(?:[abfnrtv\\'\x22?]|[0-7]{1,3}|x[0-9a-fA-F]+)")
                .named("constant.character.escape.c"),
        )
}

/// Comments, strings and char literals as one alternation
///
/// Whichever literal starts first consumes its text, so `//` inside a
/// string is not a comment and quotes inside a comment are not strings.
fn literals() -> Pattern {
    let alternatives = [
        r"(/\*(?s:.*?)(?:\*/|\z))",
        r"(//.*$)",
        r#"("(?:[^"\\\n]|\\.)*"?)"#,
        r"('(?:[^'\\\n]|\\.)')",
    ];
    let escapes = || vec![Pattern::include("#escapes")];

    Pattern::matching(&alternatives.join("|"))
        .with_capture(1, Capture::scope("comment.block.c"))
        .with_capture(2, Capture::scope("comment.line.double-slash.c"))
        .with_capture(3, Capture::scope("string.quoted.double.c").with_patterns(escapes()))
        .with_capture(4, Capture::scope("string.quoted.single.c").with_patterns(escapes()))
}
