//! Grammar + theme + text to spans in one call

use super::grammar::Grammar;
use super::spans::resolve_spans_with;
use super::style::Span;
use super::theme::{SelectorPolicy, Theme};
use super::tokenizer::{tokenize_with, TokenizeOptions};
use crate::error::GrammarError;

/// Options for the whole pipeline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighlightOptions {
    pub tokenize: TokenizeOptions,
    pub selector_policy: SelectorPolicy,
}

/// Tokenize `text` and resolve the tokens into disjoint styled spans
///
/// On a `GrammarError` callers are expected to fall back to unstyled
/// text.
pub fn highlight(
    grammar: &Grammar,
    theme: &Theme,
    text: &str,
    options: &HighlightOptions,
) -> Result<Vec<Span>, GrammarError> {
    let tokens = tokenize_with(grammar, text, &options.tokenize)?;
    Ok(resolve_spans_with(
        &tokens,
        theme,
        text.len(),
        options.selector_policy,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::grammar::Pattern;
    use crate::syntax::style::StyleAttributes;

    fn boolean_grammar() -> Grammar {
        Grammar::new("source.test").with_pattern(
            Pattern::matching(r"\b(true|false)\b").named("constant.language.boolean"),
        )
    }

    #[test]
    fn test_end_to_end() {
        let base = StyleAttributes::new().with_foreground("#FFFFFF");
        let red = StyleAttributes::new().with_foreground("#FF0000");
        let theme = Theme::new(base.clone()).with_rule("constant.language", red.clone());

        let spans = highlight(&boolean_grammar(), &theme, "x = true", &HighlightOptions::default())
            .unwrap();
        assert_eq!(spans, vec![Span::new(0, 4, base), Span::new(4, 8, red)]);
    }

    #[test]
    fn test_idempotent() {
        let string = Pattern::block(r#"""#, r#"""#)
            .named("string.quoted")
            .with_patterns(vec![Pattern::matching(r"\\.").named("constant.character.escape")]);
        let grammar = Grammar::new("source.test")
            .with_pattern(string)
            .with_pattern(Pattern::matching(r"\d+").named("constant.numeric"));
        let theme = Theme::default()
            .with_rule("string", StyleAttributes::new().with_foreground("#00FF00"))
            .with_rule("constant", StyleAttributes::new().with_foreground("#0000FF"));
        let text = r#"n = 12 + "a\"b" "open"#;
        let options = HighlightOptions::default();

        let first = highlight(&grammar, &theme, text, &options).unwrap();
        let second = highlight(&grammar, &theme, text, &options).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.last().map(|s| s.end), Some(text.len()));
    }

    #[test]
    fn test_grammar_error_propagates() {
        let grammar = Grammar::new("source.test").with_pattern(Pattern::matching("(").named("x"));
        let result = highlight(&grammar, &Theme::default(), "(", &HighlightOptions::default());
        assert!(matches!(result, Err(GrammarError::InvalidRegex { .. })));
    }
}
