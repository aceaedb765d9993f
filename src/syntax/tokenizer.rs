//! Pattern tokenizer
//!
//! Interprets a grammar's rule tree against a whole text buffer and
//! produces a flat list of scoped byte ranges. Nested rules emit their
//! own tokens on top of the enclosing ones, so the result may overlap
//! and is not sorted; the span resolver imposes order later.

use std::ops::Range;

use regex::Captures as RegexCaptures;
use serde::Deserialize;

use super::grammar::{Captures, Grammar, Pattern, RuleRef, Strategy};
use super::rules::{find_in, next_char_boundary, CompiledRules, RegionMatches};
use crate::error::GrammarError;

/// Default cap on nested `include` expansion
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 64;

/// A scoped range of the input text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Byte offset where this token starts (inclusive)
    pub start: usize,
    /// Byte offset where this token ends (exclusive)
    pub end: usize,
    /// Scope name assigned by the producing rule
    pub scope: &'a str,
    /// The covered text
    pub text: &'a str,
}

impl Token<'_> {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Where the nested patterns of a `match` rule are applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NestedMatchScope {
    /// Only inside the text the match covered
    #[default]
    Confined,
    /// Across the whole region the rule itself was applied to
    WholeBuffer,
}

/// Tokenizer tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizeOptions {
    /// Include expansions nested deeper than this yield nothing
    pub max_include_depth: usize,
    pub nested_match_scope: NestedMatchScope,
}

impl Default for TokenizeOptions {
    fn default() -> Self {
        Self {
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            nested_match_scope: NestedMatchScope::default(),
        }
    }
}

/// Tokenize text with default options
pub fn tokenize<'a>(
    grammar: &'a Grammar,
    text: &'a str,
) -> Result<Vec<Token<'a>>, GrammarError> {
    tokenize_with(grammar, text, &TokenizeOptions::default())
}

/// Tokenize text
///
/// Fails with a `GrammarError` if any rule of the grammar is unusable,
/// before a single token is produced.
pub fn tokenize_with<'a>(
    grammar: &'a Grammar,
    text: &'a str,
    options: &TokenizeOptions,
) -> Result<Vec<Token<'a>>, GrammarError> {
    let rules = CompiledRules::compile(grammar)?;
    let mut tokenizer = Tokenizer {
        grammar,
        text,
        rules: &rules,
        options: *options,
        includes: Vec::new(),
        tokens: Vec::new(),
    };
    tokenizer.apply_all(grammar.patterns(), 0..text.len())?;

    tracing::trace!(
        grammar = grammar.scope_name(),
        regexes = rules.len(),
        tokens = tokenizer.tokens.len(),
        "tokenized"
    );
    Ok(tokenizer.tokens)
}

struct Tokenizer<'a, 'r> {
    grammar: &'a Grammar,
    text: &'a str,
    rules: &'r CompiledRules<'a>,
    options: TokenizeOptions,
    /// Include expansions currently in progress, with the region each covers
    includes: Vec<(RuleRef<'a>, Range<usize>)>,
    tokens: Vec<Token<'a>>,
}

impl<'a, 'r> Tokenizer<'a, 'r> {
    fn apply_all(&mut self, patterns: &'a [Pattern], region: Range<usize>) -> Result<(), GrammarError> {
        for pattern in patterns {
            self.apply(pattern, region.clone())?;
        }
        Ok(())
    }

    fn apply(&mut self, pattern: &'a Pattern, region: Range<usize>) -> Result<(), GrammarError> {
        if pattern.is_disabled() || region.start > region.end {
            return Ok(());
        }
        match pattern.strategy()? {
            Strategy::Match(source) => self.apply_match(pattern, source, region),
            Strategy::Block { begin, end } => self.apply_block(pattern, begin, end, region),
            Strategy::Include(target) => self.apply_include(target, region),
            Strategy::Group => self.apply_all(pattern.patterns(), region),
        }
    }

    fn apply_match(
        &mut self,
        pattern: &'a Pattern,
        source: &str,
        region: Range<usize>,
    ) -> Result<(), GrammarError> {
        let rules = self.rules;
        let Some(regex) = rules.get(source) else {
            return Ok(());
        };

        let mut matched = false;
        for caps in RegionMatches::new(regex, self.text, region.clone()) {
            let Some(whole) = caps.get(0) else { continue };
            if whole.start() == whole.end() {
                continue;
            }
            matched = true;

            self.push_match_captures(&caps, pattern)?;
            if self.options.nested_match_scope == NestedMatchScope::Confined {
                self.apply_all(pattern.patterns(), whole.range())?;
            }
        }

        if matched && self.options.nested_match_scope == NestedMatchScope::WholeBuffer {
            self.apply_all(pattern.patterns(), region)?;
        }
        Ok(())
    }

    fn apply_block(
        &mut self,
        pattern: &'a Pattern,
        begin_source: &str,
        end_source: &str,
        region: Range<usize>,
    ) -> Result<(), GrammarError> {
        let rules = self.rules;
        let (Some(begin_regex), Some(end_regex)) = (rules.get(begin_source), rules.get(end_source))
        else {
            return Ok(());
        };
        let text = self.text;
        let haystack = &text[..region.end];

        let begin_captures = fallback_captures(pattern.begin_captures(), pattern.captures());
        let end_captures = fallback_captures(pattern.end_captures(), pattern.captures());

        let mut pos = region.start;
        while pos <= haystack.len() {
            let Some(begin) = begin_regex.captures_at(haystack, pos) else {
                break;
            };
            let Some(opening) = begin.get(0) else { break };

            // Without an end match the block runs to the end of the region.
            let end = find_in(end_regex, text, opening.end(), region.end);
            let (interior_end, block_end) = match end.as_ref().and_then(|c| c.get(0)) {
                Some(closing) => (closing.start(), closing.end()),
                None => (region.end, region.end),
            };

            self.push(opening.start()..block_end, pattern.name());
            self.push(opening.end()..interior_end, pattern.content_name());
            self.push_captures(&begin, begin_captures, pattern.name())?;
            if let Some(end) = &end {
                self.push_captures(end, end_captures, pattern.name())?;
            }
            self.apply_all(pattern.patterns(), opening.end()..interior_end)?;

            pos = if block_end > opening.start() {
                block_end
            } else {
                next_char_boundary(haystack, block_end)
            };
        }
        Ok(())
    }

    fn apply_include(&mut self, target: RuleRef<'a>, region: Range<usize>) -> Result<(), GrammarError> {
        let grammar = self.grammar;
        let patterns: &'a [Pattern] = match target {
            RuleRef::Repository(name) => match grammar.rule(name) {
                Some(rule) => std::slice::from_ref(rule),
                None => {
                    tracing::debug!(rule = name, "unresolved include");
                    return Ok(());
                }
            },
            RuleRef::SelfGrammar => grammar.patterns(),
            RuleRef::External(scope) => {
                tracing::debug!(scope, "external grammar includes are not supported");
                return Ok(());
            }
        };

        if self
            .includes
            .iter()
            .any(|(active, active_region)| *active == target && *active_region == region)
        {
            tracing::debug!(?target, ?region, "cyclic include cut off");
            return Ok(());
        }
        if self.includes.len() >= self.options.max_include_depth {
            tracing::debug!(?target, depth = self.includes.len(), "include depth limit reached");
            return Ok(());
        }

        self.includes.push((target, region.clone()));
        let result = self.apply_all(patterns, region);
        self.includes.pop();
        result
    }

    /// Tokens for the capture groups of a `match` rule
    ///
    /// Every group falls back to the rule's name. A group tagging the
    /// same range with the same scope as the whole match adds nothing.
    fn push_match_captures(
        &mut self,
        caps: &RegexCaptures<'a>,
        pattern: &'a Pattern,
    ) -> Result<(), GrammarError> {
        let Some(whole) = caps.get(0) else {
            return Ok(());
        };
        let scope_of = move |group: usize| {
            pattern
                .captures()
                .get(&group)
                .and_then(|c| c.name())
                .or(pattern.name())
        };
        let whole_scope = scope_of(0);

        for (group, m) in caps.iter().enumerate() {
            let Some(m) = m else { continue };
            let scope = scope_of(group);
            if group == 0 || m.range() != whole.range() || scope != whole_scope {
                self.push(m.range(), scope);
            }
            if let Some(capture) = pattern.captures().get(&group) {
                self.apply_all(capture.patterns(), m.range())?;
            }
        }
        Ok(())
    }

    /// Tokens for the capture groups of a begin or end match
    ///
    /// Group 0 falls back to the rule's name; other groups only get a
    /// token when the rule assigns them a scope.
    fn push_captures(
        &mut self,
        caps: &RegexCaptures<'a>,
        captures: &'a Captures,
        fallback: Option<&'a str>,
    ) -> Result<(), GrammarError> {
        for (group, m) in caps.iter().enumerate() {
            let Some(m) = m else { continue };
            let capture = captures.get(&group);
            let scope = match capture.and_then(|c| c.name()) {
                Some(name) => Some(name),
                None if group == 0 => fallback,
                None => None,
            };
            self.push(m.range(), scope);
            if let Some(capture) = capture {
                self.apply_all(capture.patterns(), m.range())?;
            }
        }
        Ok(())
    }

    fn push(&mut self, range: Range<usize>, scope: Option<&'a str>) {
        let Some(scope) = scope else { return };
        if range.start >= range.end {
            return;
        }
        self.tokens.push(Token {
            start: range.start,
            end: range.end,
            scope,
            text: &self.text[range],
        });
    }
}

/// `beginCaptures`/`endCaptures`, or the shared `captures` when unset
fn fallback_captures<'a>(specific: &'a Captures, shared: &'a Captures) -> &'a Captures {
    if specific.is_empty() {
        shared
    } else {
        specific
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::grammar::Capture;

    fn summary(tokens: &[Token<'_>]) -> Vec<(usize, usize, String)> {
        let mut out: Vec<_> = tokens
            .iter()
            .map(|t| (t.start, t.end, t.scope.to_string()))
            .collect();
        out.sort();
        out
    }

    fn abc_grammar() -> Grammar {
        Grammar::new("source.abc")
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

    #[test]
    fn test_match_rule() {
        let grammar = Grammar::new("source.test").with_pattern(
            Pattern::matching(r"\b(true|false)\b").named("constant.language.boolean"),
        );
        let tokens = tokenize(&grammar, "x = true").unwrap();
        // Group 1 repeats the whole match, so it adds no second token
        assert_eq!(
            summary(&tokens),
            vec![(4, 8, "constant.language.boolean".to_string())]
        );
        assert_eq!(tokens[0].text, "true");
    }

    #[test]
    fn test_match_captures() {
        let grammar = Grammar::new("source.test").with_pattern(
            Pattern::matching(r"(fn)\s+(\w+)")
                .named("meta.function")
                .with_capture(1, Capture::scope("keyword.other.fn"))
                .with_capture(2, Capture::scope("entity.name.function")),
        );
        let tokens = tokenize(&grammar, "fn main").unwrap();
        assert_eq!(
            summary(&tokens),
            vec![
                (0, 2, "keyword.other.fn".to_string()),
                (0, 7, "meta.function".to_string()),
                (3, 7, "entity.name.function".to_string()),
            ]
        );
    }

    #[test]
    fn test_unnamed_groups_emit_nothing() {
        let grammar = Grammar::new("source.test").with_pattern(
            Pattern::matching(r"(\w+)=(\w+)").with_capture(2, Capture::scope("string.value")),
        );
        let tokens = tokenize(&grammar, "k=v").unwrap();
        assert_eq!(summary(&tokens), vec![(2, 3, "string.value".to_string())]);
    }

    #[test]
    fn test_nested_match_patterns_confined() {
        let grammar = Grammar::new("source.test").with_pattern(
            Pattern::matching(r#""[^"]*""#)
                .named("string.quoted")
                .with_patterns(vec![Pattern::matching(r"\d").named("constant.numeric")]),
        );
        let tokens = tokenize(&grammar, r#"1 "a2" 3"#).unwrap();
        assert_eq!(
            summary(&tokens),
            vec![
                (2, 6, "string.quoted".to_string()),
                (4, 5, "constant.numeric".to_string()),
            ]
        );
    }

    #[test]
    fn test_nested_match_patterns_whole_buffer() {
        let grammar = Grammar::new("source.test").with_pattern(
            Pattern::matching(r#""[^"]*""#)
                .named("string.quoted")
                .with_patterns(vec![Pattern::matching(r"\d").named("constant.numeric")]),
        );
        let options = TokenizeOptions {
            nested_match_scope: NestedMatchScope::WholeBuffer,
            ..Default::default()
        };
        let tokens = tokenize_with(&grammar, r#"1 "a2" 3"#, &options).unwrap();
        let numbers: Vec<_> = tokens
            .iter()
            .filter(|t| t.scope == "constant.numeric")
            .map(|t| t.start)
            .collect();
        assert_eq!(numbers, vec![0, 4, 7]);

        // Nothing nested without an outer match
        let tokens = tokenize_with(&grammar, "1 2 3", &options).unwrap();
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_block_without_end_runs_to_end_of_text() {
        let grammar = Grammar::new("source.test")
            .with_pattern(Pattern::block(r"/\*", r"\*/").named("comment.block"));
        let text = "a /* open forever";
        let tokens = tokenize(&grammar, text).unwrap();
        assert!(tokens
            .iter()
            .any(|t| t.scope == "comment.block" && t.start == 2 && t.end == text.len()));
        assert!(tokens.iter().all(|t| t.end <= text.len()));
    }

    #[test]
    fn test_block_tokens() {
        let grammar = Grammar::new("source.test").with_pattern(
            Pattern::block(r"/\*", r"\*/")
                .named("comment.block")
                .with_content_name("comment.block.body")
                .with_begin_capture(0, Capture::scope("punctuation.comment.begin"))
                .with_end_capture(0, Capture::scope("punctuation.comment.end")),
        );
        let tokens = tokenize(&grammar, "x /* y */ z /* w */").unwrap();
        assert_eq!(
            summary(&tokens),
            vec![
                (2, 4, "punctuation.comment.begin".to_string()),
                (2, 9, "comment.block".to_string()),
                (4, 7, "comment.block.body".to_string()),
                (7, 9, "punctuation.comment.end".to_string()),
                (12, 14, "punctuation.comment.begin".to_string()),
                (12, 19, "comment.block".to_string()),
                (14, 17, "comment.block.body".to_string()),
                (17, 19, "punctuation.comment.end".to_string()),
            ]
        );
    }

    #[test]
    fn test_block_captures_fall_back_to_shared_captures() {
        let grammar = Grammar::new("source.test").with_pattern(
            Pattern::block(r#"""#, r#"""#)
                .named("string.quoted.double")
                .with_capture(0, Capture::scope("punctuation.definition.string")),
        );
        let tokens = tokenize(&grammar, r#"say "hi""#).unwrap();
        assert_eq!(
            summary(&tokens),
            vec![
                (4, 5, "punctuation.definition.string".to_string()),
                (4, 8, "string.quoted.double".to_string()),
                (7, 8, "punctuation.definition.string".to_string()),
            ]
        );
    }

    #[test]
    fn test_blocks_do_not_overlap() {
        let grammar = Grammar::new("source.test")
            .with_pattern(Pattern::block(r#"""#, r#"""#).named("string"));
        // The quote inside the first block does not open a new one
        let tokens = tokenize(&grammar, r#""a" "b""#).unwrap();
        let blocks: Vec<_> = tokens
            .iter()
            .filter(|t| t.scope == "string" && t.end - t.start > 1)
            .map(|t| t.range())
            .collect();
        assert_eq!(blocks, vec![0..3, 4..7]);
    }

    #[test]
    fn test_recursive_repository() {
        let grammar = abc_grammar();
        let tokens = tokenize(&grammar, "a(b(c))").unwrap();
        let summary = summary(&tokens);

        for expected in [
            (0, 1, "keyword.letter"),
            (2, 3, "keyword.letter"),
            (4, 5, "keyword.letter"),
            (1, 2, "punctuation.paren.open"),
            (3, 4, "punctuation.paren.open"),
        ] {
            assert!(
                summary.contains(&(expected.0, expected.1, expected.2.to_string())),
                "missing {:?}",
                expected
            );
        }
        // The outer block closes at the first `)`
        assert!(summary.contains(&(1, 6, "expression.group".to_string())));
    }

    #[test]
    fn test_unresolved_include_yields_nothing() {
        let grammar = Grammar::new("source.test")
            .with_pattern(Pattern::include("#missing"))
            .with_pattern(Pattern::include("source.other"))
            .with_pattern(Pattern::matching("x").named("variable"));
        let tokens = tokenize(&grammar, "x").unwrap();
        assert_eq!(summary(&tokens), vec![(0, 1, "variable".to_string())]);
    }

    #[test]
    fn test_cyclic_include_terminates() {
        let grammar = Grammar::new("source.test")
            .with_pattern(Pattern::include("#a"))
            .with_rule(
                "a",
                Pattern::group(vec![
                    Pattern::include("#b"),
                    Pattern::matching("x").named("variable"),
                ]),
            )
            .with_rule("b", Pattern::include("#a"))
            .with_rule("self", Pattern::include("#self"));
        let tokens = tokenize(&grammar, "x x").unwrap();
        assert_eq!(
            summary(&tokens),
            vec![(0, 1, "variable".to_string()), (2, 3, "variable".to_string())]
        );

        let grammar = Grammar::new("source.test")
            .with_pattern(Pattern::matching("y").named("y"))
            .with_pattern(Pattern::include("$self"));
        let tokens = tokenize(&grammar, "y").unwrap();
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_include_depth_limit() {
        let grammar = Grammar::new("source.test")
            .with_pattern(Pattern::include("#one"))
            .with_rule("one", Pattern::include("#two"))
            .with_rule("two", Pattern::matching("z").named("z"));
        let shallow = TokenizeOptions {
            max_include_depth: 1,
            ..Default::default()
        };
        assert!(tokenize_with(&grammar, "z", &shallow).unwrap().is_empty());
        assert_eq!(tokenize(&grammar, "z").unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_regex_fails_whole_call() {
        let grammar = Grammar::new("source.test")
            .with_pattern(Pattern::matching("x").named("variable"))
            .with_pattern(Pattern::matching("[").named("broken"));
        assert!(matches!(
            tokenize(&grammar, "x"),
            Err(GrammarError::InvalidRegex { .. })
        ));
    }

    #[test]
    fn test_disabled_rule_is_skipped() {
        let grammar = Grammar::new("source.test")
            .with_pattern(Pattern::matching("x").named("variable").disabled());
        assert!(tokenize(&grammar, "x").unwrap().is_empty());
    }

    #[test]
    fn test_capture_patterns() {
        let grammar = Grammar::new("source.test").with_pattern(
            Pattern::matching(r"#(\w+)").with_capture(
                1,
                Capture::scope("meta.directive")
                    .with_patterns(vec![Pattern::matching("if").named("keyword.control")]),
            ),
        );
        let tokens = tokenize(&grammar, "#ifdef if").unwrap();
        assert_eq!(
            summary(&tokens),
            vec![
                (1, 3, "keyword.control".to_string()),
                (1, 6, "meta.directive".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_is_pure() {
        let grammar = abc_grammar();
        let first = tokenize(&grammar, "(a) b (c").unwrap();
        let second = tokenize(&grammar, "(a) b (c").unwrap();
        assert_eq!(first, second);
    }
}
