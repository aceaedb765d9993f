//! Compiled rule table for tokenization
//!
//! Every regex of a grammar is compiled and every rule validated before
//! any matching starts, so a malformed grammar fails the whole call
//! instead of producing a partial token list.

use std::collections::HashMap;
use std::ops::Range;

use regex::{Captures, Regex, RegexBuilder};

use super::grammar::{Grammar, Pattern};
use crate::error::GrammarError;

/// Compile a grammar regex
///
/// Multi-line mode is on: rules run over a whole buffer, so `^` and `$`
/// anchor at line boundaries the way they do in line-oriented grammars.
pub fn compile_regex(source: &str) -> Result<Regex, GrammarError> {
    RegexBuilder::new(source)
        .multi_line(true)
        .build()
        .map_err(|source_err| GrammarError::InvalidRegex {
            pattern: source.to_string(),
            source: source_err,
        })
}

/// Regexes of one grammar, keyed by their source text
pub struct CompiledRules<'g> {
    regexes: HashMap<&'g str, Regex>,
}

impl<'g> CompiledRules<'g> {
    /// Validate and compile every rule reachable from the grammar
    pub fn compile(grammar: &'g Grammar) -> Result<Self, GrammarError> {
        let mut rules = Self {
            regexes: HashMap::new(),
        };
        for pattern in grammar.patterns() {
            rules.add(pattern)?;
        }
        for pattern in grammar.repository().values() {
            rules.add(pattern)?;
        }
        Ok(rules)
    }

    fn add(&mut self, pattern: &'g Pattern) -> Result<(), GrammarError> {
        if pattern.is_disabled() {
            return Ok(());
        }
        pattern.strategy()?;
        for source in pattern.regexes() {
            if !self.regexes.contains_key(source) {
                let regex = compile_regex(source)?;
                self.regexes.insert(source, regex);
            }
        }
        let captures = pattern
            .captures()
            .values()
            .chain(pattern.begin_captures().values())
            .chain(pattern.end_captures().values());
        for capture in captures {
            for nested in capture.patterns() {
                self.add(nested)?;
            }
        }
        for nested in pattern.patterns() {
            self.add(nested)?;
        }
        Ok(())
    }

    /// Look up a compiled regex by source
    pub fn get(&self, source: &str) -> Option<&Regex> {
        self.regexes.get(source)
    }

    /// Number of distinct regexes
    pub fn len(&self) -> usize {
        self.regexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regexes.is_empty()
    }
}

/// Byte offset of the character after `pos`, or past the end
pub fn next_char_boundary(text: &str, pos: usize) -> usize {
    match text.get(pos..).and_then(|rest| rest.chars().next()) {
        Some(ch) => pos + ch.len_utf8(),
        None => text.len() + 1,
    }
}

/// Leftmost, non-overlapping matches of a regex inside a region
///
/// Text before the region is visible to the regex as context (for `\b`
/// and `^`), text after it is not.
pub struct RegionMatches<'r, 't> {
    regex: &'r Regex,
    haystack: &'t str,
    pos: usize,
}

impl<'r, 't> RegionMatches<'r, 't> {
    pub fn new(regex: &'r Regex, text: &'t str, region: Range<usize>) -> Self {
        Self {
            regex,
            haystack: &text[..region.end],
            pos: region.start,
        }
    }
}

impl<'r, 't> Iterator for RegionMatches<'r, 't> {
    type Item = Captures<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos > self.haystack.len() {
            return None;
        }
        let caps = self.regex.captures_at(self.haystack, self.pos)?;
        let whole = caps.get(0)?;
        self.pos = if whole.end() > whole.start() {
            whole.end()
        } else {
            next_char_boundary(self.haystack, whole.end())
        };
        Some(caps)
    }
}

/// First match of a regex at or after `from`, bounded by `region_end`
pub fn find_in<'t>(
    regex: &Regex,
    text: &'t str,
    from: usize,
    region_end: usize,
) -> Option<Captures<'t>> {
    let haystack = &text[..region_end];
    if from > haystack.len() {
        return None;
    }
    regex.captures_at(haystack, from)
}
