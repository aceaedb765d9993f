//! Grammar model
//!
//! A grammar is an immutable tree of pattern rules plus a repository of
//! named rules. It mirrors the TextMate JSON document shape so it can be
//! deserialized directly, and also offers builder constructors for
//! grammars defined in code.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{GrammarError, Result};

/// Per-group capture scopes, keyed by capture group index
pub type Captures = BTreeMap<usize, Capture>;

/// Scope and nested rules for one capture group
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "CaptureDef")]
pub struct Capture {
    name: Option<String>,
    patterns: Vec<Pattern>,
}

/// Captures are usually `{"name": ...}` objects; a bare string is
/// accepted as shorthand for the scope name.
#[derive(Deserialize)]
#[serde(untagged)]
enum CaptureDef {
    Scope(String),
    Rule {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        patterns: Vec<Pattern>,
    },
}

impl From<CaptureDef> for Capture {
    fn from(def: CaptureDef) -> Self {
        match def {
            CaptureDef::Scope(name) => Capture {
                name: Some(name),
                patterns: Vec::new(),
            },
            CaptureDef::Rule { name, patterns } => Capture { name, patterns },
        }
    }
}

impl Capture {
    /// Create a capture that only assigns a scope
    pub fn scope(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            patterns: Vec::new(),
        }
    }

    /// Builder: nested rules applied to the captured text
    pub fn with_patterns(mut self, patterns: Vec<Pattern>) -> Self {
        self.patterns = patterns;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }
}

/// Target of an `include` rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleRef<'a> {
    /// `#name` (or a bare name): an entry of the grammar's repository
    Repository(&'a str),
    /// `$self` / `$base`: the grammar's top-level patterns
    SelfGrammar,
    /// Another grammar's scope, e.g. `source.js`
    External(&'a str),
}

impl<'a> RuleRef<'a> {
    pub fn parse(include: &'a str) -> Self {
        match include {
            "$self" | "$base" => RuleRef::SelfGrammar,
            _ => match include.strip_prefix('#') {
                Some(name) => RuleRef::Repository(name),
                None if include.contains('.') || include.contains('#') => {
                    RuleRef::External(include)
                }
                None => RuleRef::Repository(include),
            },
        }
    }
}

/// How a pattern matches text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy<'a> {
    /// A single regex applied across the region
    Match(&'a str),
    /// A block opened by `begin` and closed by `end`
    Block { begin: &'a str, end: &'a str },
    /// A reference to another rule
    Include(RuleRef<'a>),
    /// Only nested patterns
    Group,
}

/// A single grammar rule
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    content_name: Option<String>,
    #[serde(default, rename = "match")]
    match_: Option<String>,
    #[serde(default)]
    begin: Option<String>,
    #[serde(default)]
    end: Option<String>,
    #[serde(default)]
    include: Option<String>,
    #[serde(default)]
    patterns: Vec<Pattern>,
    #[serde(default)]
    captures: Captures,
    #[serde(default)]
    begin_captures: Captures,
    #[serde(default)]
    end_captures: Captures,
    #[serde(default)]
    disabled: u8,
    #[serde(default)]
    comment: Option<String>,
}

impl Pattern {
    /// Create a single-regex rule
    pub fn matching(regex: &str) -> Self {
        Self {
            match_: Some(regex.to_string()),
            ..Default::default()
        }
    }

    /// Create a begin/end block rule
    pub fn block(begin: &str, end: &str) -> Self {
        Self {
            begin: Some(begin.to_string()),
            end: Some(end.to_string()),
            ..Default::default()
        }
    }

    /// Create an include rule (`#name`, `$self`, ...)
    pub fn include(target: &str) -> Self {
        Self {
            include: Some(target.to_string()),
            ..Default::default()
        }
    }

    /// Create a grouping rule
    pub fn group(patterns: Vec<Pattern>) -> Self {
        Self {
            patterns,
            ..Default::default()
        }
    }

    /// Builder: scope name
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Builder: scope name for a block's interior
    pub fn with_content_name(mut self, name: &str) -> Self {
        self.content_name = Some(name.to_string());
        self
    }

    /// Builder: nested rules
    pub fn with_patterns(mut self, patterns: Vec<Pattern>) -> Self {
        self.patterns = patterns;
        self
    }

    /// Builder: scope for a capture group of `match` (or both ends of a block)
    pub fn with_capture(mut self, group: usize, capture: Capture) -> Self {
        self.captures.insert(group, capture);
        self
    }

    /// Builder: scope for a capture group of `begin`
    pub fn with_begin_capture(mut self, group: usize, capture: Capture) -> Self {
        self.begin_captures.insert(group, capture);
        self
    }

    /// Builder: scope for a capture group of `end`
    pub fn with_end_capture(mut self, group: usize, capture: Capture) -> Self {
        self.end_captures.insert(group, capture);
        self
    }

    /// Builder: mark the rule as disabled
    pub fn disabled(mut self) -> Self {
        self.disabled = 1;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn content_name(&self) -> Option<&str> {
        self.content_name.as_deref()
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn captures(&self) -> &Captures {
        &self.captures
    }

    pub fn begin_captures(&self) -> &Captures {
        &self.begin_captures
    }

    pub fn end_captures(&self) -> &Captures {
        &self.end_captures
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled != 0
    }

    /// Every regex source this rule itself carries (not its children)
    pub fn regexes(&self) -> impl Iterator<Item = &str> {
        [&self.match_, &self.begin, &self.end]
            .into_iter()
            .filter_map(|r| r.as_deref())
    }

    /// Determine the match strategy, validating that at most one is set
    pub fn strategy(&self) -> std::result::Result<Strategy<'_>, GrammarError> {
        let block = match (self.begin.as_deref(), self.end.as_deref()) {
            (Some(begin), Some(end)) => Some(Strategy::Block { begin, end }),
            (Some(begin), None) => {
                return Err(GrammarError::MissingEnd {
                    begin: begin.to_string(),
                })
            }
            (None, Some(end)) => {
                return Err(GrammarError::MissingBegin {
                    end: end.to_string(),
                })
            }
            (None, None) => None,
        };
        let matching = self.match_.as_deref().map(Strategy::Match);
        let include = self
            .include
            .as_deref()
            .map(|target| Strategy::Include(RuleRef::parse(target)));

        let mut set = [matching, block, include].into_iter().flatten();
        match (set.next(), set.next()) {
            (None, _) => Ok(Strategy::Group),
            (Some(strategy), None) => Ok(strategy),
            (Some(_), Some(_)) => Err(GrammarError::ConflictingStrategies {
                rule: self.describe(),
            }),
        }
    }

    /// Short human-readable label for diagnostics
    pub fn describe(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        if let Some(comment) = &self.comment {
            return comment.clone();
        }
        self.regexes()
            .chain(self.include.as_deref())
            .next()
            .unwrap_or("<group>")
            .to_string()
    }
}

/// A complete grammar: top-level rules plus a repository
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grammar {
    #[serde(default)]
    scope_name: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    file_types: Vec<String>,
    #[serde(default)]
    patterns: Vec<Pattern>,
    #[serde(default)]
    repository: BTreeMap<String, Pattern>,
}

impl Grammar {
    /// Create an empty grammar with the given root scope
    pub fn new(scope_name: &str) -> Self {
        Self {
            scope_name: scope_name.to_string(),
            ..Default::default()
        }
    }

    /// Parse a TextMate JSON grammar document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builder: display name
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Builder: add a file extension
    pub fn with_file_type(mut self, ext: &str) -> Self {
        self.file_types.push(ext.to_string());
        self
    }

    /// Builder: append a top-level rule
    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Builder: add a repository rule
    pub fn with_rule(mut self, name: &str, pattern: Pattern) -> Self {
        self.repository.insert(name.to_string(), pattern);
        self
    }

    pub fn scope_name(&self) -> &str {
        &self.scope_name
    }

    /// Display name, falling back to the scope name
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.scope_name)
    }

    pub fn file_types(&self) -> &[String] {
        &self.file_types
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn repository(&self) -> &BTreeMap<String, Pattern> {
        &self.repository
    }

    /// Look up a repository rule by name
    pub fn rule(&self, name: &str) -> Option<&Pattern> {
        self.repository.get(name)
    }
}
