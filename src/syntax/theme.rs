//! Theme model and scope resolution
//!
//! A theme is an ordered list of scope selectors with styles, plus the
//! base style for text no selector claims. Resolution is a CSS-like
//! cascade over dotted scope names.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::style::StyleAttributes;
use crate::error::Result;

/// Specificity reported for the base style
pub const BASE_SPECIFICITY: i32 = -1;

/// Which matching rule wins when several selectors match a scope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectorPolicy {
    /// Highest specificity wins; later rules win ties
    #[default]
    BestMatch,
    /// First matching rule in declaration order wins
    FirstMatch,
}

/// A dotted scope prefix, `*` matching any single segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    segments: Vec<String>,
}

impl Selector {
    pub fn parse(selector: &str) -> Self {
        Self {
            segments: selector.trim().split('.').map(str::to_string).collect(),
        }
    }

    /// Specificity of this selector against a split scope name, if it matches
    ///
    /// Counts the non-wildcard segments, so `comment.*` ranks the same
    /// as `comment`.
    pub fn specificity(&self, scope: &[&str]) -> Option<i32> {
        if self.segments.len() > scope.len() {
            return None;
        }
        let mut count = 0;
        for (segment, part) in self.segments.iter().zip(scope) {
            if segment == "*" {
                continue;
            }
            if segment != part {
                return None;
            }
            count += 1;
        }
        Some(count)
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// One selector and the style it applies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeRule {
    pub selector: Selector,
    pub style: StyleAttributes,
}

/// Ordered style rules plus a base style
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "ThemeDocument")]
pub struct Theme {
    name: Option<String>,
    base: StyleAttributes,
    rules: Vec<ThemeRule>,
}

impl Theme {
    /// Create a theme with only a base style
    pub fn new(base: StyleAttributes) -> Self {
        Self {
            name: None,
            base,
            rules: Vec::new(),
        }
    }

    /// Parse a TextMate or VS Code JSON theme document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builder: theme name
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Builder: append a rule; later rules win specificity ties
    pub fn with_rule(mut self, selector: &str, style: StyleAttributes) -> Self {
        self.rules.push(ThemeRule {
            selector: Selector::parse(selector),
            style,
        });
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn base(&self) -> &StyleAttributes {
        &self.base
    }

    pub fn rules(&self) -> &[ThemeRule] {
        &self.rules
    }

    /// Resolve a scope with the best-match cascade
    pub fn resolve(&self, scope: &str) -> (&StyleAttributes, i32) {
        self.resolve_with(scope, SelectorPolicy::BestMatch)
    }

    /// Resolve a scope to a style and its specificity
    ///
    /// Returns the base style with specificity -1 when nothing matches.
    pub fn resolve_with(&self, scope: &str, policy: SelectorPolicy) -> (&StyleAttributes, i32) {
        let parts: Vec<&str> = scope.split('.').collect();
        let mut best: Option<(&StyleAttributes, i32)> = None;
        if !scope.is_empty() {
            for rule in &self.rules {
                let Some(specificity) = rule.selector.specificity(&parts) else {
                    continue;
                };
                match policy {
                    SelectorPolicy::FirstMatch => return (&rule.style, specificity),
                    SelectorPolicy::BestMatch => {
                        if best.map_or(true, |(_, rank)| specificity >= rank) {
                            best = Some((&rule.style, specificity));
                        }
                    }
                }
            }
        }
        best.unwrap_or((&self.base, BASE_SPECIFICITY))
    }
}

#[derive(Deserialize)]
struct ThemeDocument {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "tokenColors")]
    settings: Vec<SettingEntry>,
}

#[derive(Deserialize)]
struct SettingEntry {
    #[serde(default)]
    scope: Option<ScopeList>,
    #[serde(default)]
    settings: BTreeMap<String, serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScopeList {
    One(String),
    Many(Vec<String>),
}

impl ScopeList {
    fn selectors(&self) -> Vec<&str> {
        let lists: Vec<&str> = match self {
            ScopeList::One(list) => vec![list.as_str()],
            ScopeList::Many(items) => items.iter().map(String::as_str).collect(),
        };
        lists
            .into_iter()
            .flat_map(|list| list.split(','))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

fn style_from_settings(settings: BTreeMap<String, serde_json::Value>) -> StyleAttributes {
    settings
        .into_iter()
        .filter_map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key, value))
        })
        .collect()
}

impl From<ThemeDocument> for Theme {
    fn from(doc: ThemeDocument) -> Self {
        let mut base: Option<StyleAttributes> = None;
        let mut rules = Vec::new();

        for entry in doc.settings {
            let selectors: Vec<String> = entry
                .scope
                .as_ref()
                .map(|scope| scope.selectors().into_iter().map(str::to_string).collect())
                .unwrap_or_default();
            let style = style_from_settings(entry.settings);

            if selectors.is_empty() {
                if base.is_none() {
                    base = Some(style);
                }
                continue;
            }
            for selector in selectors {
                if selector.contains(char::is_whitespace) {
                    tracing::debug!(%selector, "descendant selectors are not supported, skipping");
                    continue;
                }
                rules.push(ThemeRule {
                    selector: Selector::parse(&selector),
                    style: style.clone(),
                });
            }
        }

        Theme {
            name: doc.name,
            base: base.unwrap_or_default(),
            rules,
        }
    }
}
