//! Grammar and theme registry
//!
//! The Registry owns every loaded grammar and theme, maps file
//! extensions to grammars, and runs the highlight pipeline by key.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::builtin;
use super::grammar::Grammar;
use super::pipeline::{highlight, HighlightOptions};
use super::style::Span;
use super::theme::Theme;
use crate::error::{Error, Result};

/// Registry of grammars (keyed by scope name) and themes (keyed by name)
pub struct Registry {
    grammars: HashMap<String, Arc<Grammar>>,
    /// Extension to grammar scope name mapping
    extension_map: HashMap<String, String>,
    themes: HashMap<String, Arc<Theme>>,
}

impl Registry {
    /// Create a registry with the built-in grammars and themes
    pub fn new() -> Self {
        let mut registry = Self::empty();

        for grammar in builtin::all_grammars() {
            registry.add_grammar(grammar);
        }
        for theme in builtin::all_themes() {
            registry.add_theme(theme);
        }

        registry
    }

    /// Create a registry with nothing loaded
    pub fn empty() -> Self {
        Self {
            grammars: HashMap::new(),
            extension_map: HashMap::new(),
            themes: HashMap::new(),
        }
    }

    /// Add a grammar, replacing any grammar with the same scope name
    ///
    /// Returns the key the grammar is stored under.
    pub fn add_grammar(&mut self, grammar: Grammar) -> String {
        let key = grammar.scope_name().to_string();
        for ext in grammar.file_types() {
            let ext = ext.trim_start_matches('.').to_lowercase();
            self.extension_map.insert(ext, key.clone());
        }
        tracing::debug!(scope = %key, "registered grammar");
        self.grammars.insert(key.clone(), Arc::new(grammar));
        key
    }

    /// Add a theme under its name ("unnamed" when it has none)
    pub fn add_theme(&mut self, theme: Theme) -> String {
        let key = theme.name().unwrap_or("unnamed").to_string();
        self.insert_theme(key.clone(), theme);
        key
    }

    fn insert_theme(&mut self, key: String, theme: Theme) {
        tracing::debug!(theme = %key, rules = theme.rules().len(), "registered theme");
        self.themes.insert(key, Arc::new(theme));
    }

    /// Load a JSON grammar file and register it
    pub fn load_grammar_file(&mut self, path: &Path) -> Result<String> {
        let contents = fs::read_to_string(path)?;
        let grammar = Grammar::from_json(&contents)?;
        Ok(self.add_grammar(grammar))
    }

    /// Load a JSON theme file and register it
    ///
    /// A theme without a name is keyed by the file stem.
    pub fn load_theme_file(&mut self, path: &Path) -> Result<String> {
        let contents = fs::read_to_string(path)?;
        let theme = Theme::from_json(&contents)?;
        let key = match theme.name() {
            Some(name) => name.to_string(),
            None => path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("unnamed")
                .to_string(),
        };
        self.insert_theme(key.clone(), theme);
        Ok(key)
    }

    /// Look up a grammar by scope name, or by display name ignoring case
    pub fn grammar(&self, key: &str) -> Result<Arc<Grammar>> {
        if let Some(grammar) = self.grammars.get(key) {
            return Ok(Arc::clone(grammar));
        }
        self.grammars
            .values()
            .find(|g| g.name().eq_ignore_ascii_case(key))
            .cloned()
            .ok_or_else(|| Error::UnknownGrammar(key.to_string()))
    }

    /// Look up a theme by name
    pub fn theme(&self, key: &str) -> Result<Arc<Theme>> {
        self.themes
            .get(key)
            .cloned()
            .ok_or_else(|| Error::UnknownTheme(key.to_string()))
    }

    /// Detect the grammar for a file from its extension
    pub fn detect_grammar(&self, filename: &Path) -> Option<Arc<Grammar>> {
        let ext = filename.extension()?.to_str()?.to_lowercase();
        let key = self.extension_map.get(&ext)?;
        self.grammars.get(key).cloned()
    }

    /// List grammar scope names, sorted
    pub fn list_grammars(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.grammars.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// List theme names, sorted
    pub fn list_themes(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.themes.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// Highlight `text` with a registered grammar and theme
    pub fn highlight(
        &self,
        grammar_key: &str,
        theme_key: &str,
        text: &str,
        options: &HighlightOptions,
    ) -> Result<Vec<Span>> {
        let grammar = self.grammar(grammar_key)?;
        let theme = self.theme(theme_key)?;
        Ok(highlight(&grammar, &theme, text, options)?)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::grammar::Pattern;
    use crate::syntax::style::StyleAttributes;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("scopepaint-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_detect_grammar() {
        let registry = Registry::new();

        let scope = |p: &str| {
            registry
                .detect_grammar(Path::new(p))
                .map(|g| g.scope_name().to_string())
        };
        assert_eq!(scope("main.rs").as_deref(), Some("source.rust"));
        assert_eq!(scope("main.C").as_deref(), Some("source.c"));
        assert_eq!(scope("data.json").as_deref(), Some("source.json"));
        assert_eq!(scope("Program.cs").as_deref(), Some("source.cs"));
        assert_eq!(scope("no_extension"), None);
        assert_eq!(scope("notes.txt"), None);
    }

    #[test]
    fn test_lookup_by_scope_and_name() {
        let registry = Registry::new();
        assert_eq!(registry.grammar("source.c").unwrap().name(), "C");
        assert_eq!(registry.grammar("rust").unwrap().scope_name(), "source.rust");
        assert!(matches!(
            registry.grammar("source.cobol"),
            Err(Error::UnknownGrammar(key)) if key == "source.cobol"
        ));
        assert!(matches!(registry.theme("nope"), Err(Error::UnknownTheme(_))));
    }

    #[test]
    fn test_lists_are_sorted() {
        let registry = Registry::new();
        assert_eq!(
            registry.list_themes(),
            vec!["dark", "dark-plus", "light", "light-plus", "monokai"]
        );
        let grammars = registry.list_grammars();
        let mut sorted = grammars.clone();
        sorted.sort();
        assert_eq!(grammars, sorted);
        assert!(grammars.contains(&"source.abc"));
    }

    #[test]
    fn test_empty_registry() {
        let mut registry = Registry::empty();
        assert!(registry.list_grammars().is_empty());
        assert_eq!(registry.add_theme(Theme::default()), "unnamed");
        assert_eq!(registry.list_themes(), vec!["unnamed"]);
    }

    #[test]
    fn test_add_grammar_replaces_same_scope() {
        let mut registry = Registry::empty();
        registry.add_grammar(Grammar::new("source.x").named("One").with_file_type("x"));
        registry.add_grammar(Grammar::new("source.x").named("Two").with_file_type(".X2"));
        assert_eq!(registry.list_grammars(), vec!["source.x"]);
        assert_eq!(registry.grammar("source.x").unwrap().name(), "Two");
        assert!(registry.detect_grammar(Path::new("a.x2")).is_some());
    }

    #[test]
    fn test_highlight_by_key() {
        let mut registry = Registry::empty();
        registry.add_grammar(
            Grammar::new("source.test")
                .with_pattern(Pattern::matching(r"\d+").named("constant.numeric")),
        );
        let base = StyleAttributes::new().with_foreground("#FFFFFF");
        let blue = StyleAttributes::new().with_foreground("#0000FF");
        registry.add_theme(
            Theme::new(base.clone())
                .named("t")
                .with_rule("constant", blue.clone()),
        );

        let spans = registry
            .highlight("source.test", "t", "a 42", &HighlightOptions::default())
            .unwrap();
        assert_eq!(spans, vec![Span::new(0, 2, base), Span::new(2, 4, blue)]);

        let err = registry.highlight("source.none", "t", "", &HighlightOptions::default());
        assert!(matches!(err, Err(Error::UnknownGrammar(_))));
    }

    #[test]
    fn test_highlight_reports_grammar_error() {
        let mut registry = Registry::empty();
        registry.add_grammar(Grammar::new("source.bad").with_pattern(Pattern::matching("[")));
        registry.add_theme(Theme::default().named("t"));
        let err = registry.highlight("source.bad", "t", "x", &HighlightOptions::default());
        assert!(matches!(err, Err(Error::Grammar(_))));
    }

    #[test]
    fn test_load_files() {
        let grammar = temp_file(
            "ini.tmLanguage.json",
            r#"{
                "scopeName": "source.ini",
                "name": "INI",
                "fileTypes": ["ini"],
                "patterns": [{ "match": "^\\[.*\\]$", "name": "entity.name.section.ini" }]
            }"#,
        );
        let theme = temp_file(
            "plain.json",
            r##"{ "settings": [{ "settings": { "foreground": "#111111" } }] }"##,
        );

        let mut registry = Registry::empty();
        assert_eq!(registry.load_grammar_file(&grammar).unwrap(), "source.ini");
        assert_eq!(registry.load_theme_file(&theme).unwrap(), "plain");
        assert!(registry.detect_grammar(Path::new("setup.ini")).is_some());

        let missing = registry.load_theme_file(Path::new("/nonexistent/theme.json"));
        assert!(matches!(missing, Err(Error::Io(_))));
    }
}
