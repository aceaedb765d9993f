//! Configuration file support
//!
//! Loads settings from ~/.scopepaint.toml (or %USERPROFILE%\.scopepaint.toml on Windows)
//!
//! Example:
//! ```text
//! # scopepaint configuration
//! theme = "light"
//! max-include-depth = 32
//! selector-policy = "first-match"
//! nested-match-scope = "whole-buffer"
//! grammar-paths = ["~/grammars/ini.tmLanguage.json"]
//! theme-paths = []
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;
use crate::syntax::tokenizer::{NestedMatchScope, TokenizeOptions, DEFAULT_MAX_INCLUDE_DEPTH};
use crate::syntax::{HighlightOptions, SelectorPolicy};

/// Bounds applied to `max-include-depth`
const MIN_INCLUDE_DEPTH: usize = 1;
const MAX_INCLUDE_DEPTH: usize = 1024;

/// Configuration settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Theme used when none is given on the command line
    pub theme: String,
    /// Include chain depth before a branch is abandoned
    pub max_include_depth: usize,
    /// Theme rule precedence
    pub selector_policy: SelectorPolicy,
    /// Where nested patterns of a match rule are applied
    pub nested_match_scope: NestedMatchScope,
    /// Extra JSON grammar files to register
    pub grammar_paths: Vec<PathBuf>,
    /// Extra JSON theme files to register
    pub theme_paths: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            selector_policy: SelectorPolicy::default(),
            nested_match_scope: NestedMatchScope::default(),
            grammar_paths: Vec::new(),
            theme_paths: Vec::new(),
        }
    }
}

/// The user's home directory
fn home_dir() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE").ok().map(PathBuf::from)
    }

    #[cfg(not(windows))]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
}

/// Replace a leading `~` component with `home`
fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        home_dir().map(|home| home.join(".scopepaint.toml"))
    }

    /// Load configuration from file
    ///
    /// A missing file gives the defaults; a malformed one is an error.
    pub fn load() -> Result<Self> {
        let Some(path) = Self::config_path() else {
            return Ok(Self::default());
        };
        match fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::parse(&contents)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Parse config file contents
    pub fn parse(contents: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(contents)?;
        config.max_include_depth = config
            .max_include_depth
            .clamp(MIN_INCLUDE_DEPTH, MAX_INCLUDE_DEPTH);

        let home = home_dir();
        for path in config.grammar_paths.iter_mut().chain(config.theme_paths.iter_mut()) {
            *path = expand_home(path, home.as_deref());
        }
        Ok(config)
    }

    /// Pipeline options from these settings
    pub fn highlight_options(&self) -> HighlightOptions {
        HighlightOptions {
            tokenize: TokenizeOptions {
                max_include_depth: self.max_include_depth,
                nested_match_scope: self.nested_match_scope,
            },
            selector_policy: self.selector_policy,
        }
    }
}
