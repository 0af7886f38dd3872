//! Configuration management for scopewalk
//!
//! Settings are layered with `figment` (see [`ConfigLoader`]) and extracted
//! into the typed [`ScopeConfig`]. Command-line flags override the typed values.

pub mod core;
pub mod smart_load;

pub use core::{ConfigLoader, DEFAULT_CONFIG};
pub use smart_load::ConfigFormat;

use crate::search::filters::sharability::DEFAULT_GENERATED_DIRS;
use crate::search::SearchScopeOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScopeConfig {
    /// Which files are enumerated
    pub search: SearchSettings,

    /// How file contents are searched
    pub content: ContentSettings,
}

/// Search scope settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchSettings {
    /// File-name pattern; globs unless `regexp` is set
    pub name_pattern: String,

    pub regexp: bool,

    /// Browse zip-format archives as folders
    pub search_in_archives: bool,

    /// Include `.gitignore`d files and generated folders
    pub search_in_generated: bool,

    /// Include dot-prefixed files and folders
    pub include_hidden: bool,

    pub follow_symlinks: bool,

    /// Glob exclusions matched relative to each root
    pub exclude_patterns: Vec<String>,

    /// Files above this size are skipped
    pub max_file_size_mb: usize,

    /// Folder names always treated as generated
    pub generated_dirs: Vec<String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            name_pattern: String::new(),
            regexp: false,
            search_in_archives: false,
            search_in_generated: false,
            include_hidden: false,
            follow_symlinks: false,
            exclude_patterns: Vec::new(),
            max_file_size_mb: 50,
            generated_dirs: DEFAULT_GENERATED_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Content search settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContentSettings {
    pub case_insensitive: bool,
    pub whole_words: bool,

    /// Matching lines reported per file (0 = no limit)
    pub max_matches_per_file: usize,

    /// Worker thread cap (0 = no cap)
    pub max_threads: usize,

    /// Percentage of CPU cores used for content search (1-100)
    pub thread_percentage: u8,
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            whole_words: false,
            max_matches_per_file: 0,
            max_threads: 0,
            thread_percentage: 75,
        }
    }
}

impl ScopeConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.search.max_file_size_mb == 0 {
            anyhow::bail!("search.max_file_size_mb must be greater than 0");
        }
        if !(1..=100).contains(&self.content.thread_percentage) {
            anyhow::bail!(
                "content.thread_percentage must be between 1 and 100, got {}",
                self.content.thread_percentage
            );
        }
        if self.search.generated_dirs.iter().any(|d| d.trim().is_empty()) {
            anyhow::bail!("search.generated_dirs must not contain empty names");
        }
        self.scope_options()
            .file_name_matcher()
            .context("search.name_pattern is invalid")?;
        Ok(())
    }

    /// Scope options described by the search settings, without extra filters
    pub fn scope_options(&self) -> SearchScopeOptions {
        SearchScopeOptions::new()
            .with_pattern(self.search.name_pattern.clone())
            .with_regexp(self.search.regexp)
            .search_in_archives(self.search.search_in_archives)
            .search_in_generated(self.search.search_in_generated)
    }

    /// Serialize in the given format
    pub fn render(&self, format: ConfigFormat) -> Result<String> {
        match format {
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).context("Failed to serialize configuration as TOML")
            }
            ConfigFormat::Json => serde_json::to_string_pretty(self)
                .context("Failed to serialize configuration as JSON"),
            ConfigFormat::Yaml => {
                serde_yml::to_string(self).context("Failed to serialize configuration as YAML")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_embedded_file() {
        let embedded: ScopeConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(embedded, ScopeConfig::default());
        assert!(embedded.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut config = ScopeConfig::default();
        config.content.thread_percentage = 0;
        assert!(config.validate().is_err());

        let mut config = ScopeConfig::default();
        config.search.name_pattern = "(".to_string();
        config.search.regexp = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_render() {
        let mut config = ScopeConfig::default();
        config.search.exclude_patterns = vec!["*.min.js".to_string()];

        let toml_text = config.render(ConfigFormat::Toml).unwrap();
        assert!(toml_text.contains("[search]"));
        assert!(toml_text.contains("*.min.js"));

        let rendered = config.render(ConfigFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(json["content"]["thread_percentage"], 75);

        assert!(config.render(ConfigFormat::Yaml).unwrap().contains("max_file_size_mb: 50"));
    }

    #[test]
    fn test_scope_options() {
        let mut config = ScopeConfig::default();
        config.search.search_in_archives = true;
        config.search.name_pattern = "*.java".to_string();
        let options = config.scope_options();
        assert!(options.is_search_in_archives());
        assert!(!options.is_search_in_generated());
        assert_eq!(options.pattern(), "*.java");
    }
}
