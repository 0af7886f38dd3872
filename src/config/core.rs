use super::smart_load::{self, ConfigFormat};
use super::ScopeConfig;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Json, Toml, Yaml},
    Figment,
};
use std::path::{Path, PathBuf};

// Embed the default config at compile time
pub const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

/// Base names searched for in the working directory, lowest priority first
pub const REPO_CONFIG_NAMES: &[&str] = &[
    "scopewalk.toml",
    "scopewalk.json",
    "scopewalk.yaml",
    "scopewalk.yml",
];

/// Base names searched for in `~/.config/scopewalk`, lowest priority first
pub const USER_CONFIG_NAMES: &[&str] = &["config.toml", "config.json", "config.yaml", "config.yml"];

/// Layered configuration: embedded defaults, user file, repository file,
/// explicit `--config` file, then `SCOPEWALK_` environment variables
pub struct ConfigLoader {
    figment: Figment,
}

impl ConfigLoader {
    pub fn load(working_dir: &Path) -> Result<Self> {
        Self::load_with_custom_config(working_dir, None)
    }

    pub fn load_with_custom_config(
        working_dir: &Path,
        custom_config: Option<&Path>,
    ) -> Result<Self> {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        if let Some(user) = Self::user_config_dir() {
            for name in USER_CONFIG_NAMES {
                figment = Self::merge_optional(figment, user.join(name));
            }
        }

        for name in REPO_CONFIG_NAMES {
            figment = Self::merge_optional(figment, working_dir.join(name));
        }

        if let Some(custom_path) = custom_config {
            if !custom_path.is_file() {
                anyhow::bail!("Config file not found: {}", custom_path.display());
            }
            tracing::debug!("Loading config from {}", custom_path.display());
            figment = figment.merge(smart_load::auto(custom_path));
        }

        // Environment variables always have highest priority
        figment = figment.merge(Env::prefixed("SCOPEWALK_").split("__"));

        Ok(Self { figment })
    }

    /// Typed, validated configuration
    pub fn extract(&self) -> Result<ScopeConfig> {
        let config: ScopeConfig = self.figment.extract().context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Files that contributed to the merged configuration
    pub fn sources(&self) -> Vec<String> {
        self.figment
            .metadata()
            .filter_map(|m| m.source.as_ref().map(|s| s.to_string()))
            .collect()
    }

    /// Merge a file that may not exist, in the format its extension names
    fn merge_optional(figment: Figment, path: PathBuf) -> Figment {
        match ConfigFormat::from_extension(&path) {
            Some(ConfigFormat::Toml) => figment.merge(Toml::file(path)),
            Some(ConfigFormat::Json) => figment.merge(Json::file(path)),
            Some(ConfigFormat::Yaml) => figment.merge(Yaml::file(path)),
            None => figment,
        }
    }

    fn user_config_dir() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config").join("scopewalk"))
    }
}
