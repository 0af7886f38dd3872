use figment::providers::{Format, Json, Toml, Yaml};
use std::path::Path;

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Format implied by a file extension, if any
    pub fn from_extension(path: &Path) -> Option<Self> {
        let extension = path.extension().and_then(|ext| ext.to_str())?;
        match extension.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Provider for a config file, choosing the format from the extension,
/// then from the content, then falling back to TOML
pub fn auto<P: AsRef<Path>>(path: P) -> impl figment::Provider {
    let path = path.as_ref();
    let format = ConfigFormat::from_extension(path).unwrap_or_else(|| {
        match std::fs::read_to_string(path) {
            Ok(content) => detect_format_from_content(&content).unwrap_or_else(|| {
                tracing::debug!("Could not detect format of {}, assuming TOML", path.display());
                ConfigFormat::Toml
            }),
            Err(e) => {
                tracing::debug!("Could not read {}: {}", path.display(), e);
                ConfigFormat::Toml
            }
        }
    });

    match format {
        ConfigFormat::Toml => SmartProvider::Toml(Toml::file(path)),
        ConfigFormat::Json => SmartProvider::Json(Json::file(path)),
        ConfigFormat::Yaml => SmartProvider::Yaml(Yaml::file(path)),
    }
}

enum SmartProvider {
    Toml(figment::providers::Data<Toml>),
    Json(figment::providers::Data<Json>),
    Yaml(figment::providers::Data<Yaml>),
}

impl figment::Provider for SmartProvider {
    fn metadata(&self) -> figment::Metadata {
        match self {
            SmartProvider::Toml(p) => p.metadata(),
            SmartProvider::Json(p) => p.metadata(),
            SmartProvider::Yaml(p) => p.metadata(),
        }
    }

    fn data(
        &self,
    ) -> Result<figment::value::Map<figment::Profile, figment::value::Dict>, figment::Error> {
        match self {
            SmartProvider::Toml(p) => p.data(),
            SmartProvider::Json(p) => p.data(),
            SmartProvider::Yaml(p) => p.data(),
        }
    }
}

fn detect_format_from_content(content: &str) -> Option<ConfigFormat> {
    let trimmed = content.trim();

    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Some(ConfigFormat::Json);
    }

    // TOML tables or `key = value` lines
    if trimmed.lines().any(|line| {
        let line = line.trim();
        (line.starts_with('[') && line.ends_with(']'))
            || (line.contains('=') && !line.contains(':'))
    }) {
        return Some(ConfigFormat::Toml);
    }

    let yaml_line = |line: &str| line.trim().contains(": ") || line.trim().ends_with(':');
    if trimmed.starts_with("---") || trimmed.lines().any(yaml_line) {
        return Some(ConfigFormat::Yaml);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            detect_format_from_content(r#"{"search": {"regexp": true}}"#),
            Some(ConfigFormat::Json)
        );
        assert_eq!(detect_format_from_content("search:\n  regexp: true"), Some(ConfigFormat::Yaml));
        assert_eq!(detect_format_from_content("[search]\nregexp = true"), Some(ConfigFormat::Toml));
        assert_eq!(detect_format_from_content("plain words"), None);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_extension(Path::new("a.YML")), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_extension(Path::new("a.conf")), None);
    }
}
