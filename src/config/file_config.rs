use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub public_dir: Option<String>,
    pub downloads_dir: Option<String>,
    pub manifest_file_name: Option<String>,
    pub portal_page: Option<String>,
    pub port: Option<u16>,
    pub max_port: Option<u16>,
    pub logging_level: Option<String>,
    pub content_cache_age_sec: Option<usize>,
    pub production: Option<bool>,
    pub url_file: Option<String>,

    // Feature configs
    pub health: Option<HealthConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct HealthConfig {
    pub check_entry_files: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config: FileConfig = toml::from_str(
            r#"
            public_dir = "/srv/public"
            downloads_dir = "/srv/files"
            manifest_file_name = "manifest.json"
            port = 8080
            max_port = 8090
            logging_level = "headers"
            production = true

            [health]
            check_entry_files = true
            "#,
        )
        .unwrap();

        assert_eq!(config.public_dir.as_deref(), Some("/srv/public"));
        assert_eq!(config.downloads_dir.as_deref(), Some("/srv/files"));
        assert_eq!(config.manifest_file_name.as_deref(), Some("manifest.json"));
        assert_eq!(config.port, Some(8080));
        assert_eq!(config.max_port, Some(8090));
        assert_eq!(config.production, Some(true));
        assert_eq!(config.health.unwrap().check_entry_files, Some(true));
        assert!(config.portal_page.is_none());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = FileConfig::load(Path::new("/nonexistent/portal.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn load_reports_invalid_toml() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "port = \"not a number\"").unwrap();
        let err = FileConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
