use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "skillshelf.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Library root used when no path is given on the command line (default: ".")
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// File name globs that mark a skill document (default: ["*.md"])
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,

    /// File name globs that are never skill documents
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Walk into dot-files and dot-directories (default: false)
    #[serde(default)]
    pub include_hidden: bool,

    /// Honor .gitignore / .ignore files while walking (default: true)
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Fall back to the directory or file name when `name` is missing
    #[serde(default)]
    pub infer_names: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            patterns: default_patterns(),
            exclude: default_exclude(),
            include_hidden: false,
            respect_gitignore: true,
            infer_names: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Header keys every skill must carry besides name and description
    #[serde(default)]
    pub required_fields: Vec<String>,

    /// Treat an empty tag set as an error (default: true)
    #[serde(default = "default_true")]
    pub require_tags: bool,

    #[serde(default = "default_min_description_len")]
    pub min_description_len: usize,

    #[serde(default = "default_max_description_len")]
    pub max_description_len: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            required_fields: Vec::new(),
            require_tags: true,
            min_description_len: default_min_description_len(),
            max_description_len: default_max_description_len(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_patterns() -> Vec<String> {
    vec!["*.md".to_string()]
}

fn default_exclude() -> Vec<String> {
    vec![
        "README.md".to_string(),
        "CHANGELOG.md".to_string(),
        "LICENSE.md".to_string(),
    ]
}

fn default_true() -> bool {
    true
}

fn default_min_description_len() -> usize {
    10
}

fn default_max_description_len() -> usize {
    1024
}

impl Config {
    /// Load configuration from a specific path, or use default search paths
    pub fn load_with_path(path: Option<&Path>) -> Result<Self> {
        let (config, _) = Self::load_with_source(path)?;
        Ok(config)
    }

    /// Like `load_with_path`, also reporting which file was used.
    /// `None` means built-in defaults.
    pub fn load_with_source(path: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        // An explicit path must exist and parse
        if let Some(config_path) = path {
            debug!("Loading config from explicit path: {}", config_path.display());
            let config = Self::load_from_path(config_path)?;
            return Ok((config, Some(config_path.to_path_buf())));
        }

        // Per-library config next to where the tool runs
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.is_file() {
            debug!("Loading config from ./{}", CONFIG_FILE_NAME);
            let config = Self::load_from_path(&local)?;
            return Ok((config, Some(local)));
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user = config_dir.join("skillshelf").join("config.toml");
            if user.is_file() {
                debug!("Loading config from {:?}", user);
                let config = Self::load_from_path(&user)?;
                return Ok((config, Some(user)));
            }
        }

        debug!("Using default config");
        Ok((Self::default(), None))
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.check()?;
        Ok(config)
    }

    /// Reject settings that would make every load fail or match nothing.
    pub fn check(&self) -> Result<()> {
        if self.catalog.patterns.is_empty() {
            bail!("catalog.patterns must list at least one file pattern");
        }
        for pattern in self.catalog.patterns.iter().chain(&self.catalog.exclude) {
            glob::Pattern::new(pattern)
                .with_context(|| format!("Invalid file pattern '{}'", pattern))?;
        }
        if self.validation.min_description_len > self.validation.max_description_len {
            bail!(
                "validation.min_description_len ({}) exceeds max_description_len ({})",
                self.validation.min_description_len,
                self.validation.max_description_len
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.catalog.root, PathBuf::from("."));
        assert_eq!(config.catalog.patterns, vec!["*.md"]);
        assert!(config.catalog.respect_gitignore);
        assert!(!config.catalog.include_hidden);
        assert!(config.validation.require_tags);
        assert_eq!(config.validation.min_description_len, 10);
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("[catalog]"));
        assert!(toml_str.contains("*.md"));
        let back: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
[validation]
required_fields = ["version"]
"#,
        )
        .unwrap();
        assert_eq!(config.validation.required_fields, vec!["version"]);
        assert!(config.validation.require_tags);
        assert_eq!(config.catalog, CatalogConfig::default());
    }

    #[test]
    fn test_empty_patterns_rejected() {
        let mut config = Config::default();
        config.catalog.patterns.clear();
        assert!(config.check().is_err());
    }

    #[test]
    fn test_invalid_glob_rejected() {
        let mut config = Config::default();
        config.catalog.exclude.push("[unclosed".to_string());
        let err = config.check().unwrap_err();
        assert!(err.to_string().contains("[unclosed"));
    }

    #[test]
    fn test_inverted_description_bounds_rejected() {
        let mut config = Config::default();
        config.validation.min_description_len = 50;
        config.validation.max_description_len = 5;
        assert!(config.check().is_err());
    }

    #[test]
    fn test_explicit_missing_path_fails() {
        let result = Config::load_with_path(Some(Path::new("/nonexistent/skillshelf.toml")));
        assert!(result.is_err());
    }
}
