//! Migration options and configuration file loading

use crate::error::{MigrateError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How callouts are written in the migrated output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyntaxStyle {
    /// `<Aside type="note">`
    #[default]
    Component,
    /// `:::note`
    Directive,
}

/// Options for one migration run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationOptions {
    /// Root of the legacy documentation tree
    pub source: PathBuf,

    /// Root the migrated tree is written to
    pub output: PathBuf,

    pub syntax: SyntaxStyle,

    /// Directory names skipped during discovery
    pub ignore: Vec<String>,

    /// Document extensions, without the dot
    pub extensions: Vec<String>,

    /// Maximum number of files processed at once
    pub concurrency: usize,

    /// Git URL cloned into `source` when it does not exist
    pub repository: Option<String>,

    pub assets: AssetOptions,
    pub components: ComponentOptions,
    pub detection: DetectionOptions,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            source: PathBuf::from("docs-legacy"),
            output: PathBuf::from("src/content/docs"),
            syntax: SyntaxStyle::Component,
            ignore: vec!["node_modules".to_string()],
            extensions: vec!["md".to_string(), "mdx".to_string()],
            concurrency: 16,
            repository: None,
            assets: AssetOptions::default(),
            components: ComponentOptions::default(),
            detection: DetectionOptions::default(),
        }
    }
}

impl MigrationOptions {
    /// Reject values that would make the run meaningless
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(MigrateError::config_error("concurrency must be at least 1"));
        }
        if self.extensions.is_empty() {
            return Err(MigrateError::config_error("at least one extension is required"));
        }
        if !(0.0..=1.0).contains(&self.detection.ascii_threshold) {
            return Err(MigrateError::config_error(format!(
                "ascii_threshold must be between 0 and 1, got {}",
                self.detection.ascii_threshold
            )));
        }
        Ok(())
    }

    /// True when `path` has one of the configured document extensions
    pub fn is_document(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

/// Static asset prefixes for image rewriting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetOptions {
    /// Prefix of the legacy static directory (`public/`)
    pub legacy_prefix: String,
    /// Alias the assets live under after migration (`~/assets/`)
    pub alias: String,
    /// Prefixes that move under the alias unchanged (`images/`, `screenshots/`)
    pub image_prefixes: Vec<String>,
}

impl Default for AssetOptions {
    fn default() -> Self {
        Self {
            legacy_prefix: "public/".to_string(),
            alias: "~/assets/".to_string(),
            image_prefixes: vec!["images/".to_string(), "screenshots/".to_string()],
        }
    }
}

/// Custom components that are dropped or kept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentOptions {
    /// Replaced by an HTML comment
    pub not_ready: Vec<String>,
    /// Kept, with imports pointing at `ready_module/<Name>`
    pub ready: Vec<String>,
    pub ready_module: String,
}

impl Default for ComponentOptions {
    fn default() -> Self {
        Self {
            not_ready: ["Bleed", "Playground", "Video", "Banner"]
                .map(String::from)
                .to_vec(),
            ready: ["GraphQLExplorer", "Faucet", "Search"]
                .map(String::from)
                .to_vec(),
            ready_module: "~/components".to_string(),
        }
    }
}

/// Thresholds for the locale language check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionOptions {
    /// Files whose ASCII share is below this are kept
    pub ascii_threshold: f64,
    /// Files with at least this many marker words are kept
    pub marker_threshold: usize,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            ascii_threshold: 0.9,
            marker_threshold: 3,
        }
    }
}

/// Loads [`MigrationOptions`] from TOML files
pub struct ConfigLoader;

impl ConfigLoader {
    /// File names searched for in the working directory
    pub const FILE_NAMES: [&'static str; 2] = ["docshift.toml", ".docshift.toml"];

    /// Look for a config file in `dir`
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        Self::FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
            .inspect(|path| tracing::debug!("Found config: {}", path.display()))
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<MigrationOptions> {
        let content = std::fs::read_to_string(path).map_err(|e| MigrateError::Config {
            message: format!("Failed to read config '{}': {}", path.display(), e),
        })?;
        Self::from_toml(&content).map_err(|e| MigrateError::Config {
            message: format!("Failed to load config from '{}': {}", path.display(), e),
        })
    }

    pub fn from_toml(content: &str) -> Result<MigrationOptions> {
        let options: MigrationOptions =
            toml::from_str(content).map_err(|e| MigrateError::config_error(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Load from an explicit path, or from a discovered file, or fall back to defaults
    pub fn load(custom_path: Option<&Path>, start_dir: &Path) -> Result<MigrationOptions> {
        match custom_path {
            Some(path) if !path.exists() => Err(MigrateError::config_error(format!(
                "Config file not found: {}",
                path.display()
            ))),
            Some(path) => Self::load_from_file(path),
            None => match Self::discover(start_dir) {
                Some(path) => Self::load_from_file(&path),
                None => Ok(MigrationOptions::default()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let options = MigrationOptions::default();
        assert_eq!(options.syntax, SyntaxStyle::Component);
        assert_eq!(options.ignore, vec!["node_modules"]);
        assert_eq!(options.concurrency, 16);
        assert_eq!(options.components.ready_module, "~/components");
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let options = ConfigLoader::from_toml(
            "syntax = \"directive\"\nignore = [\"node_modules\", \"drafts\"]\n\n[detection]\nmarker_threshold = 5\n",
        )
        .unwrap();
        assert_eq!(options.syntax, SyntaxStyle::Directive);
        assert_eq!(options.ignore, vec!["node_modules", "drafts"]);
        assert_eq!(options.detection.marker_threshold, 5);
        assert_eq!(options.detection.ascii_threshold, 0.9);
        assert_eq!(options.extensions, vec!["md", "mdx"]);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let err = ConfigLoader::from_toml("concurrency = 0").unwrap_err();
        assert!(matches!(err, MigrateError::Config { .. }));
        assert!(ConfigLoader::from_toml("syntax = \"fancy\"").is_err());
    }

    #[test]
    fn test_load_discovers_file() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            ConfigLoader::load(None, dir.path()).unwrap(),
            MigrationOptions::default()
        );
        fs::write(dir.path().join("docshift.toml"), "source = \"legacy\"").unwrap();
        let options = ConfigLoader::load(None, dir.path()).unwrap();
        assert_eq!(options.source, PathBuf::from("legacy"));
        assert!(ConfigLoader::load(Some(&dir.path().join("missing.toml")), dir.path()).is_err());
    }

    #[test]
    fn test_is_document() {
        let options = MigrationOptions::default();
        assert!(options.is_document(Path::new("a/b.mdx")));
        assert!(options.is_document(Path::new("a/B.MD")));
        assert!(!options.is_document(Path::new("a/b.png")));
    }
}
