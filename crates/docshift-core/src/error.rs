//! Error types for migration runs

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for migration operations
#[derive(Debug, Error)]
pub enum MigrateError {
    /// The source root does not exist and could not be fetched
    #[error("Source not found: {0}")]
    SourceNotFound(PathBuf),

    /// Remote fallback download failed
    #[error("Failed to fetch '{url}': {message}")]
    Fetch { url: String, message: String },

    #[error("Failed to parse {file}: {message}")]
    Parse { file: PathBuf, message: String },

    /// A transformer rejected the document
    #[error("Transformer '{transformer}' failed: {message}")]
    Transform { transformer: String, message: String },

    #[error("IO error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Transformer dependencies form a cycle
    #[error("Transformer ordering error: {message}")]
    Ordering { message: String },
}

impl MigrateError {
    /// Check if this error only affects a single document
    /// (processing continues with the other files)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            MigrateError::Parse { .. } | MigrateError::Transform { .. } | MigrateError::Io { .. }
        )
    }

    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn transform_error(transformer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transform {
            transformer: transformer.into(),
            message: message.into(),
        }
    }
}

/// Result type alias using [`MigrateError`]
pub type Result<T> = std::result::Result<T, MigrateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_kinds() {
        let parse = MigrateError::Parse {
            file: "a.mdx".into(),
            message: "line 3: unclosed <Steps>".into(),
        };
        assert!(parse.is_recoverable());
        assert!(MigrateError::transform_error("tabs", "boom").is_recoverable());
        assert!(!MigrateError::SourceNotFound("docs".into()).is_recoverable());
        assert!(!MigrateError::config_error("bad").is_recoverable());
    }

    #[test]
    fn test_display() {
        let err = MigrateError::Fetch {
            url: "https://example.com/repo.git".into(),
            message: "exit status 128".into(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to fetch 'https://example.com/repo.git': exit status 128"
        );
    }
}
