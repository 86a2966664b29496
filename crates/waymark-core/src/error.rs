use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading configuration or a content tree.
///
/// The request-time operations never fail; only startup loading does.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid value {value:?} for attribute `{name}`")]
    InvalidAttribute { name: String, value: String },

    #[error("site `{0}` is declared more than once")]
    DuplicateSite(String),

    #[error("site `{name}`: {reason}")]
    InvalidSite { name: String, reason: String },

    #[error("unknown site `{0}`")]
    UnknownSite(String),

    #[error("invalid content tree: {0}")]
    InvalidTree(String),
}
