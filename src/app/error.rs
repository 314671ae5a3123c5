use std::path::PathBuf;
use thiserror::Error;

/// Problems with a configuration file. Never fatal: the caller logs the
/// error and continues with the built-in defaults.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed TOML config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid ignore pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// File bytes that do not decode cleanly in the detected encoding.
#[derive(Debug, Error)]
#[error("content is not valid {encoding}")]
pub struct EncodingError {
    pub encoding: &'static str,
}

/// Fatal errors that end the run with a non-zero exit code.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Repository root '{path}' is not accessible: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Repository root '{0}' is not a directory")]
    RootNotDirectory(PathBuf),

    #[error("Failed to write output to '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write to standard output: {0}")]
    Stdout(#[source] std::io::Error),
}
