//! # Error Types / 错误类型
//!
//! Typed errors raised by the reporting library. The command layer wraps
//! them with `anyhow` context.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A locale could not be selected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    #[error("unsupported language '{lang}' (available: {available})")]
    Unsupported { lang: String, available: String },

    #[error("language '{lang}' is missing vocabulary entry '{key}'")]
    MissingKey { lang: String, key: &'static str },
}

/// The event stream could not be read.
#[derive(Error, Debug)]
pub enum EventError {
    #[error("failed to read event stream: {0}")]
    Io(#[from] io::Error),

    #[error("malformed event on line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// The reporter configuration file could not be loaded.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
