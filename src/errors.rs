use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that abort a vaultnav operation.
///
/// Expected selection problems ("not a link", "not a note") are not errors
/// at this level; they are reported inside [`crate::types::GotoResponse`].
#[derive(Error, Debug)]
pub enum VaultNavError {
    #[error("file error: {message} (path: {path})")]
    File { message: String, path: String },

    #[error("parse error: {message} (path: {path}, line: {line:?})")]
    Parse {
        message: String,
        path: String,
        line: Option<u32>,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("no vault found with name '{name}'")]
    UnknownVault { name: String },

    #[error("navigation error: {message} (note: {fname})")]
    Navigation { message: String, fname: String },

    #[error("failed to open link '{uri}': {message}")]
    OpenLink { message: String, uri: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using `VaultNavError`.
pub type Result<T> = std::result::Result<T, VaultNavError>;

/// Recoverable goto failures, reported in the response envelope.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GotoError {
    /// The selection does not parse as a link.
    #[error("{message}")]
    NotALink { message: String },

    /// The link parses but no note matches it.
    #[error("{message}")]
    NotANote { message: String },
}

impl GotoError {
    pub fn not_a_link() -> Self {
        GotoError::NotALink {
            message: "selection is not a valid link".to_string(),
        }
    }

    pub fn not_a_note() -> Self {
        GotoError::NotANote {
            message: "selection is not a note".to_string(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            GotoError::NotALink { message } | GotoError::NotANote { message } => message,
        }
    }
}
