use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

use crate::errors::GotoError;

/// Reserved custom metadata key that redirects goto to an external resource.
pub const GOTO_KEY: &str = "uri";

/// An independent collection of notes within a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vault {
    /// Unique vault name within the workspace.
    pub name: String,
    /// Vault directory, relative to the workspace root.
    pub fs_path: String,
}

/// A markdown note belonging to exactly one vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    /// Hierarchical file name, e.g. `proj.notes.todo` for `proj/notes/todo.md`.
    pub fname: String,
    pub title: String,
    pub desc: String,
    pub vault: Vault,
    /// Path of the note file relative to its vault directory.
    pub path: String,
    /// Free-form metadata from the `custom:` frontmatter block.
    pub custom: HashMap<String, Value>,
}

impl Note {
    /// Returns the custom metadata value stored under `key`, if any.
    pub fn custom_value(&self, key: &str) -> Option<&Value> {
        self.custom.get(key)
    }

    /// Returns the external goto target of this note, if it declares one.
    ///
    /// String values are returned verbatim; any other JSON value is rendered
    /// as its JSON text.
    pub fn goto_uri(&self) -> Option<String> {
        self.custom_value(GOTO_KEY).map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// Parsed representation of a wikilink selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDescriptor {
    /// Target note name (the fname part of the link).
    pub value: String,
    /// Vault qualifier from a `dendron://vault/` prefix.
    pub vault_name: Option<String>,
    /// Section anchor following `#`.
    pub anchor_header: Option<String>,
    /// Display text preceding `|`.
    pub alias: Option<String>,
}

impl LinkDescriptor {
    /// Creates a descriptor for a bare target name.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            vault_name: None,
            anchor_header: None,
            alias: None,
        }
    }

    pub fn with_vault(mut self, vault_name: impl Into<String>) -> Self {
        self.vault_name = Some(vault_name.into());
        self
    }

    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor_header = Some(anchor.into());
        self
    }
}

/// Kinds of goto targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Note,
    Link,
}

#[allow(clippy::should_implement_trait)]
impl TargetKind {
    /// Returns the string representation of this target kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Note => "note",
            TargetKind::Link => "link",
        }
    }

    /// Parses a string into a `TargetKind`, returning `None` for unrecognized values.
    pub fn from_str(s: &str) -> Option<TargetKind> {
        match s {
            "note" => Some(TargetKind::Note),
            "link" => Some(TargetKind::Link),
            _ => None,
        }
    }
}

/// Where a goto ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GotoTarget {
    /// An internal note was opened.
    Note {
        note_path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        anchor: Option<String>,
    },
    /// An external resource was handed to the system opener.
    Link { full_path: String },
}

impl GotoTarget {
    pub fn kind(&self) -> TargetKind {
        match self {
            GotoTarget::Note { .. } => TargetKind::Note,
            GotoTarget::Link { .. } => TargetKind::Link,
        }
    }

    /// Returns the note path or URI this target points to.
    pub fn location(&self) -> &str {
        match self {
            GotoTarget::Note { note_path, .. } => note_path,
            GotoTarget::Link { full_path } => full_path,
        }
    }
}

/// Result envelope of a goto invocation.
///
/// Exactly one of `data` and `error` is populated. Serializes as
/// `{"data": ...}` or `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GotoResponse {
    outcome: std::result::Result<GotoTarget, GotoError>,
}

impl GotoResponse {
    /// Creates a successful response.
    pub fn success(data: GotoTarget) -> Self {
        Self { outcome: Ok(data) }
    }

    /// Creates a failed response.
    pub fn failure(error: GotoError) -> Self {
        Self {
            outcome: Err(error),
        }
    }

    pub fn data(&self) -> Option<&GotoTarget> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&GotoError> {
        self.outcome.as_ref().err()
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Converts the envelope into a standard `Result`.
    pub fn into_result(self) -> std::result::Result<GotoTarget, GotoError> {
        self.outcome
    }
}

impl Serialize for GotoResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Envelope<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            data: Option<&'a GotoTarget>,
            #[serde(skip_serializing_if = "Option::is_none")]
            error: Option<&'a GotoError>,
        }

        Envelope {
            data: self.data(),
            error: self.error(),
        }
        .serialize(serializer)
    }
}

/// Per-vault summary of the loaded workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultStats {
    pub vault: Vault,
    pub note_count: usize,
}

/// Generates a deterministic note ID from vault name and fname.
///
/// Used for notes whose frontmatter carries no `id`. The ID is the first 23
/// hex characters of the SHA-256 hash of `"vault:fname"`.
pub fn generate_note_id(vault_name: &str, fname: &str) -> String {
    let input = format!("{}:{}", vault_name, fname);
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let hash = hasher.finalize();
    let hex_str = hex::encode(hash);
    hex_str[..23].to_string()
}
