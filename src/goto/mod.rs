//! Goto navigation: resolves a selected wikilink to a note and either opens
//! that note or the external resource the note points at.
//!
//! The dispatcher talks to its collaborators through the traits below so a
//! host (the CLI, an editor integration, tests) can supply its own.

mod dispatcher;
mod vault;

pub use dispatcher::GotoDispatcher;
pub use vault::{vault_by_name, vault_by_name_or_err};

use async_trait::async_trait;

use crate::errors::Result;
use crate::types::{GotoTarget, LinkDescriptor, Note, Vault};

/// Source of the link under the user's selection.
#[async_trait]
pub trait SelectionSource: Send + Sync {
    /// Returns the parsed link, or `None` when the selection is not a link.
    async fn link(&self) -> Option<LinkDescriptor>;
}

/// Finds notes by fname across the workspace.
#[async_trait]
pub trait NoteLookup: Send + Sync {
    /// Returns matching notes in lookup priority order, restricted to
    /// `vault` when given. No match yields an empty vector.
    async fn find_notes(&self, fname: &str, vault: Option<&Vault>) -> Result<Vec<Note>>;
}

/// Opens a note in the editor.
#[async_trait]
pub trait NoteNavigator: Send + Sync {
    /// Opens the note `qs` of `vault`, optionally scrolled to `anchor`.
    async fn open_note(&self, qs: &str, vault: &Vault, anchor: Option<&str>)
        -> Result<GotoTarget>;
}

/// Opens a URI with the host's resource handler.
#[async_trait]
pub trait LinkOpener: Send + Sync {
    async fn open(&self, uri: &str) -> Result<()>;
}
