use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;

use crate::errors::{GotoError, Result};
use crate::types::*;

use super::vault::vault_by_name_or_err;
use super::{LinkOpener, NoteLookup, NoteNavigator, SelectionSource};

/// Resolves the selected link and dispatches to note navigation or to the
/// external link opener.
///
/// Each call to [`execute`](Self::execute) reads the selection and the note
/// lookup afresh; nothing is cached between calls.
pub struct GotoDispatcher {
    selection: Arc<dyn SelectionSource>,
    vaults: Vec<Vault>,
    lookup: Arc<dyn NoteLookup>,
    navigator: Arc<dyn NoteNavigator>,
    opener: Arc<dyn LinkOpener>,
    /// Link-open tasks spawned by `execute` that nobody has awaited yet.
    pending_links: Mutex<Vec<JoinHandle<()>>>,
}

impl GotoDispatcher {
    /// Creates a dispatcher over the given workspace vaults and collaborators.
    pub fn new(
        selection: Arc<dyn SelectionSource>,
        vaults: Vec<Vault>,
        lookup: Arc<dyn NoteLookup>,
        navigator: Arc<dyn NoteNavigator>,
        opener: Arc<dyn LinkOpener>,
    ) -> Self {
        Self {
            selection,
            vaults,
            lookup,
            navigator,
            opener,
            pending_links: Mutex::new(Vec::new()),
        }
    }

    /// Runs one goto.
    ///
    /// Returns `Ok` with an error envelope when the selection is not a link
    /// or names no note. A vault qualifier that matches no configured vault
    /// is returned as `Err(UnknownVault)` before any note lookup happens.
    ///
    /// When several notes match, the first one in lookup order wins.
    pub async fn execute(&self) -> Result<GotoResponse> {
        let Some(link) = self.selection.link().await else {
            tracing::debug!("selection is not a link");
            return Ok(GotoResponse::failure(GotoError::not_a_link()));
        };

        let vault = match link.vault_name.as_deref() {
            Some(name) => Some(vault_by_name_or_err(&self.vaults, name)?),
            None => None,
        };

        let notes = self.lookup.find_notes(&link.value, vault.as_ref()).await?;
        let Some(note) = notes.into_iter().next() else {
            tracing::debug!(fname = %link.value, "no note matches link");
            return Ok(GotoResponse::failure(GotoError::not_a_note()));
        };

        match note.goto_uri() {
            None => {
                tracing::info!(
                    fname = %note.fname,
                    vault = %note.vault.name,
                    anchor = ?link.anchor_header,
                    "opening note"
                );
                let target = self
                    .navigator
                    .open_note(&note.fname, &note.vault, link.anchor_header.as_deref())
                    .await?;
                Ok(GotoResponse::success(target))
            }
            Some(uri) => {
                tracing::info!(fname = %note.fname, %uri, "opening external link");
                self.spawn_open_link(uri.clone());
                Ok(GotoResponse::success(GotoTarget::Link { full_path: uri }))
            }
        }
    }

    /// Hands `uri` to the link opener without waiting for it. Failures are
    /// logged only.
    fn spawn_open_link(&self, uri: String) {
        let opener = Arc::clone(&self.opener);
        let handle = tokio::spawn(async move {
            if let Err(e) = opener.open(&uri).await {
                tracing::warn!(%uri, error = %e, "failed to open link");
            }
        });
        if let Ok(mut pending) = self.pending_links.lock() {
            pending.retain(|h| !h.is_finished());
            pending.push(handle);
        }
    }

    /// Waits for every link-open task spawned so far.
    ///
    /// Hosts that shut their runtime down right after a goto call this so
    /// the opener gets to run. Never affects an already returned response.
    pub async fn flush(&self) {
        let handles = match self.pending_links.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(_) => return,
        };
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "link open task did not complete");
            }
        }
    }
}
