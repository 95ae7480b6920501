use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;

use crate::engine::NoteEngine;
use crate::errors::{Result, VaultNavError};
use crate::goto::NoteNavigator;
use crate::types::{GotoTarget, Vault};

/// Opens notes from the workspace on disk, optionally launching an editor.
pub struct EditorNavigator {
    workspace_root: PathBuf,
    engine: Arc<NoteEngine>,
    editor: Option<String>,
}

impl EditorNavigator {
    /// Creates a navigator for the workspace at `workspace_root`.
    ///
    /// `editor` is a command line such as `code -g`; the note path is
    /// appended as its last argument. `None` only resolves the note path.
    pub fn new(workspace_root: PathBuf, engine: Arc<NoteEngine>, editor: Option<String>) -> Self {
        Self {
            workspace_root,
            engine,
            editor,
        }
    }

    /// Returns the absolute path of the note `fname` in `vault`.
    pub fn note_path(&self, fname: &str, vault: &Vault) -> Result<PathBuf> {
        let note = self
            .engine
            .get_notes_by_fname(fname, Some(vault))
            .into_iter()
            .next()
            .ok_or_else(|| VaultNavError::Navigation {
                message: format!("note not found in vault '{}'", vault.name),
                fname: fname.to_string(),
            })?;
        let path = self
            .workspace_root
            .join(&vault.fs_path)
            .join(&note.path);
        if !path.is_file() {
            return Err(VaultNavError::Navigation {
                message: format!("note file '{}' does not exist", path.display()),
                fname: fname.to_string(),
            });
        }
        Ok(path)
    }

    async fn launch_editor(&self, editor: &str, fname: &str, path: &Path) -> Result<()> {
        let mut parts = editor.split_whitespace();
        let program = parts.next().ok_or_else(|| VaultNavError::Config {
            message: "editor command is empty".to_string(),
        })?;
        let status = Command::new(program)
            .args(parts)
            .arg(path)
            .status()
            .await
            .map_err(|e| VaultNavError::Navigation {
                message: format!("failed to launch editor '{}': {}", program, e),
                fname: fname.to_string(),
            })?;
        if !status.success() {
            return Err(VaultNavError::Navigation {
                message: format!("editor '{}' exited with {}", program, status),
                fname: fname.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl NoteNavigator for EditorNavigator {
    async fn open_note(
        &self,
        qs: &str,
        vault: &Vault,
        anchor: Option<&str>,
    ) -> Result<GotoTarget> {
        let path = self.note_path(qs, vault)?;
        if let Some(editor) = self.editor.as_deref() {
            tracing::debug!(%editor, path = %path.display(), "launching editor");
            self.launch_editor(editor, qs, &path).await?;
        }
        Ok(GotoTarget::Note {
            note_path: path.to_string_lossy().to_string(),
            anchor: anchor.map(str::to_string),
        })
    }
}
