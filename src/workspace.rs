use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::actions::{EditorNavigator, SystemLinkOpener};
use crate::config::{get_config_path, load_config, save_config, WorkspaceConfig};
use crate::engine::NoteEngine;
use crate::errors::{Result, VaultNavError};
use crate::goto::{GotoDispatcher, LinkOpener, NoteNavigator, SelectionSource};
use crate::types::*;

/// A loaded multi-vault note workspace.
///
/// Owns the configuration and the note engine; vaults and notes are
/// read-only once loaded.
pub struct Workspace {
    config: WorkspaceConfig,
    engine: Arc<NoteEngine>,
    root: PathBuf,
}

/// Result of loading a workspace from disk.
pub struct LoadResult {
    /// Number of vaults configured.
    pub vault_count: usize,
    /// Total number of notes loaded.
    pub note_count: usize,
    /// Time taken in milliseconds.
    pub duration_ms: u64,
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

impl Workspace {
    /// Initializes a new workspace at the given root.
    ///
    /// Writes the default configuration and creates the default vault
    /// directory. Fails if the workspace is already initialized.
    pub fn init(root: &Path) -> Result<Self> {
        if Self::is_initialized(root) {
            return Err(VaultNavError::Config {
                message: format!(
                    "workspace already initialized at '{}'",
                    get_config_path(root).display()
                ),
            });
        }

        let config = WorkspaceConfig::default();
        save_config(root, &config)?;
        for vault in &config.vaults {
            std::fs::create_dir_all(root.join(&vault.fs_path)).map_err(|e| {
                VaultNavError::File {
                    message: format!("failed to create vault directory: {}", e),
                    path: vault.fs_path.clone(),
                }
            })?;
        }

        let engine = NoteEngine::load(root, &config)?;
        Ok(Self {
            config,
            engine: Arc::new(engine),
            root: root.to_path_buf(),
        })
    }

    /// Opens the workspace at the given root, loading every vault.
    ///
    /// A root without a configuration file is opened with the default
    /// configuration.
    pub fn open(root: &Path) -> Result<Self> {
        let config = load_config(root)?;
        Self::with_config(root, config)
    }

    /// Opens the workspace at `root` with an explicit configuration.
    pub fn with_config(root: &Path, config: WorkspaceConfig) -> Result<Self> {
        config.validate()?;
        let start = Instant::now();
        let engine = NoteEngine::load(root, &config)?;
        tracing::info!(
            vaults = config.vaults.len(),
            notes = engine.notes().len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "workspace loaded"
        );
        Ok(Self {
            config,
            engine: Arc::new(engine),
            root: root.to_path_buf(),
        })
    }

    /// Returns `true` if a workspace configuration exists at the given root.
    pub fn is_initialized(root: &Path) -> bool {
        get_config_path(root).exists()
    }

    /// Re-reads every vault from disk.
    pub fn reload(&mut self) -> Result<LoadResult> {
        let start = Instant::now();
        let engine = NoteEngine::load(&self.root, &self.config)?;
        let note_count = engine.notes().len();
        self.engine = Arc::new(engine);
        Ok(LoadResult {
            vault_count: self.config.vaults.len(),
            note_count,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

// ---------------------------------------------------------------------------
// Goto
// ---------------------------------------------------------------------------

impl Workspace {
    /// Builds a goto dispatcher for `selection` wired with the default
    /// editor navigator and system link opener.
    pub fn dispatcher(&self, selection: Arc<dyn SelectionSource>) -> GotoDispatcher {
        let navigator = EditorNavigator::new(
            self.root.clone(),
            Arc::clone(&self.engine),
            self.config.editor.clone(),
        );
        self.dispatcher_with(selection, Arc::new(navigator), Arc::new(SystemLinkOpener))
    }

    /// Builds a goto dispatcher with caller-supplied actions.
    pub fn dispatcher_with(
        &self,
        selection: Arc<dyn SelectionSource>,
        navigator: Arc<dyn NoteNavigator>,
        opener: Arc<dyn LinkOpener>,
    ) -> GotoDispatcher {
        let lookup: Arc<NoteEngine> = Arc::clone(&self.engine);
        GotoDispatcher::new(selection, self.vaults(), lookup, navigator, opener)
    }
}

// ---------------------------------------------------------------------------
// Query delegation
// ---------------------------------------------------------------------------

impl Workspace {
    /// Returns the configured vaults in priority order.
    pub fn vaults(&self) -> Vec<Vault> {
        self.engine.vaults().to_vec()
    }

    /// Returns a shared handle to the note engine.
    pub fn engine(&self) -> Arc<NoteEngine> {
        Arc::clone(&self.engine)
    }

    /// Returns notes named `fname`, restricted to the vault named
    /// `vault_name` when given.
    pub fn find_notes(&self, fname: &str, vault_name: Option<&str>) -> Result<Vec<Note>> {
        let vault = match vault_name {
            Some(name) => Some(crate::goto::vault_by_name_or_err(self.engine.vaults(), name)?),
            None => None,
        };
        Ok(self.engine.get_notes_by_fname(fname, vault.as_ref()))
    }

    /// Returns note counts per vault.
    pub fn get_stats(&self) -> Vec<VaultStats> {
        self.engine.stats()
    }

    /// Returns a reference to the current configuration.
    pub fn get_config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Returns the workspace root path.
    pub fn root(&self) -> &Path {
        &self.root
    }
}
