use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use walkdir::WalkDir;

use crate::config::{should_include_file, WorkspaceConfig};
use crate::engine::frontmatter::parse_frontmatter;
use crate::errors::Result;
use crate::goto::NoteLookup;
use crate::types::*;

/// In-memory index of every note in the workspace.
///
/// Notes are kept in lookup priority order: vaults in configuration order,
/// then by fname within a vault.
pub struct NoteEngine {
    vaults: Vec<Vault>,
    notes: Vec<Note>,
    /// Lower-cased fname to positions in `notes`, in priority order.
    fname_index: HashMap<String, Vec<usize>>,
}

impl NoteEngine {
    /// Creates an engine over the given vaults with no notes.
    pub fn new(vaults: Vec<Vault>) -> Self {
        Self {
            vaults,
            notes: Vec::new(),
            fname_index: HashMap::new(),
        }
    }

    /// Creates an engine from already-built notes.
    ///
    /// Notes whose vault is not among `vaults` are dropped.
    pub fn from_notes(vaults: Vec<Vault>, notes: Vec<Note>) -> Self {
        let mut engine = Self::new(vaults);
        for note in notes {
            if engine.vaults.contains(&note.vault) {
                engine.notes.push(note);
            } else {
                tracing::warn!(
                    fname = %note.fname,
                    vault = %note.vault.name,
                    "dropping note from unknown vault"
                );
            }
        }
        engine.reindex();
        engine
    }

    /// Loads all notes of the configured vaults from disk.
    ///
    /// Vault directories that do not exist are skipped with a warning. Files
    /// that cannot be read or whose frontmatter does not parse are skipped.
    pub fn load(workspace_root: &Path, config: &WorkspaceConfig) -> Result<Self> {
        let vaults = config.vaults();
        let mut notes = Vec::new();

        for vault in &vaults {
            let vault_root = workspace_root.join(&vault.fs_path);
            if !vault_root.is_dir() {
                tracing::warn!(
                    vault = %vault.name,
                    path = %vault_root.display(),
                    "vault directory not found, skipping"
                );
                continue;
            }
            let loaded = load_vault(&vault_root, vault, config);
            tracing::debug!(vault = %vault.name, notes = loaded.len(), "loaded vault");
            notes.extend(loaded);
        }

        Ok(Self::from_notes(vaults, notes))
    }

    /// Adds a note, keeping priority order.
    pub fn insert_note(&mut self, note: Note) {
        self.notes.push(note);
        self.reindex();
    }

    /// Returns the vaults this engine was built for, in priority order.
    pub fn vaults(&self) -> &[Vault] {
        &self.vaults
    }

    /// Returns all notes in priority order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Returns the notes whose fname matches `fname` case-insensitively,
    /// restricted to `vault` when given, in priority order.
    pub fn get_notes_by_fname(&self, fname: &str, vault: Option<&Vault>) -> Vec<Note> {
        let Some(positions) = self.fname_index.get(&fname.to_lowercase()) else {
            return Vec::new();
        };
        positions
            .iter()
            .map(|&i| &self.notes[i])
            .filter(|note| vault.is_none_or(|v| note.vault == *v))
            .cloned()
            .collect()
    }

    /// Returns the number of notes loaded per vault.
    pub fn stats(&self) -> Vec<VaultStats> {
        self.vaults
            .iter()
            .map(|vault| VaultStats {
                vault: vault.clone(),
                note_count: self.notes.iter().filter(|n| n.vault == *vault).count(),
            })
            .collect()
    }

    /// Sorts notes into priority order and rebuilds the fname index.
    fn reindex(&mut self) {
        let rank: HashMap<&str, usize> = self
            .vaults
            .iter()
            .enumerate()
            .map(|(i, v)| (v.name.as_str(), i))
            .collect();
        self.notes.sort_by(|a, b| {
            let ra = rank.get(a.vault.name.as_str()).copied().unwrap_or(usize::MAX);
            let rb = rank.get(b.vault.name.as_str()).copied().unwrap_or(usize::MAX);
            ra.cmp(&rb)
                .then_with(|| a.fname.cmp(&b.fname))
                .then_with(|| a.path.cmp(&b.path))
        });

        self.fname_index.clear();
        for (i, note) in self.notes.iter().enumerate() {
            self.fname_index
                .entry(note.fname.to_lowercase())
                .or_default()
                .push(i);
        }
    }
}

#[async_trait]
impl NoteLookup for NoteEngine {
    async fn find_notes(&self, fname: &str, vault: Option<&Vault>) -> Result<Vec<Note>> {
        Ok(self.get_notes_by_fname(fname, vault))
    }
}

/// Derives a note fname from its path relative to the vault directory.
///
/// `daily/journal.2024.md` becomes `daily.journal.2024`.
pub fn fname_from_path(rel_path: &str) -> String {
    let stem = rel_path.strip_suffix(".md").unwrap_or(rel_path);
    stem.replace(['/', '\\'], ".")
}

/// Reads every note file of one vault.
fn load_vault(vault_root: &Path, vault: &Vault, config: &WorkspaceConfig) -> Vec<Note> {
    let mut notes = Vec::new();
    for entry in WalkDir::new(vault_root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
    {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Ok(relative) = path.strip_prefix(vault_root) else {
            continue;
        };
        let rel_str = relative.to_string_lossy().replace('\\', "/");
        if !rel_str.ends_with(".md") || !should_include_file(&rel_str, config) {
            continue;
        }
        match std::fs::metadata(path) {
            Ok(metadata) if metadata.len() <= config.max_file_size => {}
            _ => continue,
        }
        let content = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read note");
                continue;
            }
        };
        match build_note(vault, &rel_str, &content) {
            Ok(note) => notes.push(note),
            Err(message) => {
                tracing::warn!(path = %path.display(), %message, "skipping note with invalid frontmatter");
            }
        }
    }
    notes
}

/// Builds a `Note` from file content.
pub fn build_note(vault: &Vault, rel_path: &str, content: &str) -> std::result::Result<Note, String> {
    let fm = parse_frontmatter(content)?;
    let fname = fname_from_path(rel_path);
    let title = fm.title.unwrap_or_else(|| {
        fname
            .rsplit('.')
            .next()
            .unwrap_or(fname.as_str())
            .to_string()
    });
    Ok(Note {
        id: fm
            .id
            .unwrap_or_else(|| generate_note_id(&vault.name, &fname)),
        title,
        desc: fm.desc.unwrap_or_default(),
        vault: vault.clone(),
        path: rel_path.to_string(),
        custom: fm.custom,
        fname,
    })
}
