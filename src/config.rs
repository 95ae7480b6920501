use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, VaultNavError};
use crate::types::Vault;

/// Name of the configuration file stored inside the `.vaultnav` directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Name of the hidden directory used to store workspace metadata.
pub const VAULTNAV_DIR: &str = ".vaultnav";

/// Name of the vault created by `init`.
pub const DEFAULT_VAULT_NAME: &str = "vault";

/// A vault entry in the workspace configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Unique vault name, used by `dendron://<name>/` link qualifiers.
    pub name: String,
    /// Vault directory relative to the workspace root.
    pub fs_path: String,
}

impl VaultConfig {
    pub fn to_vault(&self) -> Vault {
        Vault {
            name: self.name.clone(),
            fs_path: self.fs_path.clone(),
        }
    }
}

/// Configuration for a vaultnav workspace.
///
/// Lists the vaults, which note files are loaded, and how notes are opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Schema version of the configuration.
    pub version: u32,
    /// Vaults in lookup priority order.
    pub vaults: Vec<VaultConfig>,
    /// Glob patterns, relative to a vault directory, for note files to load.
    pub include: Vec<String>,
    /// Glob patterns for files to skip.
    pub exclude: Vec<String>,
    /// Maximum file size in bytes; larger note files are skipped.
    pub max_file_size: u64,
    /// Command used to open notes (the note path is appended as the last
    /// argument). When unset, notes are resolved but not launched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            version: 1,
            vaults: vec![VaultConfig {
                name: DEFAULT_VAULT_NAME.to_string(),
                fs_path: DEFAULT_VAULT_NAME.to_string(),
            }],
            include: vec!["**/*.md".to_string()],
            exclude: vec![
                ".git/**".to_string(),
                ".vaultnav/**".to_string(),
                "node_modules/**".to_string(),
                "assets/**".to_string(),
            ],
            max_file_size: 1_048_576,
            editor: None,
        }
    }
}

impl WorkspaceConfig {
    /// Returns the configured vaults in priority order.
    pub fn vaults(&self) -> Vec<Vault> {
        self.vaults.iter().map(VaultConfig::to_vault).collect()
    }

    /// Checks that the configuration is usable: at least one vault and no
    /// duplicated vault names.
    pub fn validate(&self) -> Result<()> {
        if self.vaults.is_empty() {
            return Err(VaultNavError::Config {
                message: "workspace has no vaults configured".to_string(),
            });
        }
        for (i, vault) in self.vaults.iter().enumerate() {
            if vault.name.trim().is_empty() {
                return Err(VaultNavError::Config {
                    message: format!("vault #{} has an empty name", i + 1),
                });
            }
            if self.vaults[..i].iter().any(|v| v.name == vault.name) {
                return Err(VaultNavError::Config {
                    message: format!("duplicate vault name '{}'", vault.name),
                });
            }
        }
        Ok(())
    }
}

/// Returns the path to the `.vaultnav` directory within the given workspace root.
pub fn get_vaultnav_dir(workspace_root: &Path) -> PathBuf {
    workspace_root.join(VAULTNAV_DIR)
}

/// Returns the path to the configuration file (`config.json`) within the `.vaultnav` directory.
pub fn get_config_path(workspace_root: &Path) -> PathBuf {
    get_vaultnav_dir(workspace_root).join(CONFIG_FILENAME)
}

/// Loads the configuration from disk.
///
/// If the configuration file does not exist, returns the default configuration.
pub fn load_config(workspace_root: &Path) -> Result<WorkspaceConfig> {
    let config_path = get_config_path(workspace_root);

    if !config_path.exists() {
        return Ok(WorkspaceConfig::default());
    }

    let contents = fs::read_to_string(&config_path).map_err(|e| VaultNavError::Config {
        message: format!(
            "failed to read config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    let config: WorkspaceConfig =
        serde_json::from_str(&contents).map_err(|e| VaultNavError::Config {
            message: format!(
                "failed to parse config file '{}': {}",
                config_path.display(),
                e
            ),
        })?;

    config.validate()?;
    Ok(config)
}

/// Saves the configuration to disk using an atomic write.
///
/// Writes to a temporary file first and then renames it into place.
pub fn save_config(workspace_root: &Path, config: &WorkspaceConfig) -> Result<()> {
    let vaultnav_dir = get_vaultnav_dir(workspace_root);
    fs::create_dir_all(&vaultnav_dir).map_err(|e| VaultNavError::Config {
        message: format!(
            "failed to create vaultnav directory '{}': {}",
            vaultnav_dir.display(),
            e
        ),
    })?;

    let config_path = get_config_path(workspace_root);
    let tmp_path = config_path.with_extension("tmp");

    let json = serde_json::to_string_pretty(config).map_err(|e| VaultNavError::Config {
        message: format!("failed to serialize config: {}", e),
    })?;

    fs::write(&tmp_path, &json).map_err(|e| VaultNavError::Config {
        message: format!(
            "failed to write temporary config file '{}': {}",
            tmp_path.display(),
            e
        ),
    })?;

    fs::rename(&tmp_path, &config_path).map_err(|e| VaultNavError::Config {
        message: format!(
            "failed to rename temporary config file '{}' to '{}': {}",
            tmp_path.display(),
            config_path.display(),
            e
        ),
    })?;

    Ok(())
}

/// Determines whether a note file should be loaded based on the
/// configuration's include and exclude glob patterns.
///
/// `file_path` is relative to the vault directory. Exclude patterns take
/// precedence over include patterns.
pub fn should_include_file(file_path: &str, config: &WorkspaceConfig) -> bool {
    let match_opts = glob::MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };

    for pattern_str in &config.exclude {
        if let Ok(pattern) = Pattern::new(pattern_str) {
            if pattern.matches_with(file_path, match_opts) {
                return false;
            }
        }
    }

    for pattern_str in &config.include {
        if let Ok(pattern) = Pattern::new(pattern_str) {
            if pattern.matches_with(file_path, match_opts) {
                return true;
            }
        }
    }

    false
}
