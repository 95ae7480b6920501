use crate::errors::{Result, VaultNavError};
use crate::types::Vault;

/// Finds a vault by exact name.
pub fn vault_by_name<'a>(vaults: &'a [Vault], name: &str) -> Option<&'a Vault> {
    vaults.iter().find(|v| v.name == name)
}

/// Finds a vault by exact name, failing with `UnknownVault` when none matches.
pub fn vault_by_name_or_err(vaults: &[Vault], name: &str) -> Result<Vault> {
    vault_by_name(vaults, name)
        .cloned()
        .ok_or_else(|| VaultNavError::UnknownVault {
            name: name.to_string(),
        })
}
