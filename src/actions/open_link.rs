use async_trait::async_trait;

use crate::errors::{Result, VaultNavError};
use crate::goto::LinkOpener;

/// Opens URIs with the operating system's default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLinkOpener;

#[async_trait]
impl LinkOpener for SystemLinkOpener {
    async fn open(&self, uri: &str) -> Result<()> {
        let target = uri.to_string();
        let result = tokio::task::spawn_blocking(move || open::that(&target))
            .await
            .map_err(|e| VaultNavError::OpenLink {
                message: format!("opener task failed: {}", e),
                uri: uri.to_string(),
            })?;
        result.map_err(|e| VaultNavError::OpenLink {
            message: e.to_string(),
            uri: uri.to_string(),
        })
    }
}
