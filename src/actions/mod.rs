/// Opens notes on disk and in the configured editor.
pub mod navigate;

/// Hands external URIs to the system opener.
pub mod open_link;

pub use navigate::EditorNavigator;
pub use open_link::SystemLinkOpener;
