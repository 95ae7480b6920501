/// Note engine: loads vault directories into an in-memory, fname-indexed
/// store and answers note lookups for the goto dispatcher.
mod store;

/// YAML frontmatter parsing for note files.
pub mod frontmatter;

pub use store::{build_note, fname_from_path, NoteEngine};
