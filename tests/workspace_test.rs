use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use vaultnav::actions::EditorNavigator;
use vaultnav::config::{get_config_path, save_config, VaultConfig, WorkspaceConfig};
use vaultnav::errors::{GotoError, Result, VaultNavError};
use vaultnav::goto::{LinkOpener, NoteNavigator};
use vaultnav::selection::Selection;
use vaultnav::types::*;
use vaultnav::workspace::Workspace;

#[derive(Default)]
struct RecordingOpener {
    opened: Mutex<Vec<String>>,
}

#[async_trait]
impl LinkOpener for RecordingOpener {
    async fn open(&self, uri: &str) -> Result<()> {
        self.opened.lock().unwrap().push(uri.to_string());
        Ok(())
    }
}

fn write_note(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Two vaults `A` and `B`, each with a `foo` note; `bar` links out.
fn setup_workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let config = WorkspaceConfig {
        vaults: vec![
            VaultConfig {
                name: "A".to_string(),
                fs_path: "a".to_string(),
            },
            VaultConfig {
                name: "B".to_string(),
                fs_path: "b".to_string(),
            },
        ],
        ..WorkspaceConfig::default()
    };
    save_config(root, &config).unwrap();
    write_note(root, "a/foo.md", "---\nid: a-foo\n---\n# Foo\n");
    write_note(
        root,
        "b/foo.md",
        "---\nid: b-foo\ncustom:\n  uri: https://b.example\n---\n",
    );
    write_note(
        root,
        "a/bar.md",
        "---\nid: bar\ncustom:\n  uri: https://example.com\n---\n",
    );
    dir
}

async fn goto(ws: &Workspace, text: &str, opener: Arc<RecordingOpener>) -> Result<GotoResponse> {
    let navigator: Arc<dyn NoteNavigator> =
        Arc::new(EditorNavigator::new(ws.root().to_path_buf(), ws.engine(), None));
    let dispatcher = ws.dispatcher_with(Arc::new(Selection::new(text)), navigator, opener);
    let response = dispatcher.execute().await;
    dispatcher.flush().await;
    response
}

#[tokio::test]
async fn test_goto_navigates_to_first_vault_note() {
    let dir = setup_workspace();
    let ws = Workspace::open(dir.path()).unwrap();
    let opener = Arc::new(RecordingOpener::default());

    let response = goto(&ws, "[[foo]]", opener.clone()).await.unwrap();

    let expected = dir.path().join("a").join("foo.md");
    assert_eq!(
        response.data(),
        Some(&GotoTarget::Note {
            note_path: expected.to_string_lossy().to_string(),
            anchor: None,
        })
    );
    assert!(opener.opened.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_goto_qualified_vault_follows_uri() {
    let dir = setup_workspace();
    let ws = Workspace::open(dir.path()).unwrap();
    let opener = Arc::new(RecordingOpener::default());

    let response = goto(&ws, "[[dendron://B/foo]]", opener.clone())
        .await
        .unwrap();

    assert_eq!(
        response.into_result().unwrap(),
        GotoTarget::Link {
            full_path: "https://b.example".to_string(),
        }
    );
    assert_eq!(
        opener.opened.lock().unwrap().as_slice(),
        &["https://b.example".to_string()]
    );
}

#[tokio::test]
async fn test_goto_with_cursor_and_anchor() {
    let dir = setup_workspace();
    let ws = Workspace::open(dir.path()).unwrap();
    let navigator: Arc<dyn NoteNavigator> =
        Arc::new(EditorNavigator::new(ws.root().to_path_buf(), ws.engine(), None));
    let line = "read [[foo#setup]] first";
    let selection = Selection::at_cursor(line, line.find("foo").unwrap());
    let dispatcher = ws.dispatcher_with(
        Arc::new(selection),
        navigator,
        Arc::new(RecordingOpener::default()),
    );

    let target = dispatcher.execute().await.unwrap().into_result().unwrap();
    match target {
        GotoTarget::Note { note_path, anchor } => {
            assert!(note_path.ends_with("foo.md"));
            assert_eq!(anchor.as_deref(), Some("setup"));
        }
        other => panic!("expected note target, got {other:?}"),
    }
}

#[tokio::test]
async fn test_goto_soft_and_fatal_failures() {
    let dir = setup_workspace();
    let ws = Workspace::open(dir.path()).unwrap();

    let not_link = goto(&ws, "two words", Arc::default()).await.unwrap();
    assert!(matches!(not_link.error(), Some(GotoError::NotALink { .. })));

    let not_note = goto(&ws, "[[missing]]", Arc::default()).await.unwrap();
    assert!(matches!(not_note.error(), Some(GotoError::NotANote { .. })));
    assert_eq!(
        serde_json::to_value(&not_note).unwrap(),
        serde_json::json!({ "error": { "kind": "not_a_note", "message": "selection is not a note" } })
    );

    let fatal = goto(&ws, "[[dendron://C/foo]]", Arc::default()).await;
    assert!(matches!(fatal, Err(VaultNavError::UnknownVault { .. })));
}

#[tokio::test]
async fn test_navigator_errors_when_note_file_vanishes() {
    let dir = setup_workspace();
    let ws = Workspace::open(dir.path()).unwrap();
    fs::remove_file(dir.path().join("a").join("foo.md")).unwrap();

    let result = goto(&ws, "[[dendron://A/foo]]", Arc::default()).await;
    assert!(matches!(result, Err(VaultNavError::Navigation { .. })));
}

#[test]
fn test_init_creates_config_and_vault() {
    let dir = TempDir::new().unwrap();
    let ws = Workspace::init(dir.path()).unwrap();

    assert!(get_config_path(dir.path()).exists());
    assert!(dir.path().join("vault").is_dir());
    assert_eq!(ws.vaults().len(), 1);
    assert!(Workspace::is_initialized(dir.path()));
    assert!(matches!(
        Workspace::init(dir.path()),
        Err(VaultNavError::Config { .. })
    ));
}

#[test]
fn test_find_notes_and_reload() {
    let dir = setup_workspace();
    let mut ws = Workspace::open(dir.path()).unwrap();

    let found = ws.find_notes("foo", None).unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].vault.name, "A");
    assert_eq!(ws.find_notes("foo", Some("B")).unwrap().len(), 1);
    assert!(matches!(
        ws.find_notes("foo", Some("nope")),
        Err(VaultNavError::UnknownVault { .. })
    ));

    write_note(dir.path(), "b/new.md", "fresh\n");
    assert!(ws.find_notes("new", None).unwrap().is_empty());
    let result = ws.reload().unwrap();
    assert_eq!(result.vault_count, 2);
    assert_eq!(result.note_count, 4);
    assert_eq!(ws.find_notes("new", None).unwrap().len(), 1);
}
