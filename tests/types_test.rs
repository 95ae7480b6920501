use std::collections::HashMap;

use serde_json::json;
use vaultnav::errors::GotoError;
use vaultnav::types::*;

fn sample_note(custom: HashMap<String, serde_json::Value>) -> Note {
    Note {
        id: "n1".to_string(),
        fname: "bar".to_string(),
        title: "Bar".to_string(),
        desc: String::new(),
        vault: Vault {
            name: "main".to_string(),
            fs_path: "main".to_string(),
        },
        path: "bar.md".to_string(),
        custom,
    }
}

#[test]
fn test_target_kind_roundtrip() {
    for kind in [TargetKind::Note, TargetKind::Link] {
        assert_eq!(TargetKind::from_str(kind.as_str()), Some(kind));
    }
    assert_eq!(TargetKind::from_str("folder"), None);
}

#[test]
fn test_goto_target_serialization() {
    let link = GotoTarget::Link {
        full_path: "https://example.com".to_string(),
    };
    assert_eq!(
        serde_json::to_value(&link).unwrap(),
        json!({ "kind": "link", "full_path": "https://example.com" })
    );

    let note = GotoTarget::Note {
        note_path: "/ws/main/bar.md".to_string(),
        anchor: None,
    };
    assert_eq!(
        serde_json::to_value(&note).unwrap(),
        json!({ "kind": "note", "note_path": "/ws/main/bar.md" })
    );
    assert_eq!(note.kind(), TargetKind::Note);
    assert_eq!(note.location(), "/ws/main/bar.md");
}

#[test]
fn test_response_envelope_has_exactly_one_field() {
    let ok = GotoResponse::success(GotoTarget::Link {
        full_path: "https://example.com".to_string(),
    });
    assert!(ok.is_success());
    assert!(ok.error().is_none());
    let value = serde_json::to_value(&ok).unwrap();
    assert!(value.get("data").is_some());
    assert!(value.get("error").is_none());

    let failed = GotoResponse::failure(GotoError::not_a_link());
    assert!(!failed.is_success());
    assert!(failed.data().is_none());
    assert_eq!(
        serde_json::to_value(&failed).unwrap(),
        json!({ "error": { "kind": "not_a_link", "message": "selection is not a valid link" } })
    );
    assert_eq!(failed.into_result(), Err(GotoError::not_a_link()));
}

#[test]
fn test_goto_uri_accessor() {
    let plain = sample_note(HashMap::new());
    assert!(plain.custom_value(GOTO_KEY).is_none());
    assert!(plain.goto_uri().is_none());

    let mut custom = HashMap::new();
    custom.insert(GOTO_KEY.to_string(), json!("https://example.com"));
    let linked = sample_note(custom);
    assert_eq!(linked.goto_uri().as_deref(), Some("https://example.com"));
}

#[test]
fn test_link_descriptor_builders() {
    let link = LinkDescriptor::new("proj.todo")
        .with_vault("work")
        .with_anchor("today");
    assert_eq!(link.value, "proj.todo");
    assert_eq!(link.vault_name.as_deref(), Some("work"));
    assert_eq!(link.anchor_header.as_deref(), Some("today"));
    assert!(link.alias.is_none());
}

#[test]
fn test_generate_note_id_deterministic() {
    let id1 = generate_note_id("main", "bar");
    let id2 = generate_note_id("main", "bar");
    assert_eq!(id1, id2);
    assert_eq!(id1.len(), 23);
    assert_ne!(id1, generate_note_id("other", "bar"));
}
