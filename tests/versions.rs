use promptsync::PromptSyncError;
use promptsync::core::db::{initialize_instructions_db, instructions_db_path};
use promptsync::core::store::Store;
use promptsync::core::versions::{
    ADMIN_ACTOR, SYSTEM_ACTOR, are_instructions_different, create_version,
    get_active_instructions, get_all_versions, get_version, get_version_count,
    set_active_version,
};
use tempfile::tempdir;

#[test]
fn test_version_lifecycle() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());
    initialize_instructions_db(&store.root).unwrap();

    // 1. Empty store
    assert!(get_active_instructions(&store).unwrap().is_none());
    assert_eq!(get_version_count(&store).unwrap(), 0);
    assert!(are_instructions_different(&store, "anything").unwrap());

    // 2. First version becomes active
    let v1 = create_version(&store, "Be helpful.", "initial", ADMIN_ACTOR).unwrap();
    assert_eq!(v1, 1);
    let active = get_active_instructions(&store).unwrap().unwrap();
    assert_eq!(active.version, 1);
    assert_eq!(active.instructions, "Be helpful.");
    assert_eq!(active.notes, "initial");
    assert_eq!(active.created_by, ADMIN_ACTOR);
    assert!(active.is_active);
    assert!(active.created_date > 0);

    // 3. Second version demotes the first
    let v2 = create_version(&store, "Be concise.", "", SYSTEM_ACTOR).unwrap();
    assert_eq!(v2, 2);
    let active = get_active_instructions(&store).unwrap().unwrap();
    assert_eq!(active.version, 2);
    let first = get_version(&store, 1).unwrap().unwrap();
    assert!(!first.is_active);
    assert_eq!(first.instructions, "Be helpful.");
}

#[test]
fn test_version_numbers_are_strictly_increasing() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());

    let mut last = 0;
    for i in 0..5 {
        let v = create_version(&store, &format!("text {}", i), "", ADMIN_ACTOR).unwrap();
        assert!(v > last);
        last = v;
    }
    assert_eq!(get_version_count(&store).unwrap(), 5);
}

#[test]
fn test_exactly_one_version_is_active() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());

    for i in 0..4 {
        create_version(&store, &format!("text {}", i), "", ADMIN_ACTOR).unwrap();
        let active_count = get_all_versions(&store)
            .unwrap()
            .iter()
            .filter(|v| v.is_active)
            .count();
        assert_eq!(active_count, 1);
    }

    set_active_version(&store, 2).unwrap();
    let all = get_all_versions(&store).unwrap();
    let active: Vec<i64> = all.iter().filter(|v| v.is_active).map(|v| v.version).collect();
    assert_eq!(active, vec![2]);
}

#[test]
fn test_set_active_version_missing_is_not_found() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());
    create_version(&store, "text", "", ADMIN_ACTOR).unwrap();

    let err = set_active_version(&store, 42).unwrap_err();
    assert!(matches!(err, PromptSyncError::NotFound(_)));

    // The failed repoint left the active pointer alone.
    assert_eq!(get_active_instructions(&store).unwrap().unwrap().version, 1);
}

#[test]
fn test_set_active_version_repoints_without_growing_history() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());
    create_version(&store, "A", "", ADMIN_ACTOR).unwrap();
    create_version(&store, "B", "", ADMIN_ACTOR).unwrap();

    set_active_version(&store, 1).unwrap();

    let active = get_active_instructions(&store).unwrap().unwrap();
    assert_eq!(active.version, 1);
    assert_eq!(active.instructions, "A");
    assert_eq!(get_version_count(&store).unwrap(), 2);
}

#[test]
fn test_are_instructions_different_compares_bytes() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());
    create_version(&store, "Be helpful.", "", ADMIN_ACTOR).unwrap();

    assert!(!are_instructions_different(&store, "Be helpful.").unwrap());
    assert!(are_instructions_different(&store, "Be helpful. ").unwrap());
    assert!(are_instructions_different(&store, "be helpful.").unwrap());
}

#[test]
fn test_get_all_versions_in_creation_order() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());
    for text in ["one", "two", "three"] {
        create_version(&store, text, "", ADMIN_ACTOR).unwrap();
    }
    // Repointing does not reorder history.
    set_active_version(&store, 1).unwrap();

    let all = get_all_versions(&store).unwrap();
    let texts: Vec<&str> = all.iter().map(|v| v.instructions.as_str()).collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
}

#[test]
fn test_mutations_append_audit_events() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());
    initialize_instructions_db(&store.root).unwrap();
    create_version(&store, "text", "", ADMIN_ACTOR).unwrap();

    assert!(instructions_db_path(&store.root).exists());
    let log = std::fs::read_to_string(store.root.join("instructions.events.jsonl")).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert!(lines.len() >= 2);
    for line in lines {
        let ev: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(ev["status"], "success");
        assert!(ev["event_id"].is_string());
        assert!(ev["op"].is_string());
    }
}
