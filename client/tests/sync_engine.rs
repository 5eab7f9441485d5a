//! End-to-end scenarios against the Sync Engine with the remote mocked
//! (spec.md §8). Exercises `SyncEngine` the way `fs/` handlers do, but
//! directly, since driving this through an actual FUSE mount needs a
//! kernel module the test environment doesn't have.

use chrono::Utc;
use cloudfs_client::config::Config;
use cloudfs_client::engine::SyncEngine;
use cloudfs_client::mime::MimeTranslator;
use cloudfs_client::remote::mock::{MockRemote, ROOT_ID};
use cloudfs_client::remote::{FileRecord, FOLDER_MIME};
use cloudfs_client::shadow::ShadowCache;

fn new_engine(remote: MockRemote, root: std::path::PathBuf) -> SyncEngine<MockRemote> {
    let cache = ShadowCache::init(root).unwrap();
    let mime = MimeTranslator::default_table();
    SyncEngine::new(remote, cache, mime, ROOT_ID.to_string(), &Config::default()).unwrap()
}

fn record(id: &str, name: &str, mime: &str, parent: &str) -> FileRecord {
    let now = Utc::now();
    FileRecord {
        id: id.to_string(),
        name: name.to_string(),
        mime: mime.to_string(),
        parents: vec![parent.to_string()],
        mtime: now,
        atime: now,
        ctime: now,
        trashed: false,
        size: 0,
    }
}

fn seed_two_level_tree(remote: &MockRemote) {
    remote.seed(record("f1", "F", FOLDER_MIME, ROOT_ID), None);
    remote.seed(
        record("a1", "A", "application/vnd.google-apps.document", ROOT_ID),
        Some(b"doc".to_vec()),
    );
    remote.seed(record("b1", "B", "text/plain", "f1"), Some(b"hello".to_vec()));
}

/// Scenario 1: crawl a two-level tree.
#[test]
fn scenario_crawl_two_level_tree() {
    let tmp = tempfile::tempdir().unwrap();
    let remote = MockRemote::new();
    seed_two_level_tree(&remote);
    let engine = new_engine(remote, tmp.path().join("shadow"));

    assert_eq!(engine.index().id_for("/A"), Some("a1"));
    assert_eq!(engine.index().id_for("/F"), Some("f1"));
    assert_eq!(engine.index().id_for("/F/B"), Some("b1"));
    assert!(engine.shadow_root().join("A.odt").is_file());
    assert!(engine.shadow_root().join("F").is_dir());
    assert!(engine.shadow_root().join("F/B").is_file());
    assert_eq!(std::fs::read(engine.shadow_root().join("F/B")).unwrap(), b"hello");
}

/// Scenario 2: a remote rename is picked up by `refresh` and the shadow
/// file follows it, extension included (I6).
#[test]
fn scenario_remote_rename_relocates_shadow() {
    let tmp = tempfile::tempdir().unwrap();
    let remote = MockRemote::new();
    seed_two_level_tree(&remote);
    let mut engine = new_engine(remote, tmp.path().join("shadow"));

    engine_mutate(&engine, "a1", |r| r.name = "A2".to_string());
    engine.refresh("/A").unwrap();

    assert_eq!(engine.index().id_for("/A2"), Some("a1"));
    assert!(engine.index().id_for("/A").is_none());
    assert!(engine.shadow_root().join("A2.odt").is_file());
    assert!(!engine.shadow_root().join("A.odt").exists());
}

/// Scenario 3 / P5: unlink trashes, a second unlink purges.
#[test]
fn scenario_trash_then_purge() {
    let tmp = tempfile::tempdir().unwrap();
    let remote = MockRemote::new();
    seed_two_level_tree(&remote);
    let mut engine = new_engine(remote, tmp.path().join("shadow"));

    engine.unlink("/F/B").unwrap();
    assert!(engine.index().id_for("/F/B").is_none());
    assert_eq!(engine.index().id_for("/.Trash/B"), Some("b1"));
    assert!(!engine.index().children_of("f1").contains(&"b1".to_string()));

    engine.unlink("/.Trash/B").unwrap();
    assert!(engine.index().id_for("/.Trash/B").is_none());
    assert!(engine.index().record_for("b1").is_none());
}

/// Scenario 4: an external delete is only observed on the next `refresh`,
/// not before.
#[test]
fn scenario_concurrent_external_delete() {
    let tmp = tempfile::tempdir().unwrap();
    let remote = MockRemote::new();
    seed_two_level_tree(&remote);
    let mut engine = new_engine(remote, tmp.path().join("shadow"));

    engine_forget(&engine, "a1");
    // Shadow/index entry is still present until the next refresh observes
    // the remote's gone-ness.
    assert!(engine.local_path_of("/A").unwrap().exists());

    engine.refresh("/A").unwrap();
    assert!(engine.index().id_for("/A").is_none());
    assert!(engine.local_path_of("/A").is_err());
}

/// Scenario 5 / P6: write + release uploads and advances remote mtime.
#[test]
fn scenario_overwrite_uploads_on_release() {
    let tmp = tempfile::tempdir().unwrap();
    let remote = MockRemote::new();
    seed_two_level_tree(&remote);
    let mut engine = new_engine(remote, tmp.path().join("shadow"));

    let before = engine.index().record_for("b1").unwrap().mtime;
    let fh = engine.open("/F/B").unwrap();
    engine.write("/F/B", 0, b"hello").unwrap();
    engine.release("/F/B", fh).unwrap();

    let contents = std::fs::read(engine.shadow_root().join("F/B")).unwrap();
    assert_eq!(contents, b"hello");
    let after = engine.index().record_for("b1").unwrap().mtime;
    assert!(after >= before);
}

/// Scenario 6: rename across directories updates children lists on both
/// sides and moves the shadow file.
#[test]
fn scenario_rename_across_directories() {
    let tmp = tempfile::tempdir().unwrap();
    let remote = MockRemote::new();
    seed_two_level_tree(&remote);
    let mut engine = new_engine(remote, tmp.path().join("shadow"));

    engine.rename("/F/B", "/C").unwrap();
    assert_eq!(engine.index().id_for("/C"), Some("b1"));
    assert!(!engine.index().children_of("f1").contains(&"b1".to_string()));
    assert!(engine.index().children_of(ROOT_ID).contains(&"b1".to_string()));
    assert!(engine.shadow_root().join("C").is_file());
    assert!(!engine.shadow_root().join("F/B").exists());
}

/// P4: a rename followed by the inverse rename restores the index.
#[test]
fn property_rename_round_trip_restores_index() {
    let tmp = tempfile::tempdir().unwrap();
    let remote = MockRemote::new();
    seed_two_level_tree(&remote);
    let mut engine = new_engine(remote, tmp.path().join("shadow"));

    engine.rename("/F/B", "/C").unwrap();
    engine.rename("/C", "/F/B").unwrap();

    assert_eq!(engine.index().id_for("/F/B"), Some("b1"));
    assert!(engine.index().id_for("/C").is_none());
    assert!(engine.index().children_of("f1").contains(&"b1".to_string()));
    assert!(engine.shadow_root().join("F/B").is_file());
}

/// P3: refreshing a path twice with no remote change is a no-op the second
/// time (same index entry, same shadow file).
#[test]
fn property_refresh_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    let remote = MockRemote::new();
    seed_two_level_tree(&remote);
    let mut engine = new_engine(remote, tmp.path().join("shadow"));

    engine.refresh("/A").unwrap();
    let id_after_first = engine.index().id_for("/A").map(str::to_string);
    engine.refresh("/A").unwrap();
    let id_after_second = engine.index().id_for("/A").map(str::to_string);

    assert_eq!(id_after_first, id_after_second);
    assert!(engine.shadow_root().join("A.odt").is_file());
}

/// P2: every cached path has a stat-able shadow file.
#[test]
fn property_every_cached_path_has_shadow_entry() {
    let tmp = tempfile::tempdir().unwrap();
    let remote = MockRemote::new();
    seed_two_level_tree(&remote);
    let engine = new_engine(remote, tmp.path().join("shadow"));

    for path in ["/A", "/F", "/F/B"] {
        let local = engine.local_path_of(path).unwrap();
        assert!(local.exists(), "{path} should have a shadow entry");
    }
}

// Test-only helpers reaching into `MockRemote` to simulate out-of-band
// remote changes, mirroring how `engine.rs`'s own unit tests drive it.
fn engine_mutate(engine: &SyncEngine<MockRemote>, id: &str, f: impl FnOnce(&mut FileRecord)) {
    engine.remote().mutate(id, f);
}

fn engine_forget(engine: &SyncEngine<MockRemote>, id: &str) {
    engine.remote().forget(id);
}
