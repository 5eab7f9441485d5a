//! `MockRemote`: an in-process fake of the Remote API Facade, backed by
//! in-memory maps instead of HTTP. This is what spec.md §8's "remote
//! mocked" scenarios and properties (P1-P6) are tested against, and what
//! `Scenario::new` in `tests/sync_engine.rs` drives directly.
//!
//! It also doubles as the reference for `cloudfs-mock-remote`'s handlers —
//! the query grammar, id generation, and trash semantics here are exactly
//! what that HTTP fixture implements over the wire.

use super::{FileRecord, RecordPatch, RemoteApi, FOLDER_MIME};
use crate::errors::RemoteError;
use chrono::Utc;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

pub const ROOT_ID: &str = "root";

struct State {
    records: HashMap<String, FileRecord>,
    content: HashMap<String, Vec<u8>>,
    next_id: u64,
}

pub struct MockRemote {
    state: Mutex<State>,
}

impl Default for MockRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRemote {
    pub fn new() -> Self {
        let now = Utc::now();
        let mut records = HashMap::new();
        records.insert(
            ROOT_ID.to_string(),
            FileRecord {
                id: ROOT_ID.to_string(),
                name: "".to_string(),
                mime: FOLDER_MIME.to_string(),
                parents: vec![],
                mtime: now,
                atime: now,
                ctime: now,
                trashed: false,
                size: 0,
            },
        );
        Self {
            state: Mutex::new(State {
                records,
                content: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Test helper: seed a record (and optional content) directly, bypassing
    /// `create`, to build fixtures like spec.md §8 scenario 1's two-level
    /// tree in one shot.
    pub fn seed(&self, record: FileRecord, content: Option<Vec<u8>>) {
        let mut state = self.state.lock().unwrap();
        if let Some(bytes) = content {
            state.content.insert(record.id.clone(), bytes);
        }
        state.records.insert(record.id.clone(), record);
    }

    /// Test helper: mutate a seeded record's remote state directly,
    /// simulating an out-of-band change (another client renaming, trashing,
    /// or deleting the file) without going through this facade's own
    /// mutation methods.
    pub fn mutate(&self, id: &str, f: impl FnOnce(&mut FileRecord)) {
        let mut state = self.state.lock().unwrap();
        if let Some(r) = state.records.get_mut(id) {
            f(r);
        }
    }

    pub fn forget(&self, id: &str) {
        let mut state = self.state.lock().unwrap();
        state.records.remove(id);
        state.content.remove(id);
    }

    fn gen_id(state: &mut State) -> String {
        let id = format!("m{}", state.next_id);
        state.next_id += 1;
        id
    }

    /// Minimal evaluator for the `"'<id>' in parents"` /
    /// `"name = '<name>'"` / `"name = '<name>' and '<id>' in parents"`
    /// query grammar spec.md §4.5/§4.6 use.
    fn matches(record: &FileRecord, clause: &str) -> bool {
        let clause = clause.trim();
        if let Some(rest) = clause.strip_prefix('\'') {
            // "'<id>' in parents"
            let end = rest.find('\'').unwrap_or(rest.len());
            let id = &rest[..end];
            record.parents.iter().any(|p| p == id)
        } else if let Some(rest) = clause.strip_prefix("name = '") {
            let end = rest.find('\'').unwrap_or(rest.len());
            let name = &rest[..end];
            record.name == name
        } else {
            false
        }
    }

    fn eval_query(record: &FileRecord, q: &str) -> bool {
        match q.split(" and ").map(str::trim).collect::<Vec<_>>().as_slice() {
            [single] => Self::matches(record, single),
            [a, b] => Self::matches(record, a) && Self::matches(record, b),
            _ => false,
        }
    }
}

#[async_trait::async_trait]
impl RemoteApi for MockRemote {
    async fn query(&self, q: &str) -> Result<Vec<FileRecord>, RemoteError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .records
            .values()
            .filter(|r| Self::eval_query(r, q))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> Result<FileRecord, RemoteError> {
        let state = self.state.lock().unwrap();
        state.records.get(id).cloned().ok_or(RemoteError::Gone)
    }

    async fn create(
        &self,
        name: &str,
        parent: &str,
        is_dir: bool,
        in_trash: bool,
    ) -> Result<FileRecord, RemoteError> {
        let mut state = self.state.lock().unwrap();
        let id = Self::gen_id(&mut state);
        let now = Utc::now();
        let record = FileRecord {
            id: id.clone(),
            name: name.to_string(),
            mime: if is_dir {
                FOLDER_MIME.to_string()
            } else {
                "application/octet-stream".to_string()
            },
            parents: vec![parent.to_string()],
            mtime: now,
            atime: now,
            ctime: now,
            trashed: in_trash,
            size: 0,
        };
        state.records.insert(id.clone(), record.clone());
        if !is_dir {
            state.content.insert(id, Vec::new());
        }
        Ok(record)
    }

    async fn update(&self, id: &str, patch: RecordPatch) -> Result<FileRecord, RemoteError> {
        let mut state = self.state.lock().unwrap();
        let record = state.records.get_mut(id).ok_or(RemoteError::Gone)?;
        if let Some(name) = patch.name {
            record.name = name;
        }
        if let Some(trashed) = patch.trashed {
            record.trashed = trashed;
        }
        if let Some(parents) = patch.parents {
            record.parents = parents;
        }
        record.mtime = Utc::now();
        Ok(record.clone())
    }

    async fn reparent(
        &self,
        id: &str,
        _old_parent: &str,
        new_parent: &str,
    ) -> Result<FileRecord, RemoteError> {
        let mut state = self.state.lock().unwrap();
        let record = state.records.get_mut(id).ok_or(RemoteError::Gone)?;
        record.parents = vec![new_parent.to_string()];
        record.mtime = Utc::now();
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        let mut state = self.state.lock().unwrap();
        if state.records.remove(id).is_none() {
            return Err(RemoteError::Gone);
        }
        state.content.remove(id);
        Ok(())
    }

    async fn download(
        &self,
        record: &FileRecord,
        _export_mime: Option<&str>,
        local_path: &Path,
    ) -> Result<(), RemoteError> {
        let bytes = {
            let state = self.state.lock().unwrap();
            state.content.get(&record.id).cloned().unwrap_or_default()
        };
        if let Some(parent) = local_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| RemoteError::Malformed(e.to_string()))?;
        }
        std::fs::write(local_path, bytes).map_err(|e| RemoteError::Malformed(e.to_string()))
    }

    async fn upload(&self, local_path: &Path, id: &str) -> Result<FileRecord, RemoteError> {
        let bytes =
            std::fs::read(local_path).map_err(|e| RemoteError::Malformed(e.to_string()))?;
        let mut state = self.state.lock().unwrap();
        let size = bytes.len() as u64;
        state.content.insert(id.to_string(), bytes);
        let record = state.records.get_mut(id).ok_or(RemoteError::Gone)?;
        record.mtime = Utc::now();
        record.size = size;
        Ok(record.clone())
    }
}
