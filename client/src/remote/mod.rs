//! The Remote API Facade (spec.md §4.2).
//!
//! A narrow, synchronous-from-the-caller's-perspective interface over the
//! cloud service. `RemoteApi` is the trait the Sync Engine programs against;
//! `http::HttpRemote` is the only production implementation, and
//! `mock::MockRemote` is an in-process fake used by the engine's own tests
//! (the "remote mocked" scenarios from spec.md §8). OAuth negotiation and
//! chunked transport live outside this facade per spec.md §1.

pub mod http;
pub mod mock;

use crate::errors::RemoteError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The distinguished MIME type that marks a `FileRecord` as a folder.
/// Folders are never passed through the MIME Translator (spec.md §4.1).
pub const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

/// A value object describing one remote file (spec.md §3 `FileRecord`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileRecord {
    pub id: String,
    pub name: String,
    pub mime: String,
    /// Non-empty; `parents[0]` is authoritative (single-parent system).
    pub parents: Vec<String>,
    pub mtime: DateTime<Utc>,
    pub atime: DateTime<Utc>,
    pub ctime: DateTime<Utc>,
    pub trashed: bool,
    /// Size in bytes; 0 for folders. Not part of spec.md's minimal field
    /// list but needed to size `getattr` replies without a round trip.
    #[serde(default)]
    pub size: u64,
}

impl FileRecord {
    pub fn is_folder(&self) -> bool {
        self.mime == FOLDER_MIME
    }

    /// `parents[0]`, the authoritative parent per spec.md §3.
    pub fn parent_id(&self) -> &str {
        self.parents
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// Partial update applied via `update(id, patch)`. Only `Some` fields are
/// sent; this mirrors a PATCH semantics rather than a full record replace,
/// since the Sync Engine only ever flips `trashed` and reparents via this
/// path (renames are also modeled as a metadata patch of `name`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trashed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parents: Option<Vec<String>>,
}

/// The narrow Remote API Facade contract from spec.md §4.2.
///
/// Every method is `async` because the underlying transport is; the Sync
/// Engine (which runs on FUSE's synchronous callback threads) drives these
/// with `Runtime::block_on` on its single cooperative thread (spec.md §5).
#[async_trait::async_trait]
pub trait RemoteApi: Send + Sync {
    /// `query(q)`: remote query string -> list of `FileRecord`s. Queries are
    /// small boolean expressions over `name` and `parents`, e.g.
    /// `"'f1' in parents"` or `"name = 'B' and 'f1' in parents"`.
    async fn query(&self, q: &str) -> Result<Vec<FileRecord>, RemoteError>;

    /// `get(id)`: identifier -> record, or `RemoteError::Gone` if the
    /// identifier no longer resolves remotely.
    async fn get(&self, id: &str) -> Result<FileRecord, RemoteError>;

    /// `create(name, parent, is_dir, in_trash)` -> new `FileRecord`.
    async fn create(
        &self,
        name: &str,
        parent: &str,
        is_dir: bool,
        in_trash: bool,
    ) -> Result<FileRecord, RemoteError>;

    /// `update(id, patch)` -> new `FileRecord`.
    async fn update(&self, id: &str, patch: RecordPatch) -> Result<FileRecord, RemoteError>;

    /// `reparent(id, old_parent, new_parent)` -> new `FileRecord`.
    async fn reparent(
        &self,
        id: &str,
        old_parent: &str,
        new_parent: &str,
    ) -> Result<FileRecord, RemoteError>;

    /// `delete(id)`: permanent delete.
    async fn delete(&self, id: &str) -> Result<(), RemoteError>;

    /// `download(record, local_path)`. Implementations MUST consult the MIME
    /// Translator: a native-document `record.mime` is exported to the
    /// translated MIME, otherwise raw bytes are fetched verbatim. Folders
    /// are never passed here (the engine `mkdir`s locally instead).
    async fn download(
        &self,
        record: &FileRecord,
        export_mime: Option<&str>,
        local_path: &std::path::Path,
    ) -> Result<(), RemoteError>;

    /// `upload(local_path, id)` -> new `FileRecord` (with refreshed mtime).
    async fn upload(
        &self,
        local_path: &std::path::Path,
        id: &str,
    ) -> Result<FileRecord, RemoteError>;
}
