//! Wire types for the mock remote service. Mirrors the shape the client's
//! `remote::FileRecord`/`RecordPatch` (de)serialize to, kept as independent
//! definitions here since this fixture has no compile-time dependency on
//! the client crate — only the JSON contract is shared.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const FOLDER_MIME: &str = "application/vnd.google-apps.folder";
pub const ROOT_ID: &str = "root";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: String,
    pub name: String,
    pub mime: String,
    pub parents: Vec<String>,
    pub mtime: DateTime<Utc>,
    pub atime: DateTime<Utc>,
    pub ctime: DateTime<Utc>,
    pub trashed: bool,
    #[serde(default)]
    pub size: u64,
}

impl FileRecord {
    pub fn is_folder(&self) -> bool {
        self.mime == FOLDER_MIME
    }

    pub fn parent_id(&self) -> &str {
        self.parents.first().map(String::as_str).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordPatch {
    pub name: Option<String>,
    pub trashed: Option<bool>,
    pub parents: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub name: String,
    pub parent: String,
    pub is_dir: bool,
    #[serde(default)]
    pub in_trash: bool,
}

#[derive(Debug, Deserialize)]
pub struct ReparentRequest {
    #[allow(dead_code)]
    pub old_parent: String,
    pub new_parent: String,
}

#[derive(Debug, Deserialize)]
pub struct QueryParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct DownloadParams {
    #[serde(default)]
    pub export: Option<String>,
}
