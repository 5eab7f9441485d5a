//! The Metadata Index (spec.md §4.3): the path namespace the FUSE layer
//! observes. Pure data structure — the Sync Engine is the only component
//! that mutates it, and is responsible for the invariants in spec.md §3
//! (I1-I6).

use crate::remote::FileRecord;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct MetadataIndex {
    pub path_to_id: HashMap<String, String>,
    pub id_to_record: HashMap<String, FileRecord>,
    pub id_to_children: HashMap<String, Vec<String>>,
}

impl MetadataIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts/overwrites the record at `path`, maintaining I1.
    pub fn insert(&mut self, path: &str, record: FileRecord) {
        self.path_to_id.insert(path.to_string(), record.id.clone());
        self.id_to_record.insert(record.id.clone(), record);
    }

    /// Appends `child_id` to `parent_id`'s child list if not already
    /// present, maintaining I3 (caller must ensure the child's
    /// `parents[0] == parent_id` first).
    pub fn add_child(&mut self, parent_id: &str, child_id: &str) {
        let children = self.id_to_children.entry(parent_id.to_string()).or_default();
        if !children.iter().any(|c| c == child_id) {
            children.push(child_id.to_string());
        }
    }

    pub fn remove_child(&mut self, parent_id: &str, child_id: &str) {
        if let Some(children) = self.id_to_children.get_mut(parent_id) {
            children.retain(|c| c != child_id);
        }
    }

    /// Removes every trace of `path`/`id` from all three maps. Does not
    /// touch `id_to_children[id]`'s own children list caller-side — the
    /// caller is expected to only call this on leaves it has already
    /// detached, or to cascade explicitly.
    pub fn remove_path(&mut self, path: &str) -> Option<FileRecord> {
        let id = self.path_to_id.remove(path)?;
        let record = self.id_to_record.remove(&id);
        if let Some(r) = &record {
            self.remove_child(r.parent_id(), &id);
        }
        self.id_to_children.remove(&id);
        record
    }

    pub fn record_for(&self, id: &str) -> Option<&FileRecord> {
        self.id_to_record.get(id)
    }

    pub fn id_for(&self, path: &str) -> Option<&str> {
        self.path_to_id.get(path).map(String::as_str)
    }

    pub fn has_listed(&self, folder_id: &str) -> bool {
        self.id_to_children.contains_key(folder_id)
    }

    pub fn children_of(&self, folder_id: &str) -> &[String] {
        self.id_to_children
            .get(folder_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `parent_id_of(path)`: spec.md §4.3. The identifier of `path`'s parent
    /// directory, special-cased to `root_id` when the parent is `/`.
    pub fn parent_id_of(&self, path: &str, root_id: &str) -> Option<String> {
        let parent_path = parent_of(path);
        if parent_path.is_empty() || parent_path == "/" {
            return Some(root_id.to_string());
        }
        self.path_to_id.get(&parent_path).cloned()
    }

    /// `path_of(id)`: reverse lookup, linear scan per spec.md §4.3 ("rare
    /// path; no secondary index required unless profiling demands it").
    pub fn path_of(&self, id: &str) -> Option<String> {
        self.path_to_id
            .iter()
            .find(|(_, v)| v.as_str() == id)
            .map(|(k, _)| k.clone())
    }

    /// All paths currently projected under the `/.Trash` view — every
    /// record with `trashed == true` (spec.md §9, open question (a)).
    pub fn trashed_entries(&self) -> Vec<(String, FileRecord)> {
        self.id_to_record
            .values()
            .filter(|r| r.trashed)
            .map(|r| (format!("/.Trash/{}", r.name), r.clone()))
            .collect()
    }
}

/// Parent path of an absolute path, `/`-joined, no trailing separator.
/// `parent_of("/a/b/c") == "/a/b"`, `parent_of("/a") == "/"`.
pub fn parent_of(path: &str) -> String {
    match path.rsplit_once('/') {
        Some(("", _)) => "/".to_string(),
        Some((parent, _)) => parent.to_string(),
        None => "/".to_string(),
    }
}

/// Last path component.
pub fn leaf_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Joins a parent path and a leaf name, handling the root specially so we
/// never produce a doubled `//`.
pub fn join(parent: &str, name: &str) -> String {
    if parent == "/" {
        format!("/{name}")
    } else {
        format!("{parent}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_of_handles_root_children() {
        assert_eq!(parent_of("/A"), "/");
        assert_eq!(parent_of("/F/B"), "/F");
    }

    #[test]
    fn join_avoids_double_slash() {
        assert_eq!(join("/", "A"), "/A");
        assert_eq!(join("/F", "B"), "/F/B");
    }

    #[test]
    fn leaf_of_extracts_last_component() {
        assert_eq!(leaf_of("/F/B"), "B");
        assert_eq!(leaf_of("/A"), "A");
    }
}
