//! FUSE-facing inode↔path table.
//!
//! The kernel needs stable `u64` inode numbers; the Sync Engine's Metadata
//! Index is path/identifier addressed (spec.md §4.3) and knows nothing
//! about inodes. This is a separate, FUSE-only concern layered on top, the
//! way the teacher's `RemoteFS` kept `inode_to_path`/`path_to_inode` maps —
//! generalized here to track the kernel's view of the *current* path rather
//! than the remote identifier directly, since a path can be renamed and
//! trashed out from under an inode the kernel still holds open.

use std::collections::HashMap;

pub const ROOT_INODE: u64 = 1;

#[derive(Default)]
pub struct InodeTable {
    inode_to_path: HashMap<u64, String>,
    path_to_inode: HashMap<String, u64>,
    next_inode: u64,
}

impl InodeTable {
    pub fn new() -> Self {
        let mut table = Self {
            inode_to_path: HashMap::new(),
            path_to_inode: HashMap::new(),
            next_inode: ROOT_INODE + 1,
        };
        table.inode_to_path.insert(ROOT_INODE, "/".to_string());
        table.path_to_inode.insert("/".to_string(), ROOT_INODE);
        table
    }

    /// Returns the inode for `path`, assigning a fresh one if this is the
    /// first time the path has been observed.
    pub fn ino_for(&mut self, path: &str) -> u64 {
        if let Some(ino) = self.path_to_inode.get(path) {
            return *ino;
        }
        let ino = self.next_inode;
        self.next_inode += 1;
        self.inode_to_path.insert(ino, path.to_string());
        self.path_to_inode.insert(path.to_string(), ino);
        ino
    }

    pub fn path_for(&self, ino: u64) -> Option<&str> {
        self.inode_to_path.get(&ino).map(String::as_str)
    }

    /// Re-points `old` to `new` without changing the inode number, so a
    /// kernel-held inode survives a rename (spec.md §8 P4).
    pub fn rename(&mut self, old: &str, new: &str) {
        if let Some(ino) = self.path_to_inode.remove(old) {
            self.inode_to_path.insert(ino, new.to_string());
            self.path_to_inode.insert(new.to_string(), ino);
        }
    }

    pub fn forget_path(&mut self, path: &str) {
        if let Some(ino) = self.path_to_inode.remove(path) {
            self.inode_to_path.remove(&ino);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_preassigned() {
        let mut t = InodeTable::new();
        assert_eq!(t.ino_for("/"), ROOT_INODE);
        assert_eq!(t.path_for(ROOT_INODE), Some("/"));
    }

    #[test]
    fn rename_preserves_inode_number() {
        let mut t = InodeTable::new();
        let ino = t.ino_for("/A");
        t.rename("/A", "/B");
        assert_eq!(t.ino_for("/B"), ino);
        assert!(t.path_for(ino) == Some("/B"));
    }
}
