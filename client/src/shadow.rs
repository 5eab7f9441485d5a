//! The Shadow Cache (spec.md §4.4): the on-disk mirror of the remote tree,
//! rooted at a private directory the process owns exclusively for the
//! mount's lifetime.
//!
//! Grounded on the teacher's `fs::cache` module for the "own a resource for
//! the process lifetime" shape, generalized from an in-memory attribute
//! cache to an on-disk directory tree per spec.md §4.4.

use filetime::FileTime;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Owns the shadow cache directory. Refuses to initialize if the directory
/// already exists (spec.md §4.4, §5 "refuses to start if it exists").
pub struct ShadowCache {
    root: PathBuf,
}

impl ShadowCache {
    /// Creates and takes ownership of `root`. Errors if `root` already
    /// exists — a leftover directory from a previous, uncleanly terminated
    /// mount must be removed by hand before trying again.
    pub fn init(root: PathBuf) -> io::Result<Self> {
        if root.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!(
                    "shadow cache directory {} already exists; remove it before mounting",
                    root.display()
                ),
            ));
        }
        fs::create_dir_all(&root)?;
        tracing::debug!(root = %root.display(), "shadow cache initialized");
        Ok(Self { root })
    }

    /// The absolute local path a remote `path` shadows to, with `extra_ext`
    /// (the MIME Translator's extension, if any) appended. This is the
    /// `_lpath` equivalent spec.md §9(b) says `mkdir` must use, rather than
    /// an undefined `_full_path`.
    pub fn local_path(&self, path: &str, extra_ext: Option<&str>) -> PathBuf {
        let relative = path.strip_prefix('/').unwrap_or(path);
        let mut local = self.root.join(relative);
        if let Some(ext) = extra_ext {
            let mut name = local
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_default();
            name.push(ext);
            local.set_file_name(name);
        }
        local
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn mkdir(&self, local: &Path) -> io::Result<()> {
        fs::create_dir_all(local)
    }

    pub fn remove_file(&self, local: &Path) -> io::Result<()> {
        match fs::remove_file(local) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub fn remove_dir(&self, local: &Path) -> io::Result<()> {
        match fs::remove_dir(local) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// `rename` within the shadow cache, creating the new parent directory
    /// first — `move_in_hierarchy` relies on this for both renames and
    /// trash/untrash moves (spec.md §4.6, §4.7).
    pub fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::rename(from, to)
    }

    pub fn write(&self, local: &Path, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = local.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(local, bytes)
    }

    pub fn read(&self, local: &Path) -> io::Result<Vec<u8>> {
        fs::read(local)
    }

    pub fn create_empty_file(&self, local: &Path) -> io::Result<()> {
        if let Some(parent) = local.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(local, [])
    }

    pub fn is_dir_empty(&self, local: &Path) -> io::Result<bool> {
        Ok(fs::read_dir(local)?.next().is_none())
    }

    pub fn metadata(&self, local: &Path) -> io::Result<fs::Metadata> {
        fs::symlink_metadata(local)
    }

    /// Sets access/modification times from a remote record's timestamps
    /// (spec.md §4.4: "Access/modification times are copied from the remote
    /// record").
    pub fn set_times(
        &self,
        local: &Path,
        atime: chrono::DateTime<chrono::Utc>,
        mtime: chrono::DateTime<chrono::Utc>,
    ) -> io::Result<()> {
        let a = FileTime::from_unix_time(atime.timestamp(), atime.timestamp_subsec_nanos());
        let m = FileTime::from_unix_time(mtime.timestamp(), mtime.timestamp_subsec_nanos());
        filetime::set_file_times(local, a, m)
    }

    /// Removes the whole cache directory. Called from `destroy` on
    /// unmount (spec.md §4.4: "On process shutdown, the directory is
    /// removed").
    pub fn teardown(&self) {
        if let Err(e) = fs::remove_dir_all(&self.root) {
            tracing::warn!(root = %self.root.display(), error = %e, "failed to remove shadow cache on shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_to_init_over_existing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("shadow");
        fs::create_dir(&root).unwrap();
        assert!(ShadowCache::init(root).is_err());
    }

    #[test]
    fn local_path_appends_extension_only_locally() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("shadow");
        let cache = ShadowCache::init(root.clone()).unwrap();
        let p = cache.local_path("/A", Some(".odt"));
        assert_eq!(p, root.join("A.odt"));
        let p = cache.local_path("/F/B", None);
        assert_eq!(p, root.join("F/B"));
    }

    #[test]
    fn rename_creates_destination_parent() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("shadow");
        let cache = ShadowCache::init(root).unwrap();
        let a = cache.local_path("/A", None);
        cache.create_empty_file(&a).unwrap();
        let b = cache.local_path("/.Trash/A", None);
        cache.rename(&a, &b).unwrap();
        assert!(b.exists());
        assert!(!a.exists());
    }
}
