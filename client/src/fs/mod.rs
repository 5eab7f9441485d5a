//! Root of the FUSE filesystem implementation.
//!
//! `RemoteFS` holds the `SyncEngine` (the Metadata Index, Shadow Cache, and
//! Remote API Facade live inside it) plus the FUSE-only inode table and
//! kernel attribute cache. The `impl Filesystem` block on `FsWrapper` is a
//! thin dispatcher that forwards each kernel callback to the matching
//! sub-module, exactly as the teacher structures it.

use crate::config::Config;
use crate::engine::SyncEngine;
use crate::errors::EngineError;
use crate::remote::{FileRecord, RemoteApi};
use fuser::{FileAttr, FileType, Filesystem, ReplyAttr, ReplyCreate, ReplyData, ReplyDirectory,
    ReplyEmpty, ReplyEntry, ReplyOpen, ReplyWrite, ReplyXattr, Request};
use std::ffi::OsStr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub mod cache;
pub mod inode;
pub mod prelude;
mod attr;
mod create;
mod delete;
mod read;
mod rename;
mod write;
mod xattr;

use cache::AttributeCache;
use inode::InodeTable;

/// Default Time-To-Live for FUSE kernel attribute/entry caches, overridden
/// per-mount by `Config::kernel_attr_timeout_seconds`.
pub const TTL: Duration = Duration::from_secs(1);

pub struct RemoteFS<R: RemoteApi> {
    pub(crate) engine: SyncEngine<R>,
    pub(crate) inodes: InodeTable,
    pub(crate) attribute_cache: AttributeCache,
    pub(crate) config: Config,
}

impl<R: RemoteApi> RemoteFS<R> {
    pub fn new(engine: SyncEngine<R>, config: Config) -> Self {
        Self {
            engine,
            inodes: InodeTable::new(),
            attribute_cache: AttributeCache::new(&config),
            config,
        }
    }

    /// Looks up the path the kernel's `ino` currently refers to.
    pub(crate) fn path_of(&self, ino: u64) -> Option<String> {
        self.inodes.path_for(ino).map(str::to_string)
    }

    pub(crate) fn record_for_ino(&self, ino: u64) -> Result<(String, FileRecord), EngineError> {
        let path = self
            .path_of(ino)
            .ok_or_else(|| EngineError::NotFound(format!("inode {ino}")))?;
        let record = self
            .engine
            .index()
            .record_for(
                self.engine
                    .index()
                    .id_for(&path)
                    .ok_or_else(|| EngineError::NotFound(path.clone()))?,
            )
            .cloned()
            .ok_or_else(|| EngineError::NotFound(path.clone()))?;
        Ok((path, record))
    }

    /// Builds a `fuser::FileAttr` for `record`/`ino`, sizing it from the
    /// shadow file on disk (which may be ahead of `record.size` between a
    /// local `write` and the next `flush`'s upload).
    pub(crate) fn build_attr(&self, ino: u64, path: &str, record: &FileRecord, req: &Request) -> FileAttr {
        let kind = if record.is_folder() {
            FileType::Directory
        } else {
            FileType::RegularFile
        };
        let size = if record.is_folder() {
            0
        } else {
            self.engine
                .local_path_of(path)
                .ok()
                .and_then(|p| std::fs::metadata(p).ok())
                .map(|m| m.len())
                .unwrap_or(record.size)
        };
        FileAttr {
            ino,
            size,
            blocks: size.div_ceil(512),
            atime: to_systemtime(record.atime),
            mtime: to_systemtime(record.mtime),
            ctime: to_systemtime(record.ctime),
            crtime: to_systemtime(record.ctime),
            kind,
            perm: if record.is_folder() { 0o755 } else { 0o644 },
            nlink: if record.is_folder() { 2 } else { 1 },
            uid: req.uid(),
            gid: req.gid(),
            rdev: 0,
            blksize: 4096,
            flags: 0,
        }
    }

}

fn to_systemtime(dt: chrono::DateTime<chrono::Utc>) -> SystemTime {
    let secs = dt.timestamp();
    if secs >= 0 {
        UNIX_EPOCH + Duration::new(secs as u64, dt.timestamp_subsec_nanos())
    } else {
        UNIX_EPOCH - Duration::new((-secs) as u64, 0)
    }
}

/// `EngineError` -> libc errno, shared by every handler module.
pub(crate) fn errno(e: &EngineError) -> i32 {
    e.to_errno()
}

#[derive(Clone)]
pub struct FsWrapper<R: RemoteApi>(pub Arc<Mutex<RemoteFS<R>>>);

impl<R: RemoteApi + 'static> Filesystem for FsWrapper<R> {
    fn getattr(&mut self, req: &Request, ino: u64, reply: ReplyAttr) {
        let mut fs = self.0.lock().unwrap();
        attr::getattr(&mut fs, req, ino, reply);
    }

    #[allow(clippy::too_many_arguments)]
    fn setattr(
        &mut self,
        req: &Request<'_>,
        ino: u64,
        mode: Option<u32>,
        uid: Option<u32>,
        gid: Option<u32>,
        size: Option<u64>,
        atime: Option<fuser::TimeOrNow>,
        mtime: Option<fuser::TimeOrNow>,
        ctime: Option<SystemTime>,
        fh: Option<u64>,
        crtime: Option<SystemTime>,
        chgtime: Option<SystemTime>,
        bkuptime: Option<SystemTime>,
        flags: Option<u32>,
        reply: ReplyAttr,
    ) {
        let mut fs = self.0.lock().unwrap();
        attr::setattr(
            &mut fs, req, ino, mode, uid, gid, size, atime, mtime, ctime, fh, crtime, chgtime,
            bkuptime, flags, reply,
        );
    }

    fn lookup(&mut self, req: &Request, parent: u64, name: &OsStr, reply: ReplyEntry) {
        let mut fs = self.0.lock().unwrap();
        read::lookup(&mut fs, req, parent, name, reply);
    }

    fn readdir(&mut self, req: &Request, ino: u64, fh: u64, offset: i64, reply: ReplyDirectory) {
        let mut fs = self.0.lock().unwrap();
        read::readdir(&mut fs, req, ino, fh, offset, reply);
    }

    #[allow(clippy::too_many_arguments)]
    fn read(
        &mut self,
        req: &Request<'_>,
        ino: u64,
        fh: u64,
        offset: i64,
        size: u32,
        flags: i32,
        lock_owner: Option<u64>,
        reply: ReplyData,
    ) {
        let mut fs = self.0.lock().unwrap();
        read::read(&mut fs, req, ino, fh, offset, size, flags, lock_owner, reply);
    }

    fn open(&mut self, req: &Request<'_>, ino: u64, flags: i32, reply: ReplyOpen) {
        let mut fs = self.0.lock().unwrap();
        read::open(&mut fs, req, ino, flags, reply);
    }

    fn readlink(&mut self, _req: &Request<'_>, _ino: u64, reply: ReplyData) {
        reply.error(libc::ENOSYS);
    }

    #[allow(clippy::too_many_arguments)]
    fn write(
        &mut self,
        req: &Request<'_>,
        ino: u64,
        fh: u64,
        offset: i64,
        data: &[u8],
        write_flags: u32,
        flags: i32,
        lock_owner: Option<u64>,
        reply: ReplyWrite,
    ) {
        let mut fs = self.0.lock().unwrap();
        write::write(&mut fs, req, ino, fh, offset, data, write_flags, flags, lock_owner, reply);
    }

    fn release(
        &mut self,
        req: &Request<'_>,
        ino: u64,
        fh: u64,
        flags: i32,
        lock_owner: Option<u64>,
        flush: bool,
        reply: ReplyEmpty,
    ) {
        let mut fs = self.0.lock().unwrap();
        write::release(&mut fs, req, ino, fh, flags, lock_owner, flush, reply);
    }

    fn flush(&mut self, req: &Request<'_>, ino: u64, fh: u64, lock_owner: u64, reply: ReplyEmpty) {
        let mut fs = self.0.lock().unwrap();
        write::flush(&mut fs, req, ino, fh, lock_owner, reply);
    }

    fn fsync(&mut self, req: &Request<'_>, ino: u64, fh: u64, datasync: bool, reply: ReplyEmpty) {
        let mut fs = self.0.lock().unwrap();
        write::fsync(&mut fs, req, ino, fh, datasync, reply);
    }

    fn create(
        &mut self,
        req: &Request<'_>,
        parent: u64,
        name: &OsStr,
        mode: u32,
        umask: u32,
        flags: i32,
        reply: ReplyCreate,
    ) {
        let mut fs = self.0.lock().unwrap();
        create::create(&mut fs, req, parent, name, mode, umask, flags, reply);
    }

    fn mknod(
        &mut self,
        req: &Request<'_>,
        parent: u64,
        name: &OsStr,
        mode: u32,
        umask: u32,
        rdev: u32,
        reply: ReplyEntry,
    ) {
        let mut fs = self.0.lock().unwrap();
        create::mknod(&mut fs, req, parent, name, mode, umask, rdev, reply);
    }

    fn mkdir(&mut self, req: &Request<'_>, parent: u64, name: &OsStr, mode: u32, umask: u32, reply: ReplyEntry) {
        let mut fs = self.0.lock().unwrap();
        create::mkdir(&mut fs, req, parent, name, mode, umask, reply);
    }

    fn unlink(&mut self, req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEmpty) {
        let mut fs = self.0.lock().unwrap();
        delete::unlink(&mut fs, req, parent, name, reply);
    }

    fn rmdir(&mut self, req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEmpty) {
        let mut fs = self.0.lock().unwrap();
        delete::rmdir(&mut fs, req, parent, name, reply);
    }

    #[allow(clippy::too_many_arguments)]
    fn rename(
        &mut self,
        req: &Request<'_>,
        parent: u64,
        name: &OsStr,
        newparent: u64,
        newname: &OsStr,
        flags: u32,
        reply: ReplyEmpty,
    ) {
        let mut fs = self.0.lock().unwrap();
        rename::rename(&mut fs, req, parent, name, newparent, newname, flags, reply);
    }

    fn symlink(
        &mut self,
        _req: &Request<'_>,
        _parent: u64,
        _link_name: &OsStr,
        _target: &std::path::Path,
        reply: ReplyEntry,
    ) {
        reply.error(libc::ENOSYS);
    }

    fn link(
        &mut self,
        _req: &Request<'_>,
        _ino: u64,
        _newparent: u64,
        _newname: &OsStr,
        reply: ReplyEntry,
    ) {
        reply.error(libc::ENOSYS);
    }

    fn access(&mut self, req: &Request<'_>, ino: u64, _mask: i32, reply: ReplyEmpty) {
        let mut fs = self.0.lock().unwrap();
        read::access(&mut fs, req, ino, reply);
    }

    fn getxattr(&mut self, req: &Request<'_>, ino: u64, name: &OsStr, size: u32, reply: ReplyXattr) {
        let mut fs = self.0.lock().unwrap();
        xattr::getxattr(&mut fs, req, ino, name, size, reply);
    }

    fn setxattr(
        &mut self,
        _req: &Request<'_>,
        _ino: u64,
        _name: &OsStr,
        _value: &[u8],
        _flags: i32,
        _position: u32,
        reply: ReplyEmpty,
    ) {
        reply.error(libc::ENOSYS);
    }

    fn listxattr(&mut self, _req: &Request<'_>, _ino: u64, size: u32, reply: ReplyXattr) {
        xattr::listxattr(size, reply);
    }

    fn removexattr(&mut self, _req: &Request<'_>, _ino: u64, _name: &OsStr, reply: ReplyEmpty) {
        reply.error(libc::ENOSYS);
    }

    fn statfs(&mut self, _req: &Request<'_>, _ino: u64, reply: fuser::ReplyStatfs) {
        let fs = self.0.lock().unwrap();
        match statfs_for(fs.engine.shadow_root()) {
            Ok(stat) => reply.statfs(
                stat.blocks, stat.bfree, stat.bavail, stat.files, stat.ffree, stat.bsize, stat.namelen, stat.frsize,
            ),
            Err(e) => reply.error(e),
        }
    }

    fn destroy(&mut self) {
        let fs = self.0.lock().unwrap();
        fs.engine.teardown();
    }
}

struct StatfsResult {
    blocks: u64,
    bfree: u64,
    bavail: u64,
    files: u64,
    ffree: u64,
    bsize: u32,
    namelen: u32,
    frsize: u32,
}

/// `statfs`: present in `original_source/drivefs.py` (`os.statvfs`) but not
/// wired by the teacher. Queried against the shadow cache's backing
/// filesystem, since that is the only local disk this mount actually uses.
fn statfs_for(path: &std::path::Path) -> Result<StatfsResult, i32> {
    let stat = rustix::fs::statvfs(path).map_err(|e| e.raw_os_error())?;
    Ok(StatfsResult {
        blocks: stat.f_blocks,
        bfree: stat.f_bfree,
        bavail: stat.f_bavail,
        files: stat.f_files,
        ffree: stat.f_ffree,
        bsize: stat.f_bsize as u32,
        namelen: stat.f_namemax as u32,
        frsize: stat.f_frsize as u32,
    })
}
