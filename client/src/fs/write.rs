use super::prelude::*;

/// Writes straight to the shadow file at `offset` (spec.md §9(d): no
/// in-memory write buffer, unlike the teacher's `OpenWriteFile`). Upload is
/// deferred to `flush`/`release`.
#[allow(clippy::too_many_arguments)]
pub fn write<R: RemoteApi>(
    fs: &mut RemoteFS<R>,
    _req: &Request<'_>,
    ino: u64,
    fh: u64,
    offset: i64,
    data: &[u8],
    _write_flags: u32,
    _flags: i32,
    _lock_owner: Option<u64>,
    reply: ReplyWrite,
) {
    let Some(path) = fs.path_of(ino) else {
        reply.error(ENOENT);
        return;
    };
    match fs.engine.write(&path, offset.max(0) as u64, data) {
        Ok(n) => {
            fs.attribute_cache.remove(&ino);
            reply.written(n);
        }
        Err(e) => reply.error(errno(&e)),
    }
    let _ = fh; // file handle doesn't carry write state; path is authoritative
}

pub fn flush<R: RemoteApi>(fs: &mut RemoteFS<R>, _req: &Request<'_>, ino: u64, fh: u64, _lock_owner: u64, reply: ReplyEmpty) {
    let Some(path) = fs.path_of(ino) else {
        reply.error(ENOENT);
        return;
    };
    match fs.engine.flush(&path) {
        Ok(()) => reply.ok(),
        Err(e) => reply.error(errno(&e)),
    }
    let _ = fh;
}

pub fn fsync<R: RemoteApi>(fs: &mut RemoteFS<R>, _req: &Request<'_>, ino: u64, fh: u64, _datasync: bool, reply: ReplyEmpty) {
    flush(fs, _req, ino, fh, 0, reply);
}

pub fn release<R: RemoteApi>(
    fs: &mut RemoteFS<R>,
    _req: &Request<'_>,
    ino: u64,
    fh: u64,
    _flags: i32,
    _lock_owner: Option<u64>,
    _flush: bool,
    reply: ReplyEmpty,
) {
    let Some(path) = fs.path_of(ino) else {
        reply.error(ENOENT);
        return;
    };
    match fs.engine.release(&path, fh) {
        Ok(()) => reply.ok(),
        Err(e) => reply.error(errno(&e)),
    }
}
