use super::prelude::*;

pub fn getattr<R: RemoteApi>(fs: &mut RemoteFS<R>, req: &Request, ino: u64, reply: ReplyAttr) {
    if let Some(attr) = fs.attribute_cache.get(&ino) {
        reply.attr(&TTL, &attr);
        return;
    }
    let Some(path) = fs.path_of(ino) else {
        reply.error(ENOENT);
        return;
    };
    // refresh on local miss, per spec.md §4.6: "called from read-side FUSE
    // callbacks (access, readdir, getattr after a local miss)".
    if fs.engine.index().id_for(&path).is_none() {
        if let Err(e) = fs.engine.refresh(&path) {
            reply.error(errno(&e));
            return;
        }
    }
    match fs.record_for_ino(ino) {
        Ok((path, record)) => {
            let attr = fs.build_attr(ino, &path, &record, req);
            let ttl = Duration::from_secs(fs.config.kernel_attr_timeout_seconds);
            fs.attribute_cache.put(ino, attr, ttl);
            reply.attr(&TTL, &attr);
        }
        Err(e) => reply.error(errno(&e)),
    }
}

/// `chmod`/`chown` are accepted but local-only and not actually tracked per
/// inode (spec.md §4.7): mode/uid/gid are synthesized in `build_attr`, so
/// this just re-reports the current attributes. `size`/`atime`/`mtime` are
/// the only fields that round-trip through the engine.
#[allow(clippy::too_many_arguments)]
pub fn setattr<R: RemoteApi>(
    fs: &mut RemoteFS<R>,
    req: &Request<'_>,
    ino: u64,
    _mode: Option<u32>,
    _uid: Option<u32>,
    _gid: Option<u32>,
    size: Option<u64>,
    atime: Option<TimeOrNow>,
    mtime: Option<TimeOrNow>,
    _ctime: Option<SystemTime>,
    _fh: Option<u64>,
    _crtime: Option<SystemTime>,
    _chgtime: Option<SystemTime>,
    _bkuptime: Option<SystemTime>,
    _flags: Option<u32>,
    reply: ReplyAttr,
) {
    let Some(path) = fs.path_of(ino) else {
        reply.error(ENOENT);
        return;
    };

    if let Some(size) = size {
        if let Err(e) = fs.engine.truncate(&path, size) {
            reply.error(errno(&e));
            return;
        }
    }

    if atime.is_some() || mtime.is_some() {
        let now = chrono::Utc::now();
        let a = atime.map(time_or_now_to_utc).unwrap_or(now);
        let m = mtime.map(time_or_now_to_utc).unwrap_or(now);
        if let Err(e) = fs.engine.utimens(&path, a, m) {
            reply.error(errno(&e));
            return;
        }
    }

    fs.attribute_cache.remove(&ino);
    match fs.record_for_ino(ino) {
        Ok((path, record)) => reply.attr(&TTL, &fs.build_attr(ino, &path, &record, req)),
        Err(e) => reply.error(errno(&e)),
    }
}

fn time_or_now_to_utc(t: TimeOrNow) -> chrono::DateTime<chrono::Utc> {
    match t {
        TimeOrNow::SpecificTime(st) => chrono::DateTime::<chrono::Utc>::from(st),
        TimeOrNow::Now => chrono::Utc::now(),
    }
}
