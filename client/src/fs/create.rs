use super::prelude::*;

/// Creates an empty file remotely and opens it in one step, mirroring the
/// POSIX `open(..., O_CREAT)` semantics the kernel expects from `create`.
#[allow(clippy::too_many_arguments)]
pub fn create<R: RemoteApi>(
    fs: &mut RemoteFS<R>,
    req: &Request<'_>,
    parent: u64,
    name: &OsStr,
    _mode: u32,
    _umask: u32,
    _flags: i32,
    reply: ReplyCreate,
) {
    let Some(parent_path) = fs.path_of(parent) else {
        reply.error(ENOENT);
        return;
    };
    let Some(name) = name.to_str() else {
        reply.error(ENOENT);
        return;
    };
    let path = join_path(&parent_path, name);

    match fs.engine.create_and_open(&path) {
        Ok((record, fh)) => {
            let ino = fs.inodes.ino_for(&path);
            let attr = fs.build_attr(ino, &path, &record, req);
            fs.attribute_cache.remove(&parent);
            reply.created(&TTL, &attr, 0, fh, 0);
        }
        Err(e) => reply.error(errno(&e)),
    }
}

pub fn mknod<R: RemoteApi>(
    fs: &mut RemoteFS<R>,
    req: &Request<'_>,
    parent: u64,
    name: &OsStr,
    mode: u32,
    _umask: u32,
    _rdev: u32,
    reply: ReplyEntry,
) {
    // Device nodes, FIFOs, and sockets have no remote equivalent (spec.md
    // §7): only regular files and directories may be created this way.
    match mode & libc::S_IFMT {
        libc::S_IFREG | libc::S_IFDIR => {}
        _ => {
            reply.error(libc::ENOSYS);
            return;
        }
    }

    let Some(parent_path) = fs.path_of(parent) else {
        reply.error(ENOENT);
        return;
    };
    let Some(name) = name.to_str() else {
        reply.error(ENOENT);
        return;
    };
    let path = join_path(&parent_path, name);

    match fs.engine.mknod(&path) {
        Ok(record) => {
            let ino = fs.inodes.ino_for(&path);
            let attr = fs.build_attr(ino, &path, &record, req);
            fs.attribute_cache.remove(&parent);
            reply.entry(&TTL, &attr, 0);
        }
        Err(e) => reply.error(errno(&e)),
    }
}

pub fn mkdir<R: RemoteApi>(
    fs: &mut RemoteFS<R>,
    req: &Request<'_>,
    parent: u64,
    name: &OsStr,
    _mode: u32,
    _umask: u32,
    reply: ReplyEntry,
) {
    let Some(parent_path) = fs.path_of(parent) else {
        reply.error(ENOENT);
        return;
    };
    let Some(name) = name.to_str() else {
        reply.error(ENOENT);
        return;
    };
    let path = join_path(&parent_path, name);

    match fs.engine.mkdir(&path) {
        Ok(record) => {
            let ino = fs.inodes.ino_for(&path);
            let attr = fs.build_attr(ino, &path, &record, req);
            fs.attribute_cache.remove(&parent);
            reply.entry(&TTL, &attr, 0);
        }
        Err(e) => reply.error(errno(&e)),
    }
}

fn join_path(parent_path: &str, name: &str) -> String {
    if parent_path == "/" {
        format!("/{name}")
    } else {
        format!("{parent_path}/{name}")
    }
}
