use super::prelude::*;

/// Removes an empty directory. `engine.rmdir` already enforces the
/// `NotEmpty`/`NotDir` checks, so this is a direct delegation — unlike the
/// teacher, which re-implemented the emptiness check here and then
/// recursively deleted contents via `unlink`.
pub fn rmdir<R: RemoteApi>(fs: &mut RemoteFS<R>, _req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEmpty) {
    let Some(parent_path) = fs.path_of(parent) else {
        reply.error(ENOENT);
        return;
    };
    let Some(name) = name.to_str() else {
        reply.error(ENOENT);
        return;
    };
    let path = join_path(&parent_path, name);

    match fs.engine.rmdir(&path) {
        Ok(()) => {
            fs.inodes.forget_path(&path);
            fs.attribute_cache.remove(&parent);
            reply.ok();
        }
        Err(e) => reply.error(errno(&e)),
    }
}

/// Removes a file. Directories are rejected with `EISDIR` — `rmdir` is the
/// only path that removes a folder (spec.md); the teacher's recursive
/// delete-through-unlink behavior does not carry over.
pub fn unlink<R: RemoteApi>(fs: &mut RemoteFS<R>, _req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEmpty) {
    let Some(parent_path) = fs.path_of(parent) else {
        reply.error(ENOENT);
        return;
    };
    let Some(name) = name.to_str() else {
        reply.error(ENOENT);
        return;
    };
    let path = join_path(&parent_path, name);

    match fs.engine.unlink(&path) {
        Ok(()) => {
            fs.inodes.forget_path(&path);
            fs.attribute_cache.remove(&parent);
            reply.ok();
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
