use super::prelude::*;

/// Moves a file or directory. `engine.rename` reparents on the remote and
/// moves the shadow entry with a single `fs::rename`, which already relocates
/// whole subtrees atomically on the same filesystem — no client-side
/// recursive copy-then-delete like the teacher's `recursive_move_client_side`.
#[allow(clippy::too_many_arguments)]
pub fn rename<R: RemoteApi>(
    fs: &mut RemoteFS<R>,
    _req: &Request<'_>,
    parent: u64,
    name: &OsStr,
    newparent: u64,
    newname: &OsStr,
    _flags: u32,
    reply: ReplyEmpty,
) {
    let Some(old_parent_path) = fs.path_of(parent) else {
        reply.error(ENOENT);
        return;
    };
    let Some(new_parent_path) = fs.path_of(newparent) else {
        reply.error(ENOENT);
        return;
    };
    let Some(old_name) = name.to_str() else {
        reply.error(ENOENT);
        return;
    };
    let Some(new_name) = newname.to_str() else {
        reply.error(ENOENT);
        return;
    };

    let old_path = join_path(&old_parent_path, old_name);
    let new_path = join_path(&new_parent_path, new_name);

    match fs.engine.rename(&old_path, &new_path) {
        Ok(()) => {
            fs.inodes.rename(&old_path, &new_path);
            fs.attribute_cache.remove(&parent);
            fs.attribute_cache.remove(&newparent);
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
