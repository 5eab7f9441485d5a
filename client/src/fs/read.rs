use super::prelude::*;
use crate::index::leaf_of;

pub fn lookup<R: RemoteApi>(fs: &mut RemoteFS<R>, req: &Request, parent: u64, name: &OsStr, reply: ReplyEntry) {
    let Some(parent_path) = fs.path_of(parent) else {
        reply.error(ENOENT);
        return;
    };
    let Some(name) = name.to_str() else {
        reply.error(ENOENT);
        return;
    };
    let child_path = if parent_path == "/" {
        format!("/{name}")
    } else {
        format!("{parent_path}/{name}")
    };

    if fs.engine.index().id_for(&child_path).is_none() {
        if let Err(e) = fs.engine.refresh(&child_path) {
            reply.error(errno(&e));
            return;
        }
    }
    let Some(id) = fs.engine.index().id_for(&child_path).map(str::to_string) else {
        reply.error(ENOENT);
        return;
    };
    let record = fs
        .engine
        .index()
        .record_for(&id)
        .cloned()
        .expect("id_for and record_for must agree (I1)");
    let ino = fs.inodes.ino_for(&child_path);
    let attr = fs.build_attr(ino, &child_path, &record, req);
    reply.entry(&TTL, &attr, 0);
}

pub fn readdir<R: RemoteApi>(
    fs: &mut RemoteFS<R>,
    _req: &Request,
    ino: u64,
    _fh: u64,
    offset: i64,
    mut reply: ReplyDirectory,
) {
    let Some(dir_path) = fs.path_of(ino) else {
        reply.error(ENOENT);
        return;
    };

    let mut entries: Vec<(u64, FileType, String)> = vec![(ino, FileType::Directory, ".".to_string())];
    let parent_path = parent_of_dir(&dir_path);
    entries.push((fs.inodes.ino_for(&parent_path), FileType::Directory, "..".to_string()));

    if dir_path == "/.Trash" {
        for (path, record) in fs.engine.index().trashed_entries() {
            let kind = if record.is_folder() { FileType::Directory } else { FileType::RegularFile };
            let ino = fs.inodes.ino_for(&path);
            entries.push((ino, kind, leaf_of(&path).to_string()));
        }
    } else {
        if let Err(e) = fs.engine.refresh(&dir_path) {
            reply.error(errno(&e));
            return;
        }
        if dir_path == "/" {
            entries.push((fs.inodes.ino_for("/.Trash"), FileType::Directory, ".Trash".to_string()));
        }
        let Some(folder_id) = fs.engine.index().id_for(&dir_path).map(str::to_string) else {
            reply.error(ENOENT);
            return;
        };
        for child_id in fs.engine.index().children_of(&folder_id).to_vec() {
            let Some(record) = fs.engine.index().record_for(&child_id).cloned() else {
                continue;
            };
            if record.trashed {
                continue; // only visible under /.Trash
            }
            let child_path = if dir_path == "/" {
                format!("/{}", record.name)
            } else {
                format!("{dir_path}/{}", record.name)
            };
            let kind = if record.is_folder() { FileType::Directory } else { FileType::RegularFile };
            let ino = fs.inodes.ino_for(&child_path);
            entries.push((ino, kind, record.name));
        }
    }

    for (i, (ino, kind, name)) in entries.into_iter().enumerate().skip(offset as usize) {
        if reply.add(ino, (i + 1) as i64, kind, &name) {
            break;
        }
    }
    reply.ok();
}

fn parent_of_dir(path: &str) -> String {
    if path == "/" {
        return "/".to_string();
    }
    crate::index::parent_of(path)
}

pub fn read<R: RemoteApi>(
    fs: &mut RemoteFS<R>,
    _req: &Request<'_>,
    ino: u64,
    _fh: u64,
    offset: i64,
    size: u32,
    _flags: i32,
    _lock_owner: Option<u64>,
    reply: ReplyData,
) {
    let Some(path) = fs.path_of(ino) else {
        reply.error(ENOENT);
        return;
    };
    match fs.engine.read(&path, offset.max(0) as u64, size) {
        Ok(data) => reply.data(&data),
        Err(e) => reply.error(errno(&e)),
    }
}

pub fn open<R: RemoteApi>(fs: &mut RemoteFS<R>, _req: &Request<'_>, ino: u64, _flags: i32, reply: ReplyOpen) {
    let Some(path) = fs.path_of(ino) else {
        reply.error(ENOENT);
        return;
    };
    match fs.engine.open(&path) {
        Ok(fh) => reply.opened(fh, 0),
        Err(e) => reply.error(errno(&e)),
    }
}

pub fn access<R: RemoteApi>(fs: &mut RemoteFS<R>, _req: &Request<'_>, ino: u64, reply: ReplyEmpty) {
    let Some(path) = fs.path_of(ino) else {
        reply.error(ENOENT);
        return;
    };
    if fs.engine.index().id_for(&path).is_none() {
        if let Err(e) = fs.engine.refresh(&path) {
            reply.error(errno(&e));
            return;
        }
    }
    if fs.engine.index().id_for(&path).is_some() || path == "/.Trash" {
        reply.ok();
    } else {
        reply.error(ENOENT);
    }
}
