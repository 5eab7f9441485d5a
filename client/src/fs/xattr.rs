use super::prelude::*;

/// Extended attributes are out of scope (spec.md Non-goals): we always
/// report that none exist, same as the teacher.
pub fn getxattr<R: RemoteApi>(_fs: &mut RemoteFS<R>, _req: &Request, _ino: u64, _name: &OsStr, _size: u32, reply: ReplyXattr) {
    #[cfg(target_os = "macos")]
    reply.error(libc::ENOATTR);

    #[cfg(not(target_os = "macos"))]
    reply.error(libc::ENODATA);
}

pub fn listxattr(size: u32, reply: ReplyXattr) {
    if size == 0 {
        reply.size(0);
    } else {
        reply.data(&[]);
    }
}
