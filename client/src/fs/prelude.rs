//! Common imports shared by the `fs` sub-modules (`attr.rs`, `read.rs`,
//! `write.rs`, ...), so each handler file only needs `use super::prelude::*;`
//! plus whatever is specific to it.

pub use fuser::{
    FileAttr, FileType, ReplyAttr, ReplyCreate, ReplyData, ReplyDirectory, ReplyEmpty, ReplyEntry,
    ReplyOpen, ReplyWrite, ReplyXattr, Request, TimeOrNow,
};

pub use libc::{EEXIST, EIO, EISDIR, ENOENT, ENOSYS, ENOTDIR, ENOTEMPTY};

pub use std::ffi::OsStr;
pub use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub use crate::errors::EngineError;
pub use crate::remote::RemoteApi;

pub use super::{errno, RemoteFS, TTL};
