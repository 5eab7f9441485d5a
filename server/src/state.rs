use crate::models::{FileRecord, FOLDER_MIME, ROOT_ID};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub struct Records {
    pub records: HashMap<String, FileRecord>,
    pub content: HashMap<String, Vec<u8>>,
    next_id: u64,
}

impl Records {
    pub fn next_id(&mut self) -> String {
        let id = format!("m{}", self.next_id);
        self.next_id += 1;
        id
    }
}

pub type AppState = Arc<Mutex<Records>>;

pub fn new_state() -> AppState {
    let now = Utc::now();
    let mut records = HashMap::new();
    records.insert(
        ROOT_ID.to_string(),
        FileRecord {
            id: ROOT_ID.to_string(),
            name: String::new(),
            mime: FOLDER_MIME.to_string(),
            parents: vec![],
            mtime: now,
            atime: now,
            ctime: now,
            trashed: false,
            size: 0,
        },
    );
    Arc::new(Mutex::new(Records {
        records,
        content: HashMap::new(),
        next_id: 1,
    }))
}
