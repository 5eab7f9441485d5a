//! Handlers for the mock remote service, implementing the wire contract
//! `client::remote::http::HttpRemote` speaks: `GET/POST /v1/files`,
//! `GET/PATCH/DELETE /v1/files/{id}`, `POST /v1/files/{id}/reparent`,
//! `GET/PUT /v1/files/{id}/content`.
//!
//! State is an in-memory `Mutex`, matching the client's own `MockRemote` —
//! this fixture exists to exercise the client against real HTTP framing,
//! not to persist anything across restarts.

use crate::models::{CreateRequest, DownloadParams, FileRecord, QueryParams, RecordPatch, ReparentRequest, FOLDER_MIME};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

pub async fn query_files(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Json<Vec<FileRecord>> {
    let records = state.lock().unwrap();
    let matching = records
        .records
        .values()
        .filter(|r| eval_query(r, &params.q))
        .cloned()
        .collect();
    Json(matching)
}

pub async fn create_file(
    State(state): State<AppState>,
    Json(req): Json<CreateRequest>,
) -> Result<Json<FileRecord>, StatusCode> {
    let mut records = state.lock().unwrap();
    let id = records.next_id();
    let now = Utc::now();
    let record = FileRecord {
        id: id.clone(),
        name: req.name,
        mime: if req.is_dir {
            FOLDER_MIME.to_string()
        } else {
            "application/octet-stream".to_string()
        },
        parents: vec![req.parent],
        mtime: now,
        atime: now,
        ctime: now,
        trashed: req.in_trash,
        size: 0,
    };
    records.records.insert(id.clone(), record.clone());
    if !req.is_dir {
        records.content.insert(id, Vec::new());
    }
    Ok(Json(record))
}

pub async fn get_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FileRecord>, StatusCode> {
    let records = state.lock().unwrap();
    records
        .records
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn update_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<RecordPatch>,
) -> Result<Json<FileRecord>, StatusCode> {
    let mut records = state.lock().unwrap();
    let record = records.records.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(name) = patch.name {
        record.name = name;
    }
    if let Some(trashed) = patch.trashed {
        record.trashed = trashed;
    }
    if let Some(parents) = patch.parents {
        record.parents = parents;
    }
    record.mtime = Utc::now();
    Ok(Json(record.clone()))
}

pub async fn reparent_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ReparentRequest>,
) -> Result<Json<FileRecord>, StatusCode> {
    let mut records = state.lock().unwrap();
    let record = records.records.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    record.parents = vec![req.new_parent];
    record.mtime = Utc::now();
    Ok(Json(record.clone()))
}

pub async fn delete_file(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    let mut records = state.lock().unwrap();
    if records.records.remove(&id).is_none() {
        return StatusCode::NOT_FOUND;
    }
    records.content.remove(&id);
    StatusCode::OK
}

pub async fn download_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(_params): Query<DownloadParams>,
) -> Result<Vec<u8>, StatusCode> {
    // Export-format conversion is out of scope for this fixture (spec.md
    // §1); the `export` query param is accepted but ignored, raw bytes are
    // always returned.
    let records = state.lock().unwrap();
    if !records.records.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(records.content.get(&id).cloned().unwrap_or_default())
}

pub async fn upload_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: axum::body::Bytes,
) -> Result<Json<FileRecord>, StatusCode> {
    let mut records = state.lock().unwrap();
    if !records.records.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let size = body.len() as u64;
    records.content.insert(id.clone(), body.to_vec());
    let record = records.records.get_mut(&id).expect("checked above");
    record.mtime = Utc::now();
    record.size = size;
    Ok(Json(record.clone()))
}

/// Same minimal `"'<id>' in parents"` / `"name = '<name>'"` grammar the
/// client's `MockRemote` evaluates, since both sides of this fixture need
/// to agree on what a query string means.
fn eval_query(record: &FileRecord, q: &str) -> bool {
    fn matches(record: &FileRecord, clause: &str) -> bool {
        let clause = clause.trim();
        if let Some(rest) = clause.strip_prefix('\'') {
            let end = rest.find('\'').unwrap_or(rest.len());
            record.parents.iter().any(|p| p == &rest[..end])
        } else if let Some(rest) = clause.strip_prefix("name = '") {
            let end = rest.find('\'').unwrap_or(rest.len());
            record.name == rest[..end]
        } else {
            false
        }
    }

    match q.split(" and ").map(str::trim).collect::<Vec<_>>().as_slice() {
        [single] => matches(record, single),
        [a, b] => matches(record, a) && matches(record, b),
        _ => false,
    }
}
