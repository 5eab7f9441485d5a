use cloudfs_mock_remote::models::FileRecord;
use reqwest::StatusCode;
use serde_json::json;
use std::net::SocketAddr;

/// Spawns a fresh instance of the app on an ephemeral port and returns its
/// base URL. Each test gets its own in-memory state.
async fn spawn_app() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, cloudfs_mock_remote::app()).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn health_endpoint_ok() {
    let base = spawn_app().await;
    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn query_root_children_after_create() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let created: FileRecord = client
        .post(format!("{base}/v1/files"))
        .json(&json!({"name": "A", "parent": "root", "is_dir": false}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created.name, "A");
    assert_eq!(created.parents, vec!["root".to_string()]);

    let resp = client
        .get(format!("{base}/v1/files"))
        .query(&[("q", "'root' in parents")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let list: Vec<FileRecord> = resp.json().await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, created.id);
}

#[tokio::test]
async fn get_unknown_id_is_404() {
    let base = spawn_app().await;
    let resp = reqwest::get(format!("{base}/v1/files/does-not-exist")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upload_then_download_round_trips_bytes() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let created: FileRecord = client
        .post(format!("{base}/v1/files"))
        .json(&json!({"name": "doc.txt", "parent": "root", "is_dir": false}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let put_resp = client
        .put(format!("{base}/v1/files/{}/content", created.id))
        .body("hello world")
        .send()
        .await
        .unwrap();
    assert_eq!(put_resp.status(), StatusCode::OK);
    let updated: FileRecord = put_resp.json().await.unwrap();
    assert_eq!(updated.size, 11);

    let body = client
        .get(format!("{base}/v1/files/{}/content", created.id))
        .send()
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap();
    assert_eq!(&body[..], b"hello world");
}

#[tokio::test]
async fn update_flips_trashed_flag() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let created: FileRecord = client
        .post(format!("{base}/v1/files"))
        .json(&json!({"name": "trash_me.txt", "parent": "root", "is_dir": false}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let patched: FileRecord = client
        .patch(format!("{base}/v1/files/{}", created.id))
        .json(&json!({"trashed": true}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(patched.trashed);
}

#[tokio::test]
async fn reparent_moves_file_to_new_parent() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let folder: FileRecord = client
        .post(format!("{base}/v1/files"))
        .json(&json!({"name": "Folder", "parent": "root", "is_dir": true}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let file: FileRecord = client
        .post(format!("{base}/v1/files"))
        .json(&json!({"name": "child.txt", "parent": "root", "is_dir": false}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let reparented: FileRecord = client
        .post(format!("{base}/v1/files/{}/reparent", file.id))
        .json(&json!({"old_parent": "root", "new_parent": folder.id}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reparented.parents, vec![folder.id]);
}

#[tokio::test]
async fn delete_removes_record_and_content() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let created: FileRecord = client
        .post(format!("{base}/v1/files"))
        .json(&json!({"name": "bye.txt", "parent": "root", "is_dir": false}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let del_resp = client
        .delete(format!("{base}/v1/files/{}", created.id))
        .send()
        .await
        .unwrap();
    assert_eq!(del_resp.status(), StatusCode::OK);

    let get_resp = client
        .get(format!("{base}/v1/files/{}", created.id))
        .send()
        .await
        .unwrap();
    assert_eq!(get_resp.status(), StatusCode::NOT_FOUND);

    let del_again = client
        .delete(format!("{base}/v1/files/{}", created.id))
        .send()
        .await
        .unwrap();
    assert_eq!(del_again.status(), StatusCode::NOT_FOUND);
}
