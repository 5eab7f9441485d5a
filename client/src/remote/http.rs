//! `HttpRemote`: the production `RemoteApi` implementation, talking to the
//! mock/real remote service over plain REST + bearer auth. Chunked upload,
//! resumable download and the OAuth dance itself are out of scope (spec.md
//! §1) — this issues whole-file GET/PUT requests, matching spec.md's
//! "files are fetched whole" Non-goal.

use super::{FileRecord, RecordPatch, RemoteApi};
use crate::config::Credentials;
use crate::errors::RemoteError;
use std::path::Path;
use url::Url;

pub struct HttpRemote {
    client: reqwest::Client,
    base_url: Url,
    token: String,
}

impl HttpRemote {
    pub fn new(base_url: &str, credentials: &Credentials) -> Result<Self, RemoteError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| RemoteError::Malformed(format!("invalid server_url: {e}")))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            token: credentials.access_token.clone(),
        })
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .expect("base_url must be a valid base (http/https)");
            path.push("v1").push("files");
            for s in segments {
                path.push(s);
            }
        }
        url
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.bearer_auth(&self.token)
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(RemoteError::Gone);
        }
        Ok(resp.error_for_status()?)
    }
}

#[async_trait::async_trait]
impl RemoteApi for HttpRemote {
    async fn query(&self, q: &str) -> Result<Vec<FileRecord>, RemoteError> {
        let mut url = self.url(&[]);
        url.query_pairs_mut().append_pair("q", q);
        let resp = self.authed(self.client.get(url)).send().await?;
        let resp = Self::check(resp).await?;
        Ok(resp.json::<Vec<FileRecord>>().await?)
    }

    async fn get(&self, id: &str) -> Result<FileRecord, RemoteError> {
        let url = self.url(&[id]);
        let resp = self.authed(self.client.get(url)).send().await?;
        let resp = Self::check(resp).await?;
        Ok(resp.json::<FileRecord>().await?)
    }

    async fn create(
        &self,
        name: &str,
        parent: &str,
        is_dir: bool,
        in_trash: bool,
    ) -> Result<FileRecord, RemoteError> {
        let body = serde_json::json!({
            "name": name,
            "parent": parent,
            "is_dir": is_dir,
            "in_trash": in_trash,
        });
        let resp = self
            .authed(self.client.post(self.url(&[])).json(&body))
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        Ok(resp.json::<FileRecord>().await?)
    }

    async fn update(&self, id: &str, patch: RecordPatch) -> Result<FileRecord, RemoteError> {
        let resp = self
            .authed(self.client.patch(self.url(&[id])).json(&patch))
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        Ok(resp.json::<FileRecord>().await?)
    }

    async fn reparent(
        &self,
        id: &str,
        old_parent: &str,
        new_parent: &str,
    ) -> Result<FileRecord, RemoteError> {
        let body = serde_json::json!({ "old_parent": old_parent, "new_parent": new_parent });
        let resp = self
            .authed(self.client.post(self.url(&[id, "reparent"])).json(&body))
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        Ok(resp.json::<FileRecord>().await?)
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        let resp = self.authed(self.client.delete(self.url(&[id]))).send().await?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn download(
        &self,
        record: &FileRecord,
        export_mime: Option<&str>,
        local_path: &Path,
    ) -> Result<(), RemoteError> {
        let mut url = self.url(&[&record.id, "content"]);
        if let Some(mime) = export_mime {
            url.query_pairs_mut().append_pair("export", mime);
        }
        let resp = self.authed(self.client.get(url)).send().await?;
        let resp = Self::check(resp).await?;
        let bytes = resp.bytes().await?;
        tokio::fs::write(local_path, &bytes)
            .await
            .map_err(|e| RemoteError::Malformed(format!("writing shadow file failed: {e}")))?;
        Ok(())
    }

    async fn upload(&self, local_path: &Path, id: &str) -> Result<FileRecord, RemoteError> {
        let bytes = tokio::fs::read(local_path)
            .await
            .map_err(|e| RemoteError::Malformed(format!("reading shadow file failed: {e}")))?;
        let resp = self
            .authed(self.client.put(self.url(&[id, "content"])).body(bytes))
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        Ok(resp.json::<FileRecord>().await?)
    }
}
