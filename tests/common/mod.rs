#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Method, Request, StatusCode};
use axum::Router;
use preorder_admin::{app, AppState, FileStore, MemoryStore, Store};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub const MAX_BODY_BYTES: usize = 1024 * 1024;

pub struct TestHarness {
    pub memory: Arc<MemoryStore>,
    pub root: TempDir,
    pub upload_dir: PathBuf,
    pub router: Router,
}

impl TestHarness {
    pub fn new() -> Self {
        let memory = Arc::new(MemoryStore::new());
        Self::build(memory.clone(), memory, |root| root.join("uploads"))
    }

    /// Route requests through `store`; `memory` stays reachable for seeding and inspection.
    pub fn with_store(memory: Arc<MemoryStore>, store: Arc<dyn Store>) -> Self {
        Self::build(memory, store, |root| root.join("uploads"))
    }

    /// Upload directory nested under a regular file, so every attachment write fails.
    pub fn with_unwritable_uploads() -> Self {
        let memory = Arc::new(MemoryStore::new());
        Self::build(memory.clone(), memory, |root| {
            let blocker = root.join("blocker");
            std::fs::write(&blocker, b"not a directory").expect("write blocker file");
            blocker.join("uploads")
        })
    }

    fn build(memory: Arc<MemoryStore>, store: Arc<dyn Store>, upload_dir: impl FnOnce(&Path) -> PathBuf) -> Self {
        let root = tempfile::Builder::new()
            .prefix("preorder-admin-")
            .tempdir()
            .expect("upload tempdir");
        let upload_dir = upload_dir(root.path());
        let state = AppState::new(store, FileStore::new(&upload_dir));
        TestHarness {
            memory,
            router: app(state, MAX_BODY_BYTES),
            upload_dir,
            root,
        }
    }

    /// Files currently in the upload directory; none if it was never created.
    pub fn upload_files(&self) -> Vec<PathBuf> {
        match std::fs::read_dir(&self.upload_dir) {
            Ok(entries) => entries.map(|e| e.expect("dir entry").path()).collect(),
            Err(_) => Vec::new(),
        }
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.router.clone().oneshot(req).await.expect("router is infallible");
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("response body");
        let body = serde_json::from_slice(&bytes).expect("json response");
        (status, body)
    }

    /// POST an urlencoded body to `/admin?entity=..&action=..`.
    pub async fn form(&self, entity: &str, action: &str, fields: &[(&str, &str)]) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(Method::POST)
            .uri(format!("/admin?entity={}&action={}", entity, action))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(urlencode(fields)))
            .expect("request");
        self.send(req).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let req = Request::builder().uri(uri).body(Body::empty()).expect("request");
        self.send(req).await
    }

    /// `data` of a successful read.
    pub async fn rows(&self, entity: &str) -> Vec<Value> {
        let (status, body) = self.form(entity, "read", &[]).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["data"].as_array().cloned().expect("read returns a list")
    }
}

pub fn urlencode(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_component(s: &str) -> String {
    s.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => (b as char).to_string(),
            b' ' => "+".to_string(),
            _ => format!("%{:02X}", b),
        })
        .collect()
}

/// Hand-built `multipart/form-data` body.
pub struct MultipartBody {
    boundary: &'static str,
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        MultipartBody {
            boundary: "----preorder-admin-test-boundary",
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                self.boundary, name, file_name, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", self.boundary),
            )
            .body(Body::from(self.body))
            .expect("request")
    }
}
