#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;
use user_images::{create_router, AppState, Config, FileStore, MemoryUserStore, UserStore};

pub struct TestServer {
    pub addr: SocketAddr,
    pub store: MemoryUserStore,
    pub uploads_dir: PathBuf,
    _temp_dir: TempDir,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn files(&self) -> FileStore {
        FileStore::new(self.uploads_dir.clone())
    }

    /// Names of every file currently in the uploads directory.
    pub async fn stored_files(&self) -> Vec<String> {
        self.files().list().await.expect("list uploads dir")
    }
}

pub async fn spawn_server() -> TestServer {
    let store = MemoryUserStore::new();
    let (addr, uploads_dir, temp_dir) = spawn_with_store(Arc::new(store.clone())).await;
    TestServer {
        addr,
        store,
        uploads_dir,
        _temp_dir: temp_dir,
    }
}

pub async fn spawn_with_store(store: Arc<dyn UserStore>) -> (SocketAddr, PathBuf, TempDir) {
    let temp_dir = TempDir::new().expect("tempdir");
    let uploads_dir = temp_dir.path().join("uploads");
    let state = AppState::new(store, Config::for_uploads_dir(uploads_dir.clone()));
    state.files.ensure_dir().await.expect("create uploads dir");
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve app");
    });

    (addr, uploads_dir, temp_dir)
}

pub fn image_part(bytes: Vec<u8>, filename: &str, mime: &str) -> reqwest::multipart::Part {
    reqwest::multipart::Part::bytes(bytes)
        .file_name(filename.to_string())
        .mime_str(mime)
        .expect("valid mime")
}

pub fn upload_form(username: &str, bytes: Vec<u8>, filename: &str) -> reqwest::multipart::Form {
    reqwest::multipart::Form::new()
        .text("username", username.to_string())
        .part("image", image_part(bytes, filename, "image/png"))
}

/// A few bytes with a PNG signature; the server never inspects content.
pub fn png_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
    let target = len.max(bytes.len());
    bytes.resize(target, 0xab);
    bytes
}
