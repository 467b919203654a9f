//! Helpers shared by the integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tokio::io::{AsyncRead, AsyncReadExt};

/// A scratch directory under the OS temp dir, removed on drop.
pub struct TempRoot {
    pub path: PathBuf,
}

impl TempRoot {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("switchd-test-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn file(&self, rel: &str, contents: &[u8]) -> PathBuf {
        let path = self.path.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn dir(&self, rel: &str) -> PathBuf {
        let path = self.path.join(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    pub fn entries(&self) -> usize {
        fs::read_dir(&self.path).unwrap().count()
    }
}

impl Drop for TempRoot {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// The `/srv` layout used by the end-to-end scenario.
pub fn scenario_root() -> TempRoot {
    let root = TempRoot::new();
    root.file("a.txt", b"hello world");
    root.dir("sub");
    root
}

/// A response as seen by a client.
pub struct RawResponse {
    pub head: String,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn status(&self) -> u16 {
        self.head
            .split_whitespace()
            .nth(1)
            .and_then(|code| code.parse().ok())
            .unwrap()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.eq_ignore_ascii_case(name).then(|| value.trim())
        })
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Reads one response: the head up to the blank line, then `Content-Length`
/// body bytes (none when the header is absent).
pub async fn read_response<R: AsyncRead + Unpin>(reader: &mut R) -> RawResponse {
    let mut head = Vec::new();
    let mut byte = [0u8; 1];
    while !head.ends_with(b"\r\n\r\n") {
        let n = reader.read(&mut byte).await.unwrap();
        assert!(n > 0, "connection closed before the end of the response head");
        head.push(byte[0]);
    }

    let mut response = RawResponse {
        head: String::from_utf8(head).unwrap(),
        body: Vec::new(),
    };

    let len: usize = response
        .header("Content-Length")
        .map(|v| v.parse().unwrap())
        .unwrap_or(0);
    response.body = vec![0u8; len];
    reader.read_exact(&mut response.body).await.unwrap();
    response
}

pub fn assert_same_file(path: &Path, body: &[u8]) {
    assert_eq!(fs::read(path).unwrap(), body);
}
