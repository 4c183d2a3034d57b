//! Storage access used by resolution and anchor checks

use std::future::Future;
use std::io;
use std::path::Path;

/// Read-only view of the document storage
pub trait Storage {
    /// Whether `path` names an existing file or directory.
    fn exists(&self, path: &Path) -> impl Future<Output = io::Result<bool>> + Send;

    /// Read `path` as UTF-8 text.
    fn read_text(&self, path: &Path) -> impl Future<Output = io::Result<String>> + Send;
}

/// Local filesystem storage via `tokio::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct FsStorage;

impl Storage for FsStorage {
    async fn exists(&self, path: &Path) -> io::Result<bool> {
        match tokio::fs::metadata(path).await {
            Ok(_) => Ok(true),
            // "file.md/" reports NotADirectory; that is simply absent
            Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn read_text(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }
}

#[cfg(test)]
pub(crate) use memory::MemoryStorage;
