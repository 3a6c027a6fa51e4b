//! File sessions served from a local directory

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tracing::debug;

use crate::domain::keystore::{ByteSink, ByteSource, RemoteFileSession, SessionConnector};
use crate::domain::{Remote, TransportError};

/// Connector whose sessions read and write below a local root directory.
///
/// Useful for staging trees and for hosts whose home directories are mounted
/// locally. Paths are resolved relative to the root and may not leave it.
#[derive(Debug, Clone)]
pub struct LocalDirectoryConnector {
    root: PathBuf,
}

impl LocalDirectoryConnector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl SessionConnector for LocalDirectoryConnector {
    async fn connect(&self, remote: &Remote) -> Result<Box<dyn RemoteFileSession>, TransportError> {
        let metadata = tokio::fs::metadata(&self.root).await.map_err(|e| {
            TransportError::connect(remote.to_string(), format!("{}: {}", self.root.display(), e))
        })?;

        if !metadata.is_dir() {
            return Err(TransportError::connect(
                remote.to_string(),
                format!("{} is not a directory", self.root.display()),
            ));
        }

        debug!(%remote, root = %self.root.display(), "opened local file session");

        Ok(Box::new(LocalSession {
            root: self.root.clone(),
        }))
    }
}

struct LocalSession {
    root: PathBuf,
}

impl LocalSession {
    fn resolve(&self, path: &str) -> Result<PathBuf, TransportError> {
        let relative = Path::new(path.trim_start_matches('/'));

        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("{} escapes the session root", path),
            )
            .into());
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl RemoteFileSession for LocalSession {
    async fn open_read(&self, path: &str) -> Result<ByteSource, TransportError> {
        let file = File::open(self.resolve(path)?).await?;
        Ok(Box::new(file))
    }

    async fn open_write_truncate(&self, path: &str) -> Result<ByteSink, TransportError> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.resolve(path)?)
            .await?;
        Ok(Box::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn remote() -> Remote {
        Remote::new("deploy", "127.0.0.1".parse().unwrap())
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let connector = LocalDirectoryConnector::new(dir.path());
        let session = connector.connect(&remote()).await.unwrap();

        let mut sink = session.open_write_truncate("/notes.txt").await.unwrap();
        sink.write_all(b"hello").await.unwrap();
        sink.shutdown().await.unwrap();

        let mut source = session.open_read("notes.txt").await.unwrap();
        let mut content = String::new();
        source.read_to_string(&mut content).await.unwrap();
        assert_eq!(content, "hello");
    }

    #[tokio::test]
    async fn test_write_truncates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("f"), "a much longer original body").unwrap();

        let session = LocalDirectoryConnector::new(dir.path())
            .connect(&remote())
            .await
            .unwrap();
        let mut sink = session.open_write_truncate("f").await.unwrap();
        sink.write_all(b"short").await.unwrap();
        sink.shutdown().await.unwrap();
        drop(sink);

        assert_eq!(std::fs::read_to_string(dir.path().join("f")).unwrap(), "short");
    }

    #[tokio::test]
    async fn test_missing_root_fails_to_connect() {
        let connector = LocalDirectoryConnector::new("/nonexistent/keygate-root");
        let result = connector.connect(&remote()).await;

        assert!(matches!(result, Err(TransportError::Connect { .. })));
    }

    #[tokio::test]
    async fn test_parent_components_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let session = LocalDirectoryConnector::new(dir.path())
            .connect(&remote())
            .await
            .unwrap();

        let result = session.open_read("../etc/passwd").await;
        assert!(matches!(result, Err(TransportError::Io(_))));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let session = LocalDirectoryConnector::new(dir.path())
            .connect(&remote())
            .await
            .unwrap();

        let result = session.open_read(".ssh/authorized_keys").await;
        assert!(matches!(result, Err(TransportError::Io(_))));
    }
}
