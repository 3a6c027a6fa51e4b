//! Remote file transfer contract used by key stores

use async_trait::async_trait;
use std::fmt::Debug;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::domain::error::TransportError;
use crate::domain::remote::Remote;

/// Readable byte stream of a remote file
pub type ByteSource = Box<dyn AsyncRead + Send + Unpin>;

/// Writable byte sink of a remote file
pub type ByteSink = Box<dyn AsyncWrite + Send + Unpin>;

/// An open file-transfer session with one host (SFTP or similar).
///
/// Dropping the session, or the streams it handed out, releases them.
#[async_trait]
pub trait RemoteFileSession: Send + Sync {
    async fn open_read(&self, path: &str) -> Result<ByteSource, TransportError>;

    /// Open for writing, truncating any existing content
    async fn open_write_truncate(&self, path: &str) -> Result<ByteSink, TransportError>;
}

/// Opens file-transfer sessions to remotes
#[async_trait]
pub trait SessionConnector: Send + Sync + Debug {
    async fn connect(&self, remote: &Remote) -> Result<Box<dyn RemoteFileSession>, TransportError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::task::{Context, Poll};

    type Files = Arc<Mutex<HashMap<String, Vec<u8>>>>;

    /// In-memory file tree shared by every session it opens
    #[derive(Debug, Clone, Default)]
    pub struct MemoryConnector {
        files: Files,
        connects: Arc<AtomicUsize>,
        refuse_connections: Arc<AtomicBool>,
        fail_writes: Arc<AtomicBool>,
    }

    impl MemoryConnector {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_file(self, path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
            self.files
                .lock()
                .unwrap()
                .insert(path.into(), contents.into());
            self
        }

        pub fn contents(&self, path: &str) -> Option<String> {
            self.files
                .lock()
                .unwrap()
                .get(path)
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        }

        pub fn connect_count(&self) -> usize {
            self.connects.load(Ordering::SeqCst)
        }

        pub fn refuse_connections(&self, refuse: bool) {
            self.refuse_connections.store(refuse, Ordering::SeqCst);
        }

        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl SessionConnector for MemoryConnector {
        async fn connect(
            &self,
            remote: &Remote,
        ) -> Result<Box<dyn RemoteFileSession>, TransportError> {
            if self.refuse_connections.load(Ordering::SeqCst) {
                return Err(TransportError::connect(remote.to_string(), "connection refused"));
            }

            self.connects.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(MemorySession {
                files: self.files.clone(),
                fail_writes: self.fail_writes.load(Ordering::SeqCst),
            }))
        }
    }

    struct MemorySession {
        files: Files,
        fail_writes: bool,
    }

    #[async_trait]
    impl RemoteFileSession for MemorySession {
        async fn open_read(&self, path: &str) -> Result<ByteSource, TransportError> {
            let contents = self.files.lock().unwrap().get(path).cloned().ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::NotFound, format!("{} not found", path))
            })?;

            Ok(Box::new(Cursor::new(contents)))
        }

        async fn open_write_truncate(&self, path: &str) -> Result<ByteSink, TransportError> {
            if self.fail_writes {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    format!("{} is read-only", path),
                )
                .into());
            }

            self.files
                .lock()
                .unwrap()
                .insert(path.to_string(), Vec::new());

            Ok(Box::new(MemorySink {
                files: self.files.clone(),
                path: path.to_string(),
            }))
        }
    }

    struct MemorySink {
        files: Files,
        path: String,
    }

    impl AsyncWrite for MemorySink {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            self.files
                .lock()
                .unwrap()
                .entry(self.path.clone())
                .or_default()
                .extend_from_slice(buf);
            Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }
}
