//! Lazy sequence view over a remote `authorized_keys` file

use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{info, instrument, Span};

use crate::domain::keystore::{
    KeyCodec, KeyIndex, KeyListError, OpenSshCodec, PublicKey, RemoteFileSession,
    SessionConnector, Slice,
};
use crate::domain::Remote;

pub const DEFAULT_AUTHORIZED_KEYS_PATH: &str = ".ssh/authorized_keys";

/// The public keys authorized to log in to one remote, as an ordered list.
///
/// Nothing is kept between calls: every read opens a session, reads and
/// parses the whole file, and every mutation reads it, edits the keys in
/// memory and rewrites the whole file. Changes made by anyone else are visible
/// on the next call.
///
/// Mutations are not atomic. Two writers racing on the same host both read
/// the same starting state and the later rewrite discards the earlier one.
/// Callers that need atomicity must serialize mutations per host themselves.
#[derive(Debug, Clone)]
pub struct AuthorizedKeyList {
    connector: Arc<dyn SessionConnector>,
    codec: Arc<dyn KeyCodec>,
    remote: Remote,
    path: String,
    span: Span,
}

impl AuthorizedKeyList {
    pub fn new(connector: Arc<dyn SessionConnector>, remote: Remote) -> Self {
        Self {
            connector,
            codec: Arc::new(OpenSshCodec),
            remote,
            path: DEFAULT_AUTHORIZED_KEYS_PATH.to_string(),
            span: Span::none(),
        }
    }

    /// Key file path on the remote, relative to the login user's home
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_codec(mut self, codec: Arc<dyn KeyCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Parent span for the spans of every operation
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn remote(&self) -> &Remote {
        &self.remote
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Every key, in file order
    pub async fn keys(&self) -> Result<Vec<PublicKey>, KeyListError> {
        self.load().await
    }

    pub async fn len(&self) -> Result<usize, KeyListError> {
        Ok(self.load().await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool, KeyListError> {
        Ok(self.load().await?.is_empty())
    }

    pub async fn contains(&self, key: &PublicKey) -> Result<bool, KeyListError> {
        Ok(self.load().await?.contains(key))
    }

    /// The key at `index`; negative indices count from the end
    pub async fn get(&self, index: isize) -> Result<PublicKey, KeyListError> {
        let mut keys = self.load().await?;
        let position = KeyIndex::resolve_single(index, keys.len())?;
        Ok(keys.swap_remove(position))
    }

    pub async fn slice(&self, slice: Slice) -> Result<Vec<PublicKey>, KeyListError> {
        let keys = self.load().await?;
        let positions = slice.positions(keys.len())?;
        Ok(positions.into_iter().map(|i| keys[i].clone()).collect())
    }

    /// Keys addressed by a single index or a slice
    pub async fn select(&self, index: KeyIndex) -> Result<Vec<PublicKey>, KeyListError> {
        match index {
            KeyIndex::At(index) => Ok(vec![self.get(index).await?]),
            KeyIndex::Slice(slice) => self.slice(slice).await,
        }
    }

    /// Replace the key at `index`
    pub async fn set(&self, index: isize, key: PublicKey) -> Result<(), KeyListError> {
        self.modify(|keys| {
            let position = KeyIndex::resolve_single(index, keys.len())?;
            keys[position] = key;
            Ok(())
        })
        .await
    }

    /// Replace the keys addressed by `slice`.
    ///
    /// A contiguous slice may be replaced by any number of keys, growing or
    /// shrinking the list. A stepped slice needs exactly as many keys as it
    /// addresses.
    pub async fn set_slice(&self, slice: Slice, replacement: Vec<PublicKey>) -> Result<(), KeyListError> {
        self.modify(|keys| assign_slice(keys, slice, replacement))
            .await
    }

    pub async fn delete(&self, index: isize) -> Result<PublicKey, KeyListError> {
        self.modify(|keys| {
            let position = KeyIndex::resolve_single(index, keys.len())?;
            Ok(keys.remove(position))
        })
        .await
    }

    /// Remove the keys addressed by `slice`, returning them in list order
    pub async fn delete_slice(&self, slice: Slice) -> Result<Vec<PublicKey>, KeyListError> {
        self.modify(|keys| delete_positions(keys, slice.positions(keys.len())?))
            .await
    }

    /// Remove whatever `index` addresses
    pub async fn remove(&self, index: KeyIndex) -> Result<Vec<PublicKey>, KeyListError> {
        match index {
            KeyIndex::At(index) => Ok(vec![self.delete(index).await?]),
            KeyIndex::Slice(slice) => self.delete_slice(slice).await,
        }
    }

    /// Remove the first occurrence of `key`; returns whether it was present
    pub async fn remove_key(&self, key: &PublicKey) -> Result<bool, KeyListError> {
        self.modify(|keys| match keys.iter().position(|k| k == key) {
            Some(position) => {
                keys.remove(position);
                Ok(true)
            }
            None => Ok(false),
        })
        .await
    }

    /// Insert before `index`. Indices past either end clip to that end.
    pub async fn insert(&self, index: isize, key: PublicKey) -> Result<(), KeyListError> {
        self.modify(|keys| {
            let len = keys.len() as isize;
            let position = if index < 0 {
                (index + len).max(0)
            } else {
                index.min(len)
            };
            keys.insert(position as usize, key);
            Ok(())
        })
        .await
    }

    pub async fn append(&self, key: PublicKey) -> Result<(), KeyListError> {
        self.extend(vec![key]).await
    }

    /// Append keys after the last existing one
    pub async fn extend(&self, new_keys: Vec<PublicKey>) -> Result<(), KeyListError> {
        self.modify(|keys| {
            keys.extend(new_keys);
            Ok(())
        })
        .await
    }

    #[instrument(
        parent = &self.span,
        name = "authorized_keys.read",
        skip_all,
        fields(remote = %self.remote, path = %self.path)
    )]
    async fn load(&self) -> Result<Vec<PublicKey>, KeyListError> {
        let session = self.connector.connect(&self.remote).await?;
        self.read_keys(session.as_ref()).await
    }

    /// Read, edit in memory, rewrite the whole file, all in one session
    #[instrument(
        parent = &self.span,
        name = "authorized_keys.modify",
        skip_all,
        fields(remote = %self.remote, path = %self.path)
    )]
    async fn modify<T, F>(&self, edit: F) -> Result<T, KeyListError>
    where
        F: FnOnce(&mut Vec<PublicKey>) -> Result<T, KeyListError>,
    {
        let session = self.connector.connect(&self.remote).await?;

        let mut keys = self.read_keys(session.as_ref()).await?;
        let before = keys.len();
        let outcome = edit(&mut keys)?;

        self.write_keys(session.as_ref(), &keys).await?;
        info!(before, after = keys.len(), "rewrote authorized keys");

        Ok(outcome)
    }

    async fn read_keys(&self, session: &dyn RemoteFileSession) -> Result<Vec<PublicKey>, KeyListError> {
        let mut source = session.open_read(&self.path).await?;
        let mut content = String::new();
        source.read_to_string(&mut content).await?;

        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| self.codec.parse(line).map_err(KeyListError::from))
            .collect()
    }

    async fn write_keys(&self, session: &dyn RemoteFileSession, keys: &[PublicKey]) -> Result<(), KeyListError> {
        let mut content = String::new();
        for (index, key) in keys.iter().enumerate() {
            let line = self.codec.format(key);
            if line.contains(['\n', '\r']) {
                return Err(KeyListError::MultiLineKey { index });
            }
            content.push_str(&line);
            content.push('\n');
        }

        let mut sink = session.open_write_truncate(&self.path).await?;
        sink.write_all(content.as_bytes()).await?;
        sink.shutdown().await?;
        Ok(())
    }
}

fn assign_slice(
    keys: &mut Vec<PublicKey>,
    slice: Slice,
    replacement: Vec<PublicKey>,
) -> Result<(), KeyListError> {
    if slice.is_contiguous() {
        let (start, stop, _) = slice.resolve(keys.len())?;
        let start = start as usize;
        let stop = (stop as usize).max(start);
        keys.splice(start..stop, replacement);
        return Ok(());
    }

    let positions = slice.positions(keys.len())?;
    if positions.len() != replacement.len() {
        return Err(KeyListError::SliceLengthMismatch {
            expected: positions.len(),
            given: replacement.len(),
        });
    }

    for (position, key) in positions.into_iter().zip(replacement) {
        keys[position] = key;
    }
    Ok(())
}

fn delete_positions(
    keys: &mut Vec<PublicKey>,
    mut positions: Vec<usize>,
) -> Result<Vec<PublicKey>, KeyListError> {
    positions.sort_unstable();

    let mut removed = Vec::with_capacity(positions.len());
    for position in positions.into_iter().rev() {
        removed.push(keys.remove(position));
    }
    removed.reverse();

    Ok(removed)
}
