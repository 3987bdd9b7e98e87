//! Archive store
//!
//! Persists uploaded archives on the local filesystem and resolves them
//! back by their derived file name. Files are publicly reachable under
//! `{public_base_url}/files/{file_name}`; the same directory is served
//! statically by the HTTP layer.

use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Derive the on-disk archive name for a pipe version.
///
/// The derivation is deterministic so the download path can recompute it
/// from the pipe name and version number alone.
pub fn archive_file_name(pipe_name: &str, version_number: &str) -> String {
    format!("{}-{}.tar", pipe_name, version_number)
}

/// A fully persisted archive.
#[derive(Debug, Clone)]
pub struct StoredArchive {
    pub url: String,
    pub size: u64,
}

/// An archive streamed to a temporary name, not yet committed.
///
/// Multipart fields arrive in arbitrary order, so the upload may stream in
/// before the pipe name and version number are known. Staging decouples the
/// write from the final name; `commit` renames within the same directory.
#[derive(Debug)]
pub struct StagedArchive {
    temp_name: String,
    pub size: u64,
}

/// Filesystem-backed blob store for uploaded archives.
#[derive(Debug, Clone)]
pub struct ArchiveStore {
    root: PathBuf,
    base_url: String,
}

impl ArchiveStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            root: root.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Directory archives are stored under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path an archive with the given name would live at.
    pub fn resolve_path(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    /// Public URL for an archive with the given name.
    pub fn public_url(&self, file_name: &str) -> String {
        format!("{}/files/{}", self.base_url, file_name)
    }

    async fn ensure_root(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root).await
    }

    /// Persist a complete byte buffer under its final name.
    pub async fn store(&self, bytes: &[u8], file_name: &str) -> io::Result<StoredArchive> {
        self.ensure_root().await?;

        let path = self.resolve_path(file_name);
        fs::write(&path, bytes).await?;

        tracing::debug!("Stored archive {} ({} bytes)", file_name, bytes.len());

        Ok(StoredArchive {
            url: self.public_url(file_name),
            size: bytes.len() as u64,
        })
    }

    /// Stream an upload to a temporary file without buffering it in memory.
    pub async fn stage<S, E>(&self, stream: S) -> io::Result<StagedArchive>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.ensure_root().await?;

        let temp_name = format!(".upload-{}.part", Uuid::new_v4());
        let path = self.resolve_path(&temp_name);

        let mut file = fs::File::create(&path).await?;
        let mut size: u64 = 0;

        futures::pin_mut!(stream);

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(io::Error::other)?;
            size += chunk.len() as u64;
            file.write_all(&chunk).await?;
        }

        file.flush().await?;

        Ok(StagedArchive { temp_name, size })
    }

    /// Rename a staged upload to its final derived name.
    pub async fn commit(
        &self,
        staged: StagedArchive,
        file_name: &str,
    ) -> io::Result<StoredArchive> {
        let from = self.resolve_path(&staged.temp_name);
        let to = self.resolve_path(file_name);

        fs::rename(&from, &to).await?;

        tracing::debug!("Committed archive {} ({} bytes)", file_name, staged.size);

        Ok(StoredArchive {
            url: self.public_url(file_name),
            size: staged.size,
        })
    }

    /// Remove a staged upload that will not be committed. Best effort.
    pub async fn discard(&self, staged: StagedArchive) {
        let path = self.resolve_path(&staged.temp_name);
        if let Err(err) = fs::remove_file(&path).await {
            tracing::warn!("Failed to discard staged upload {}: {}", staged.temp_name, err);
        }
    }

    /// Whether an archive with the given name exists on disk.
    pub async fn exists(&self, file_name: &str) -> bool {
        fs::try_exists(self.resolve_path(file_name))
            .await
            .unwrap_or(false)
    }

    /// Delete an archive. Returns false, not an error, when absent.
    pub async fn delete(&self, file_name: &str) -> io::Result<bool> {
        match fs::remove_file(self.resolve_path(file_name)).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store(dir: &tempfile::TempDir) -> ArchiveStore {
        ArchiveStore::new(dir.path(), "http://localhost:3000/")
    }

    #[test]
    fn test_archive_file_name() {
        assert_eq!(archive_file_name("acme", "1.0.0"), "acme-1.0.0.tar");
    }

    #[test]
    fn test_public_url_trims_trailing_slash() {
        let store = ArchiveStore::new("/tmp/storage", "http://localhost:3000/");
        assert_eq!(
            store.public_url("acme-1.0.0.tar"),
            "http://localhost:3000/files/acme-1.0.0.tar"
        );
    }

    #[tokio::test]
    async fn test_store_and_exists() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);

        let stored = store.store(b"tar bytes", "acme-1.0.0.tar").await.unwrap();
        assert_eq!(stored.size, 9);
        assert_eq!(stored.url, "http://localhost:3000/files/acme-1.0.0.tar");
        assert!(store.exists("acme-1.0.0.tar").await);
        assert!(!store.exists("acme-2.0.0.tar").await);

        let on_disk = tokio::fs::read(store.resolve_path("acme-1.0.0.tar"))
            .await
            .unwrap();
        assert_eq!(on_disk, b"tar bytes");
    }

    #[tokio::test]
    async fn test_store_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArchiveStore::new(dir.path().join("nested"), "http://localhost:3000");

        store.store(b"x", "a-1.tar").await.unwrap();
        assert!(store.exists("a-1.tar").await);
    }

    #[tokio::test]
    async fn test_stage_and_commit() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);

        let chunks: Vec<Result<Bytes, std::io::Error>> =
            vec![Ok(Bytes::from_static(b"hello ")), Ok(Bytes::from_static(b"world"))];
        let staged = store.stage(futures::stream::iter(chunks)).await.unwrap();
        assert_eq!(staged.size, 11);

        let stored = store.commit(staged, "acme-1.0.0.tar").await.unwrap();
        assert_eq!(stored.size, 11);
        assert!(store.exists("acme-1.0.0.tar").await);

        let on_disk = tokio::fs::read(store.resolve_path("acme-1.0.0.tar"))
            .await
            .unwrap();
        assert_eq!(on_disk, b"hello world");
    }

    #[tokio::test]
    async fn test_discard_removes_staged_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);

        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![Ok(Bytes::from_static(b"abc"))];
        let staged = store.stage(futures::stream::iter(chunks)).await.unwrap();
        store.discard(staged).await;

        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_absent_is_false() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);

        assert!(!store.delete("missing.tar").await.unwrap());

        store.store(b"x", "acme-1.0.0.tar").await.unwrap();
        assert!(store.delete("acme-1.0.0.tar").await.unwrap());
        assert!(!store.exists("acme-1.0.0.tar").await);
    }
}
