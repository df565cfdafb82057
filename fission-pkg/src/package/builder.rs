//! Turns local files into archive descriptors.

use std::path::Path;
use std::time::Instant;

use crate::client::StorageClient;
use crate::core::{Archive, Checksum, ARCHIVE_LITERAL_SIZE_LIMIT};
use crate::errors::PackageError;

/// Builds [`Archive`]s from files, uploading large ones to storage.
pub struct ArchiveBuilder<'a> {
    storage: &'a dyn StorageClient,
    literal_size_limit: u64,
}

impl<'a> ArchiveBuilder<'a> {
    /// Creates a builder using the default literal size limit.
    #[must_use]
    pub fn new(storage: &'a dyn StorageClient) -> Self {
        Self {
            storage,
            literal_size_limit: ARCHIVE_LITERAL_SIZE_LIMIT,
        }
    }

    /// Sets the size below which files are embedded.
    #[must_use]
    pub fn with_literal_size_limit(mut self, limit: u64) -> Self {
        self.literal_size_limit = limit;
        self
    }

    /// Returns the literal size limit.
    #[must_use]
    pub fn literal_size_limit(&self) -> u64 {
        self.literal_size_limit
    }

    /// Produces an archive for the file at `path`.
    ///
    /// Files smaller than the limit become literal archives. Larger files are
    /// read once; the same bytes are hashed and uploaded, so the recorded
    /// checksum always matches what the storage service received.
    pub async fn build(&self, path: &Path) -> Result<Archive, PackageError> {
        tokio::fs::metadata(path)
            .await
            .map_err(|e| PackageError::io("stat", path, e))?;

        let content = tokio::fs::read(path)
            .await
            .map_err(|e| PackageError::io("read", path, e))?;
        // Decide on the bytes actually read, not the earlier stat.
        let size = content.len() as u64;

        if size < self.literal_size_limit {
            tracing::debug!(path = %path.display(), size, archive_kind = "literal", "Embedding archive");
            return Ok(Archive::Literal(content));
        }

        let checksum = Checksum::sha256(&content);
        let file_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        let started = Instant::now();
        let id = self.storage.upload(&file_name, content).await?;
        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;

        let url = self.storage.archive_url(&id);
        tracing::info!(
            path = %path.display(),
            size,
            archive_kind = "url",
            %url,
            duration_ms,
            "Uploaded archive"
        );
        Ok(Archive::url(url, checksum))
    }
}
