//! Port for storing uploaded images.
//!
//! Uploads are written into a [`StagedImage`] chunk by chunk. Nothing is
//! visible to readers until the store commits it; dropping a staged image
//! removes its temporary file.

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

use super::define_port_error;

define_port_error! {
    /// Errors raised by image store adapters.
    pub enum ImageStoreError {
        /// Reading or writing the backing storage failed.
        Io { message: String } => "image store I/O failed: {message}",
        /// The upload exceeded the configured size limit.
        TooLarge { limit: u64 } => "image exceeds the upload limit of {limit} bytes",
    }
}

/// An upload in progress.
#[derive(Debug)]
pub struct StagedImage {
    original_name: String,
    file: NamedTempFile,
    writer: tokio::fs::File,
    written: u64,
    limit: u64,
}

impl StagedImage {
    /// Wrap a freshly created temporary file.
    pub fn new(
        original_name: impl Into<String>,
        file: NamedTempFile,
        limit: u64,
    ) -> Result<Self, ImageStoreError> {
        let writer = file
            .as_file()
            .try_clone()
            .map_err(|err| ImageStoreError::io(err.to_string()))?;
        Ok(Self {
            original_name: original_name.into(),
            file,
            writer: tokio::fs::File::from_std(writer),
            written: 0,
            limit,
        })
    }

    /// Append a chunk, failing once the upload grows past the limit.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), ImageStoreError> {
        let size = u64::try_from(chunk.len()).unwrap_or(u64::MAX);
        let total = self.written.saturating_add(size);
        if total > self.limit {
            return Err(ImageStoreError::too_large(self.limit));
        }
        self.writer
            .write_all(chunk)
            .await
            .map_err(|err| ImageStoreError::io(err.to_string()))?;
        self.written = total;
        Ok(())
    }

    /// File name supplied by the client.
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Bytes written so far.
    pub fn len(&self) -> u64 {
        self.written
    }

    /// Whether no bytes were written.
    pub fn is_empty(&self) -> bool {
        self.written == 0
    }

    /// Flush pending writes and hand over the temporary file.
    pub async fn finish(mut self) -> Result<(String, NamedTempFile), ImageStoreError> {
        self.writer
            .flush()
            .await
            .map_err(|err| ImageStoreError::io(err.to_string()))?;
        Ok((self.original_name, self.file))
    }
}

/// A committed image and the URL it is served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub file_name: String,
    pub url: String,
}

/// Durable storage for uploaded images.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Open a staging area for an upload named `original_name`.
    fn stage(&self, original_name: &str) -> Result<StagedImage, ImageStoreError>;

    /// Publish a staged image under a unique name.
    async fn commit(&self, image: StagedImage) -> Result<StoredImage, ImageStoreError>;

    /// Remove a committed image whose owning record was never written.
    async fn discard(&self, image: &StoredImage) -> Result<(), ImageStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn staged(limit: u64) -> (tempfile::TempDir, StagedImage) {
        let dir = tempfile::tempdir().expect("temp dir");
        let file = NamedTempFile::new_in(dir.path()).expect("temp file");
        let image = StagedImage::new("cat.png", file, limit).expect("staged image");
        (dir, image)
    }

    #[rstest]
    #[tokio::test]
    async fn chunks_accumulate_until_finished() {
        let (_dir, mut image) = staged(16);
        image.write_chunk(b"hello ").await.expect("first chunk");
        image.write_chunk(b"world").await.expect("second chunk");
        assert_eq!(image.len(), 11);

        let (name, file) = image.finish().await.expect("finish");
        assert_eq!(name, "cat.png");
        let contents = std::fs::read(file.path()).expect("read staged file");
        assert_eq!(contents, b"hello world");
    }

    #[rstest]
    #[tokio::test]
    async fn writes_past_the_limit_are_rejected() {
        let (_dir, mut image) = staged(4);
        image.write_chunk(b"abcd").await.expect("at the limit");
        let err = image.write_chunk(b"e").await.expect_err("over the limit");
        assert_eq!(err, ImageStoreError::too_large(4_u64));
    }

    #[rstest]
    #[tokio::test]
    async fn dropping_a_staged_image_removes_its_file() {
        let (_dir, image) = staged(4);
        let (_, file) = image.finish().await.expect("finish");
        let path = file.path().to_path_buf();
        drop(file);
        assert!(!path.exists());
    }
}
