//! Image store on the local filesystem.
//!
//! Uploads are staged as temporary files inside the upload directory and
//! published by renaming them to `{unix-millis}-{sanitised name}`. Staging
//! in the same directory keeps the rename on one filesystem.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tempfile::{NamedTempFile, PersistError};
use tracing::debug;

use crate::domain::ports::{ImageStore, ImageStoreError, StagedImage, StoredImage};

/// Route prefix under which committed images are served.
pub const UPLOADS_ROUTE: &str = "/uploads";

const FALLBACK_NAME: &str = "upload";
const PERSIST_ATTEMPTS: u32 = 8;

fn io_error(error: impl ToString) -> ImageStoreError {
    ImageStoreError::io(error.to_string())
}

/// Reduce a client-supplied name to a safe final path component.
///
/// # Examples
/// ```
/// use cms_backend::outbound::uploads::sanitise_file_name;
///
/// assert_eq!(sanitise_file_name("../My Cat (1).PNG"), "My_Cat__1_.PNG");
/// assert_eq!(sanitise_file_name(""), "upload");
/// ```
pub fn sanitise_file_name(original: &str) -> String {
    let last = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let cleaned: String = last
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_') {
                ch
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        FALLBACK_NAME.to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Filesystem-backed [`ImageStore`].
#[derive(Clone)]
pub struct LocalImageStore {
    root: PathBuf,
    public_base_url: String,
    max_bytes: u64,
    clock: Arc<dyn Clock>,
}

impl LocalImageStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(
        root: impl Into<PathBuf>,
        public_base_url: impl Into<String>,
        max_bytes: u64,
        clock: Arc<dyn Clock>,
    ) -> io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            public_base_url: public_base_url.into().trim_end_matches('/').to_owned(),
            max_bytes,
            clock,
        })
    }

    /// Directory holding committed images.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn url_for(&self, file_name: &str) -> String {
        format!("{}{UPLOADS_ROUTE}/{file_name}", self.public_base_url)
    }

    fn candidate_name(&self, stem: &str, attempt: u32) -> String {
        let millis = self.clock.utc().timestamp_millis();
        if attempt == 0 {
            format!("{millis}-{stem}")
        } else {
            format!("{millis}-{attempt}-{stem}")
        }
    }
}

fn persist(
    root: &Path,
    mut file: NamedTempFile,
    names: Vec<String>,
) -> Result<String, ImageStoreError> {
    for name in names {
        match file.persist_noclobber(root.join(&name)) {
            Ok(_) => return Ok(name),
            Err(PersistError { error, file: kept }) if error.kind() == io::ErrorKind::AlreadyExists => {
                file = kept;
            }
            Err(PersistError { error, .. }) => return Err(io_error(error)),
        }
    }
    Err(io_error("no free file name for upload"))
}

#[async_trait]
impl ImageStore for LocalImageStore {
    fn stage(&self, original_name: &str) -> Result<StagedImage, ImageStoreError> {
        let file = tempfile::Builder::new()
            .prefix(".staging-")
            .tempfile_in(&self.root)
            .map_err(io_error)?;
        StagedImage::new(original_name, file, self.max_bytes)
    }

    async fn commit(&self, image: StagedImage) -> Result<StoredImage, ImageStoreError> {
        let (original_name, file) = image.finish().await?;
        let stem = sanitise_file_name(&original_name);
        let names = (0..PERSIST_ATTEMPTS)
            .map(|attempt| self.candidate_name(&stem, attempt))
            .collect();
        let root = self.root.clone();
        let file_name = tokio::task::spawn_blocking(move || persist(&root, file, names))
            .await
            .map_err(io_error)??;
        debug!(file = %file_name, "image published");
        Ok(StoredImage {
            url: self.url_for(&file_name),
            file_name,
        })
    }

    async fn discard(&self, image: &StoredImage) -> Result<(), ImageStoreError> {
        let path = self.root.join(sanitise_file_name(&image.file_name));
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(io_error(error)),
        }
    }
}
