//! Commit and roll back uploaded images around record writes.
//!
//! An image is committed before its owning record is written so the record
//! can carry the final URL. When the write then fails the image is removed
//! again; a failure to remove it is logged and otherwise ignored.

use tracing::{debug, warn};

use super::validation::FieldViolation;
use super::Error;
use super::ports::{ImageStore, ImageStoreError, StagedImage, StoredImage};

/// Form field that carries uploaded images.
pub const IMAGE_FIELD: &str = "image";

/// Map image store failures onto domain errors.
pub fn map_image_store_error(error: ImageStoreError) -> Error {
    match error {
        ImageStoreError::TooLarge { limit } => Error::validation(vec![FieldViolation::new(
            IMAGE_FIELD,
            format!("must be at most {limit} bytes"),
        )]),
        ImageStoreError::Io { message } => {
            Error::internal(format!("image storage failed: {message}"))
        }
    }
}

/// Commit `image` when present; empty uploads are dropped.
pub(crate) async fn commit_image<I>(
    store: &I,
    image: Option<StagedImage>,
) -> Result<Option<StoredImage>, Error>
where
    I: ImageStore + ?Sized,
{
    let Some(image) = image.filter(|staged| !staged.is_empty()) else {
        return Ok(None);
    };
    let stored = store.commit(image).await.map_err(map_image_store_error)?;
    debug!(file = %stored.file_name, "image committed");
    Ok(Some(stored))
}

/// Remove an image whose record could not be written.
pub(crate) async fn discard_image<I>(store: &I, image: Option<&StoredImage>)
where
    I: ImageStore + ?Sized,
{
    let Some(image) = image else {
        return;
    };
    if let Err(error) = store.discard(image).await {
        warn!(%error, file = %image.file_name, "failed to remove orphaned image");
    }
}
