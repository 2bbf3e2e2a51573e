//! Multipart form reading shared by the user and blog upload endpoints.
//!
//! Text parts are buffered (bounded by [`MAX_TEXT_PART_BYTES`]). The first
//! part carrying a file name is streamed into a staged image; any further
//! files are drained and dropped.

use actix_multipart::{Field, Multipart, MultipartError};
use futures_util::StreamExt;
use tracing::debug;

use crate::domain::image_upload::map_image_store_error;
use crate::domain::ports::{ImageStore, StagedImage};
use crate::domain::{Error, FieldViolation};

/// Upper bound for a single text part.
pub const MAX_TEXT_PART_BYTES: usize = 1024 * 1024;

/// Parsed multipart body.
#[derive(Debug, Default)]
pub struct FormParts {
    /// Text parts in arrival order; a repeated name keeps the last value.
    pub texts: Vec<(String, String)>,
    pub image: Option<StagedImage>,
}

impl FormParts {
    /// Last value submitted for `name`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

fn malformed(error: &MultipartError) -> Error {
    Error::invalid_argument(format!("malformed multipart body: {error}"))
}

async fn read_text(field: &mut Field, name: &str) -> Result<String, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|err| malformed(&err))?;
        if bytes.len() + chunk.len() > MAX_TEXT_PART_BYTES {
            return Err(Error::validation(vec![FieldViolation::new(
                name,
                format!("must be at most {MAX_TEXT_PART_BYTES} bytes"),
            )]));
        }
        bytes.extend_from_slice(&chunk);
    }
    String::from_utf8(bytes).map_err(|_| {
        Error::validation(vec![FieldViolation::new(name, "must be valid UTF-8 text")])
    })
}

async fn drain(field: &mut Field) -> Result<(), Error> {
    while let Some(chunk) = field.next().await {
        chunk.map_err(|err| malformed(&err))?;
    }
    Ok(())
}

async fn stage_file(
    field: &mut Field,
    file_name: &str,
    images: &dyn ImageStore,
) -> Result<StagedImage, Error> {
    let mut staged = images.stage(file_name).map_err(map_image_store_error)?;
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|err| malformed(&err))?;
        staged
            .write_chunk(&chunk)
            .await
            .map_err(map_image_store_error)?;
    }
    Ok(staged)
}

/// Read every part of `payload`, staging the uploaded image in `images`.
///
/// A staged image is dropped, and its temporary file removed, when any
/// later part fails.
pub async fn read_form(mut payload: Multipart, images: &dyn ImageStore) -> Result<FormParts, Error> {
    let mut parts = FormParts::default();
    while let Some(field) = payload.next().await {
        let mut field = field.map_err(|err| malformed(&err))?;
        let (name, file_name) = match field.content_disposition() {
            Some(disposition) => (
                disposition.get_name().unwrap_or_default().to_owned(),
                disposition.get_filename().map(str::to_owned),
            ),
            None => (String::new(), None),
        };

        match file_name {
            Some(file_name) if !file_name.trim().is_empty() && parts.image.is_none() => {
                let staged = stage_file(&mut field, &file_name, images).await?;
                debug!(field = %name, file = %file_name, bytes = staged.len(), "upload staged");
                parts.image = Some(staged);
            }
            Some(_) => drain(&mut field).await?,
            None if name.is_empty() => drain(&mut field).await?,
            None => {
                let value = read_text(&mut field, &name).await?;
                parts.texts.push((name, value));
            }
        }
    }
    Ok(parts)
}
