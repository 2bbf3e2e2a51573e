//! Driving port for blog mutations.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::{Blog, BlogId, Error};

use super::{StagedImage, UpdateOutcome};

/// Blog form fields together with an optional cover image.
#[derive(Debug)]
pub struct BlogSubmission {
    /// Text fields as submitted; `tags` may be a list or a single string.
    pub fields: Map<String, Value>,
    /// Uploaded cover image, if any.
    pub image: Option<StagedImage>,
}

/// Domain use-case port for creating, updating and deleting blogs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlogsCommand: Send + Sync {
    /// Validate and store a new blog, linking it to its author.
    async fn create_blog(&self, submission: BlogSubmission) -> Result<Blog, Error>;

    /// Replace the provided fields of an existing blog.
    async fn update_blog(
        &self,
        id: &BlogId,
        submission: BlogSubmission,
    ) -> Result<UpdateOutcome, Error>;

    /// Delete a blog and unlink it from its author.
    async fn delete_blog(&self, id: &BlogId) -> Result<(), Error>;
}
