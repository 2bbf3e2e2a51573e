//! Blog domain service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::image_upload::{commit_image, discard_image};
use super::ports::{
    BlogRepository, BlogRepositoryError, BlogSubmission, BlogsCommand, BlogsQuery, ImageStore,
    UpdateOutcome,
};
use super::validation::FieldViolation;
use super::{Blog, BlogDraft, BlogId, Error};

pub(crate) fn map_blog_repository_error(error: BlogRepositoryError) -> Error {
    match error {
        BlogRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("blog repository unavailable: {message}"))
        }
        BlogRepositoryError::Query { message } => {
            Error::internal(format!("blog repository error: {message}"))
        }
        BlogRepositoryError::AuthorNotFound { author } => Error::validation(vec![
            FieldViolation::new("author", format!("user {author} does not exist")),
        ]),
    }
}

fn blog_not_found(id: &BlogId) -> Error {
    Error::not_found(format!("blog {id} not found"))
}

/// Blog service implementing the command and query driving ports.
#[derive(Clone)]
pub struct BlogService<B, I> {
    blogs: Arc<B>,
    images: Arc<I>,
    clock: Arc<dyn Clock>,
}

impl<B, I> BlogService<B, I> {
    /// Create a new service over the given adapters.
    pub fn new(blogs: Arc<B>, images: Arc<I>, clock: Arc<dyn Clock>) -> Self {
        Self {
            blogs,
            images,
            clock,
        }
    }
}

impl<B, I> BlogService<B, I>
where
    B: BlogRepository,
{
    async fn find_blog(&self, id: &BlogId) -> Result<Blog, Error> {
        self.blogs
            .find_by_id(id)
            .await
            .map_err(map_blog_repository_error)?
            .ok_or_else(|| blog_not_found(id))
    }
}

#[async_trait]
impl<B, I> BlogsCommand for BlogService<B, I>
where
    B: BlogRepository,
    I: ImageStore,
{
    async fn create_blog(&self, submission: BlogSubmission) -> Result<Blog, Error> {
        let document = Value::Object(submission.fields);
        let draft = BlogDraft::from_document(&document).map_err(Error::validation)?;
        let stored = commit_image(&*self.images, submission.image).await?;
        let image = stored.as_ref().map(|image| image.url.clone());
        let blog = Blog::new(BlogId::random(), draft, image, self.clock.utc());

        if let Err(error) = self.blogs.insert(&blog).await {
            warn!(%error, blog_id = %blog.id, "blog insert failed");
            discard_image(&*self.images, stored.as_ref()).await;
            return Err(map_blog_repository_error(error));
        }
        info!(blog_id = %blog.id, author = ?blog.author, "blog created");
        Ok(blog)
    }

    async fn update_blog(
        &self,
        id: &BlogId,
        submission: BlogSubmission,
    ) -> Result<UpdateOutcome, Error> {
        let current = self.find_blog(id).await?;
        let BlogDraft { content, author } =
            current.patched(&submission.fields).map_err(Error::validation)?;
        let stored = commit_image(&*self.images, submission.image).await?;
        let image = stored
            .as_ref()
            .map(|image| image.url.clone())
            .or_else(|| current.image.clone());
        if content == current.content && author == current.author && image == current.image {
            debug!(blog_id = %id, "blog update changed nothing");
            return Ok(UpdateOutcome::Unchanged);
        }

        let updated = Blog {
            content,
            author,
            image,
            updated_at: self.clock.utc(),
            ..current
        };
        match self.blogs.update(&updated).await {
            Ok(true) => {
                info!(blog_id = %id, author = ?updated.author, "blog updated");
                Ok(UpdateOutcome::Modified)
            }
            Ok(false) => {
                discard_image(&*self.images, stored.as_ref()).await;
                Err(blog_not_found(id))
            }
            Err(error) => {
                warn!(%error, blog_id = %id, "blog update failed");
                discard_image(&*self.images, stored.as_ref()).await;
                Err(map_blog_repository_error(error))
            }
        }
    }

    async fn delete_blog(&self, id: &BlogId) -> Result<(), Error> {
        let deleted = self
            .blogs
            .delete(id)
            .await
            .map_err(map_blog_repository_error)?;
        if !deleted {
            return Err(blog_not_found(id));
        }
        info!(blog_id = %id, "blog deleted");
        Ok(())
    }
}

#[async_trait]
impl<B, I> BlogsQuery for BlogService<B, I>
where
    B: BlogRepository,
    I: Send + Sync,
{
    async fn list_blogs(&self) -> Result<Vec<Blog>, Error> {
        self.blogs.list().await.map_err(map_blog_repository_error)
    }

    async fn blog(&self, id: &BlogId) -> Result<Blog, Error> {
        self.find_blog(id).await
    }

    async fn count_blogs(&self) -> Result<u64, Error> {
        self.blogs.count().await.map_err(map_blog_repository_error)
    }
}

#[cfg(test)]
#[path = "blog_service_tests.rs"]
mod tests;
