//! Port for blog persistence, including the author back-reference.

use async_trait::async_trait;

use crate::domain::{Blog, BlogId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by blog repository adapters.
    pub enum BlogRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "blog repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "blog repository query failed: {message}",
        /// The referenced author does not exist; nothing was written.
        AuthorNotFound { author: String } => "blog author {author} does not exist",
    }
}

/// Storage for blogs.
///
/// Implementations keep `User::blogs` consistent with `Blog::author`: an
/// insert with an author appends the blog id to that user's list, an update
/// that changes the author moves it between lists, and a delete removes it,
/// each as a single atomic unit.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Persist a new blog and link it to its author.
    async fn insert(&self, blog: &Blog) -> Result<(), BlogRepositoryError>;

    /// Fetch a blog by identifier.
    async fn find_by_id(&self, id: &BlogId) -> Result<Option<Blog>, BlogRepositoryError>;

    /// Every stored blog, oldest first.
    async fn list(&self) -> Result<Vec<Blog>, BlogRepositoryError>;

    /// Blogs written by `author`, oldest first.
    async fn list_by_author(&self, author: &UserId) -> Result<Vec<Blog>, BlogRepositoryError>;

    /// Overwrite content, image, author and `updatedAt`, re-linking the
    /// author when it changed. Returns `false` when absent and
    /// `AuthorNotFound`, with nothing written, when the new author is missing.
    async fn update(&self, blog: &Blog) -> Result<bool, BlogRepositoryError>;

    /// Remove a blog and unlink it from its author. Returns `false` when absent.
    async fn delete(&self, id: &BlogId) -> Result<bool, BlogRepositoryError>;

    /// Number of stored blogs.
    async fn count(&self) -> Result<u64, BlogRepositoryError>;
}
