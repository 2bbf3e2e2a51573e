//! Driving port for blog reads.

use async_trait::async_trait;

use crate::domain::{Blog, BlogId, Error};

/// Domain use-case port for reading blogs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlogsQuery: Send + Sync {
    /// Every blog, oldest first.
    async fn list_blogs(&self) -> Result<Vec<Blog>, Error>;

    /// A single blog.
    async fn blog(&self, id: &BlogId) -> Result<Blog, Error>;

    /// Number of stored blogs.
    async fn count_blogs(&self) -> Result<u64, Error>;
}
