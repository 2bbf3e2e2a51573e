//! Driving port for user reads, analytics and filtering.

use async_trait::async_trait;

use crate::domain::{
    Blog, CreatedRange, Error, Granularity, RegistrationBucket, User, UserDetail, UserId,
};

/// Domain use-case port for reading users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Every user, oldest first.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// A user together with the blogs they wrote.
    async fn user_detail(&self, id: &UserId) -> Result<UserDetail, Error>;

    /// Blogs written by a user.
    async fn user_blogs(&self, id: &UserId) -> Result<Vec<Blog>, Error>;

    /// Number of stored users.
    async fn count_users(&self) -> Result<u64, Error>;

    /// Gap-filled registration counts for the current reference period.
    async fn registration_analytics(
        &self,
        granularity: Granularity,
    ) -> Result<Vec<RegistrationBucket>, Error>;

    /// Users created inside `range`.
    async fn users_created_between(&self, range: CreatedRange) -> Result<Vec<User>, Error>;
}
