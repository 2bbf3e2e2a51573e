//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{CreatedRange, User, UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// Storage for users.
///
/// Listing operations return users ordered by creation time, oldest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Every stored user.
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError>;

    /// Replace a user's profile. Returns `false` when no such user exists.
    ///
    /// The `blogs` back-reference list is left untouched.
    async fn update_profile(
        &self,
        id: &UserId,
        profile: &UserProfile,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, UserRepositoryError>;

    /// Remove a user, detaching their blogs. Returns `false` when absent.
    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError>;

    /// Number of stored users.
    async fn count(&self) -> Result<u64, UserRepositoryError>;

    /// Users whose `createdAt` falls inside `range`.
    async fn list_created_between(
        &self,
        range: &CreatedRange,
    ) -> Result<Vec<User>, UserRepositoryError>;

    /// Creation instants of users inside `range`, for bucketing.
    async fn created_timestamps_between(
        &self,
        range: &CreatedRange,
    ) -> Result<Vec<DateTime<Utc>>, UserRepositoryError>;
}
