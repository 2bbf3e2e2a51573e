//! Driving port for user mutations.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{Error, User, UserId};

use super::{StagedImage, UpdateOutcome};

/// A user document together with an optional uploaded image.
#[derive(Debug)]
pub struct UserSubmission {
    /// Raw profile document as sent by the client.
    pub document: Value,
    /// Uploaded profile picture, if any.
    pub image: Option<StagedImage>,
}

/// Domain use-case port for creating, updating and deleting users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Validate and store a new user.
    async fn create_user(&self, submission: UserSubmission) -> Result<User, Error>;

    /// Merge `submission` into an existing user and re-validate.
    async fn update_user(
        &self,
        id: &UserId,
        submission: UserSubmission,
    ) -> Result<UpdateOutcome, Error>;

    /// Delete a user, detaching their blogs.
    async fn delete_user(&self, id: &UserId) -> Result<(), Error>;
}
