//! User domain service.
//!
//! Implements the user driving ports: CRUD with validation, the registration
//! analytics report and the creation-time range filter.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use super::blog_service::map_blog_repository_error;
use super::image_upload::{commit_image, discard_image};
use super::ports::{
    BlogRepository, ImageStore, UpdateOutcome, UserRepository, UserRepositoryError,
    UserSubmission, UsersCommand, UsersQuery,
};
use super::{
    Blog, CreatedRange, Error, Granularity, ReferencePeriod, RegistrationBucket, User,
    UserDetail, UserId, UserProfile,
};

pub(crate) fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

fn user_not_found(id: &UserId) -> Error {
    Error::not_found(format!("user {id} not found"))
}

/// User service implementing the command and query driving ports.
#[derive(Clone)]
pub struct UserService<U, B, I> {
    users: Arc<U>,
    blogs: Arc<B>,
    images: Arc<I>,
    clock: Arc<dyn Clock>,
}

impl<U, B, I> UserService<U, B, I> {
    /// Create a new service over the given adapters.
    pub fn new(users: Arc<U>, blogs: Arc<B>, images: Arc<I>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            blogs,
            images,
            clock,
        }
    }
}

impl<U, B, I> UserService<U, B, I>
where
    U: UserRepository,
{
    async fn find_user(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| user_not_found(id))
    }
}

#[async_trait]
impl<U, B, I> UsersCommand for UserService<U, B, I>
where
    U: UserRepository,
    B: Send + Sync,
    I: ImageStore,
{
    async fn create_user(&self, submission: UserSubmission) -> Result<User, Error> {
        let profile = UserProfile::from_document(&submission.document).map_err(Error::validation)?;
        let stored = commit_image(&*self.images, submission.image).await?;
        let profile = profile.with_image(stored.as_ref().map(|image| image.url.clone()));
        let user = User::new(UserId::random(), profile, self.clock.utc());

        if let Err(error) = self.users.insert(&user).await {
            discard_image(&*self.images, stored.as_ref()).await;
            return Err(map_user_repository_error(error));
        }
        info!(user_id = %user.id, "user created");
        Ok(user)
    }

    async fn update_user(
        &self,
        id: &UserId,
        submission: UserSubmission,
    ) -> Result<UpdateOutcome, Error> {
        let current = self.find_user(id).await?;
        let merged = current
            .profile
            .merge_patch(&submission.document)
            .map_err(Error::validation)?;
        let stored = commit_image(&*self.images, submission.image).await?;
        let merged = merged.with_image(stored.as_ref().map(|image| image.url.clone()));
        if merged == current.profile {
            debug!(user_id = %id, "user update changed nothing");
            return Ok(UpdateOutcome::Unchanged);
        }

        let result = self
            .users
            .update_profile(id, &merged, self.clock.utc())
            .await;
        match result {
            Ok(true) => {
                info!(user_id = %id, "user updated");
                Ok(UpdateOutcome::Modified)
            }
            Ok(false) => {
                discard_image(&*self.images, stored.as_ref()).await;
                Err(user_not_found(id))
            }
            Err(error) => {
                discard_image(&*self.images, stored.as_ref()).await;
                Err(map_user_repository_error(error))
            }
        }
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), Error> {
        let deleted = self
            .users
            .delete(id)
            .await
            .map_err(map_user_repository_error)?;
        if !deleted {
            return Err(user_not_found(id));
        }
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}

#[async_trait]
impl<U, B, I> UsersQuery for UserService<U, B, I>
where
    U: UserRepository,
    B: BlogRepository,
    I: Send + Sync,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.users.list().await.map_err(map_user_repository_error)
    }

    async fn user_detail(&self, id: &UserId) -> Result<UserDetail, Error> {
        let user = self.find_user(id).await?;
        let blogs = self
            .blogs
            .list_by_author(id)
            .await
            .map_err(map_blog_repository_error)?;
        Ok(UserDetail::new(user, blogs))
    }

    async fn user_blogs(&self, id: &UserId) -> Result<Vec<Blog>, Error> {
        self.find_user(id).await?;
        self.blogs
            .list_by_author(id)
            .await
            .map_err(map_blog_repository_error)
    }

    async fn count_users(&self) -> Result<u64, Error> {
        self.users.count().await.map_err(map_user_repository_error)
    }

    async fn registration_analytics(
        &self,
        granularity: Granularity,
    ) -> Result<Vec<RegistrationBucket>, Error> {
        let out_of_range = || Error::internal("reporting period is out of range");
        let period = ReferencePeriod::containing(granularity, self.clock.utc())
            .ok_or_else(out_of_range)?;
        let range = CreatedRange::new(
            period.start_utc().ok_or_else(out_of_range)?,
            period.end_utc().ok_or_else(out_of_range)?,
        );
        let created = self
            .users
            .created_timestamps_between(&range)
            .await
            .map_err(map_user_repository_error)?;
        debug!(%granularity, records = created.len(), "bucketing registrations");
        period.buckets(&created).ok_or_else(out_of_range)
    }

    async fn users_created_between(&self, range: CreatedRange) -> Result<Vec<User>, Error> {
        if range.is_empty() {
            return Ok(Vec::new());
        }
        self.users
            .list_created_between(&range)
            .await
            .map_err(map_user_repository_error)
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
