//! PostgreSQL-backed `UserRepository`.
//!
//! The validated profile is stored as one JSONB document. Range queries use
//! the `created_at` index and are half-open: `start <= created_at < end`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{BlogId, CreatedRange, User, UserId, UserProfile};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel implementation of [`UserRepository`].
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, UserRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    map_basic_diesel_error(error, UserRepositoryError::query, UserRepositoryError::connection)
}

fn profile_to_json(profile: &UserProfile) -> Result<serde_json::Value, UserRepositoryError> {
    serde_json::to_value(profile)
        .map_err(|err| UserRepositoryError::query(format!("encode profile: {err}")))
}

fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    let profile: UserProfile = serde_json::from_value(row.profile).map_err(|err| {
        UserRepositoryError::query(format!("decode profile of user {}: {err}", row.id))
    })?;
    Ok(User {
        id: UserId::from_uuid(row.id),
        profile,
        blogs: row.blog_ids.into_iter().map(BlogId::from_uuid).collect(),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn rows_to_users(rows: Vec<UserRow>) -> Result<Vec<User>, UserRepositoryError> {
    rows.into_iter().map(row_to_user).collect()
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let blog_ids: Vec<uuid::Uuid> = user.blogs.iter().map(|id| *id.as_uuid()).collect();
        let row = NewUserRow {
            id: *user.id.as_uuid(),
            profile: profile_to_json(&user.profile)?,
            blog_ids: &blog_ids,
            created_at: user.created_at,
            updated_at: user.updated_at,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = users::table
            .order((users::created_at.asc(), users::id.asc()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_users(rows)
    }

    async fn update_profile(
        &self,
        id: &UserId,
        profile: &UserProfile,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, UserRepositoryError> {
        let document = profile_to_json(profile)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(users::table.find(*id.as_uuid()))
            .set((users::profile.eq(document), users::updated_at.eq(updated_at)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // blogs.author_id is ON DELETE SET NULL.
        let deleted = diesel::delete(users::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn count(&self) -> Result<u64, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn list_created_between(
        &self,
        range: &CreatedRange,
    ) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = users::table
            .filter(users::created_at.ge(range.start))
            .filter(users::created_at.lt(range.end))
            .order((users::created_at.asc(), users::id.asc()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_users(rows)
    }

    async fn created_timestamps_between(
        &self,
        range: &CreatedRange,
    ) -> Result<Vec<DateTime<Utc>>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .filter(users::created_at.ge(range.start))
            .filter(users::created_at.lt(range.end))
            .order(users::created_at.asc())
            .select(users::created_at)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}
