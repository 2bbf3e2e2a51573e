//! PostgreSQL-backed `BlogRepository`.
//!
//! Linking a blog to its author touches two tables: the blog row and the
//! author's `blog_ids` array. Inserts, author changes and deletes do both
//! inside one transaction so neither side is ever visible without the other.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::ports::{BlogRepository, BlogRepositoryError};
use crate::domain::{Blog, BlogContent, BlogId, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{BlogChangeset, BlogRow, NewBlogRow};
use super::pool::{DbPool, PoolError};
use super::schema::{blogs, users};
use super::sql_functions::{array_append, array_remove};

/// Diesel implementation of [`BlogRepository`].
#[derive(Clone)]
pub struct DieselBlogRepository {
    pool: DbPool,
}

impl DieselBlogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside a linking transaction.
#[derive(Debug)]
enum LinkError {
    Diesel(diesel::result::Error),
    AuthorMissing(Uuid),
}

impl From<diesel::result::Error> for LinkError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

fn map_pool_error(error: PoolError) -> BlogRepositoryError {
    map_basic_pool_error(error, BlogRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> BlogRepositoryError {
    map_basic_diesel_error(error, BlogRepositoryError::query, BlogRepositoryError::connection)
}

fn map_link_error(error: LinkError) -> BlogRepositoryError {
    match error {
        LinkError::Diesel(error) => map_diesel_error(error),
        LinkError::AuthorMissing(author) => BlogRepositoryError::author_not_found(author.to_string()),
    }
}

fn row_to_blog(row: BlogRow) -> Blog {
    Blog {
        id: BlogId::from_uuid(row.id),
        content: BlogContent {
            title: row.title,
            description: row.description,
            category: row.category,
            tags: row.tags,
        },
        author: row.author_id.map(UserId::from_uuid),
        image: row.image,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn new_row(blog: &Blog) -> NewBlogRow<'_> {
    NewBlogRow {
        id: *blog.id.as_uuid(),
        title: &blog.content.title,
        description: &blog.content.description,
        category: &blog.content.category,
        tags: &blog.content.tags,
        author_id: blog.author.map(|author| *author.as_uuid()),
        image: blog.image.as_deref(),
        created_at: blog.created_at,
        updated_at: blog.updated_at,
    }
}

#[async_trait]
impl BlogRepository for DieselBlogRepository {
    async fn insert(&self, blog: &Blog) -> Result<(), BlogRepositoryError> {
        let row = new_row(blog);
        let blog_id = row.id;
        let author = row.author_id;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let result = conn
            .transaction::<_, LinkError, _>(|conn| {
                async move {
                    if let Some(author) = author {
                        let linked = diesel::update(users::table.find(author))
                            .set(users::blog_ids.eq(array_append(users::blog_ids, blog_id)))
                            .execute(conn)
                            .await?;
                        if linked == 0 {
                            return Err(LinkError::AuthorMissing(author));
                        }
                    }
                    diesel::insert_into(blogs::table)
                        .values(&row)
                        .execute(conn)
                        .await?;
                    Ok(())
                }
                .scope_boxed()
            })
            .await;

        if let Err(error) = &result {
            warn!(%blog_id, ?author, ?error, "blog insert rolled back");
        }
        result.map_err(map_link_error)
    }

    async fn find_by_id(&self, id: &BlogId) -> Result<Option<Blog>, BlogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<BlogRow> = blogs::table
            .find(*id.as_uuid())
            .select(BlogRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_blog))
    }

    async fn list(&self) -> Result<Vec<Blog>, BlogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = blogs::table
            .order((blogs::created_at.asc(), blogs::id.asc()))
            .select(BlogRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_blog).collect())
    }

    async fn list_by_author(&self, author: &UserId) -> Result<Vec<Blog>, BlogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = blogs::table
            .filter(blogs::author_id.eq(*author.as_uuid()))
            .order((blogs::created_at.asc(), blogs::id.asc()))
            .select(BlogRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_blog).collect())
    }

    async fn update(&self, blog: &Blog) -> Result<bool, BlogRepositoryError> {
        let blog_id = *blog.id.as_uuid();
        let author = blog.author.map(|author| *author.as_uuid());
        let changes = BlogChangeset {
            title: &blog.content.title,
            description: &blog.content.description,
            category: &blog.content.category,
            tags: &blog.content.tags,
            image: blog.image.as_deref(),
            author_id: author,
            updated_at: blog.updated_at,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let result = conn
            .transaction::<_, LinkError, _>(|conn| {
                async move {
                    let previous: Option<Option<Uuid>> = blogs::table
                        .find(blog_id)
                        .select(blogs::author_id)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(previous) = previous else {
                        return Ok(false);
                    };
                    if previous != author {
                        if let Some(old) = previous {
                            diesel::update(users::table.find(old))
                                .set(users::blog_ids.eq(array_remove(users::blog_ids, blog_id)))
                                .execute(conn)
                                .await?;
                        }
                        if let Some(new) = author {
                            let linked = diesel::update(users::table.find(new))
                                .set(users::blog_ids.eq(array_append(users::blog_ids, blog_id)))
                                .execute(conn)
                                .await?;
                            if linked == 0 {
                                return Err(LinkError::AuthorMissing(new));
                            }
                        }
                    }
                    diesel::update(blogs::table.find(blog_id))
                        .set(&changes)
                        .execute(conn)
                        .await?;
                    Ok(true)
                }
                .scope_boxed()
            })
            .await;

        if let Err(error) = &result {
            warn!(%blog_id, ?author, ?error, "blog update rolled back");
        }
        result.map_err(map_link_error)
    }

    async fn delete(&self, id: &BlogId) -> Result<bool, BlogRepositoryError> {
        let blog_id = *id.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let removed: Option<Option<Uuid>> = diesel::delete(blogs::table.find(blog_id))
                        .returning(blogs::author_id)
                        .get_result(conn)
                        .await
                        .optional()?;
                    let Some(author) = removed else {
                        return Ok(false);
                    };
                    if let Some(author) = author {
                        diesel::update(users::table.find(author))
                            .set(users::blog_ids.eq(array_remove(users::blog_ids, blog_id)))
                            .execute(conn)
                            .await?;
                    }
                    Ok(true)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        debug!(%blog_id, deleted, "blog delete finished");
        Ok(deleted)
    }

    async fn count(&self) -> Result<u64, BlogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = blogs::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(u64::try_from(total).unwrap_or_default())
    }
}
