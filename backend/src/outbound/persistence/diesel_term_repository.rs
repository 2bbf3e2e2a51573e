//! PostgreSQL-backed term repositories for tags and categories.
//!
//! The two tables differ only in the name column, so both repositories are
//! generated from one macro.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{TermRepository, TermRepositoryError};
use crate::domain::{CategoryKind, RecordId, TagKind, Term, TermKind};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::pool::{DbPool, PoolError};
use super::schema::{categories, tags};

type TermRow = (Uuid, String, DateTime<Utc>, DateTime<Utc>);

fn map_pool_error(error: PoolError) -> TermRepositoryError {
    map_basic_pool_error(error, TermRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TermRepositoryError {
    map_basic_diesel_error(error, TermRepositoryError::query, TermRepositoryError::connection)
}

fn row_to_term<K: TermKind>((id, name, created_at, updated_at): TermRow) -> Term<K> {
    Term::from_parts(RecordId::from_uuid(id), name, created_at, updated_at)
}

fn count_from(total: i64) -> u64 {
    u64::try_from(total).unwrap_or_default()
}

/// Generate a Diesel repository for one term table.
macro_rules! diesel_term_repository {
    (
        $(#[$meta:meta])*
        $repo:ident, $kind:ty, $table:ident, $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $repo {
            pool: DbPool,
        }

        impl $repo {
            pub fn new(pool: DbPool) -> Self {
                Self { pool }
            }
        }

        #[async_trait]
        impl TermRepository<$kind> for $repo {
            async fn insert(&self, term: &Term<$kind>) -> Result<(), TermRepositoryError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                diesel::insert_into($table::table)
                    .values((
                        $table::id.eq(*term.id.as_uuid()),
                        $table::$name.eq(&term.name),
                        $table::created_at.eq(term.created_at),
                        $table::updated_at.eq(term.updated_at),
                    ))
                    .execute(&mut conn)
                    .await
                    .map(|_| ())
                    .map_err(map_diesel_error)
            }

            async fn find_by_id(
                &self,
                id: &RecordId<Term<$kind>>,
            ) -> Result<Option<Term<$kind>>, TermRepositoryError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let row: Option<TermRow> = $table::table
                    .find(*id.as_uuid())
                    .select(($table::id, $table::$name, $table::created_at, $table::updated_at))
                    .first(&mut conn)
                    .await
                    .optional()
                    .map_err(map_diesel_error)?;
                Ok(row.map(row_to_term))
            }

            async fn list(&self) -> Result<Vec<Term<$kind>>, TermRepositoryError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let rows: Vec<TermRow> = $table::table
                    .order(($table::created_at.asc(), $table::id.asc()))
                    .select(($table::id, $table::$name, $table::created_at, $table::updated_at))
                    .load(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                Ok(rows.into_iter().map(row_to_term).collect())
            }

            async fn rename(
                &self,
                id: &RecordId<Term<$kind>>,
                name: &str,
                updated_at: DateTime<Utc>,
            ) -> Result<bool, TermRepositoryError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let updated = diesel::update($table::table.find(*id.as_uuid()))
                    .set(($table::$name.eq(name), $table::updated_at.eq(updated_at)))
                    .execute(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                Ok(updated > 0)
            }

            async fn delete(&self, id: &RecordId<Term<$kind>>) -> Result<bool, TermRepositoryError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let deleted = diesel::delete($table::table.find(*id.as_uuid()))
                    .execute(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                Ok(deleted > 0)
            }

            async fn count(&self) -> Result<u64, TermRepositoryError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let total: i64 = $table::table
                    .count()
                    .get_result(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                Ok(count_from(total))
            }
        }
    };
}

diesel_term_repository!(
    /// Diesel repository for blog tags.
    DieselTagRepository, TagKind, tags, tag_name
);

diesel_term_repository!(
    /// Diesel repository for blog categories.
    DieselCategoryRepository, CategoryKind, categories, category_name
);

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::Tag;

    #[rstest]
    fn rows_keep_their_timestamps() {
        let created = Utc::now();
        let id = Uuid::new_v4();

        let tag: Tag = row_to_term((id, "rust".to_owned(), created, created));

        assert_eq!(tag.id.as_uuid(), &id);
        assert_eq!((tag.created_at, tag.updated_at), (created, created));
    }

    #[rstest]
    #[case(-1, 0)]
    #[case(7, 7)]
    fn counts_never_go_negative(#[case] raw: i64, #[case] expected: u64) {
        assert_eq!(count_from(raw), expected);
    }
}
