//! In-process record store.
//!
//! Backs every repository port with plain maps behind one mutex. Used when
//! no database URL is configured and by the HTTP test suites. Holding a
//! single lock across each write makes the blog/author dual-write atomic.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::ports::{
    BlogRepository, BlogRepositoryError, TermRepository, TermRepositoryError, UserRepository,
    UserRepositoryError,
};
use crate::domain::{
    Blog, BlogId, CreatedRange, RecordId, Term, TermKind, User, UserId, UserProfile,
};

#[derive(Debug, Clone)]
struct StoredTerm {
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    blogs: HashMap<BlogId, Blog>,
    terms: HashMap<&'static str, HashMap<Uuid, StoredTerm>>,
}

const POISONED: &str = "in-memory store lock poisoned";

fn oldest_first<T, K: Ord>(mut rows: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    rows.sort_by_key(key);
    rows
}

fn count_of(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

/// Record store held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryContentStore {
    tables: Mutex<Tables>,
}

impl InMemoryContentStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Option<MutexGuard<'_, Tables>> {
        self.tables.lock().ok()
    }

    fn users_guard(&self) -> Result<MutexGuard<'_, Tables>, UserRepositoryError> {
        self.lock().ok_or_else(|| UserRepositoryError::query(POISONED))
    }

    fn blogs_guard(&self) -> Result<MutexGuard<'_, Tables>, BlogRepositoryError> {
        self.lock().ok_or_else(|| BlogRepositoryError::query(POISONED))
    }

    fn terms_guard(&self) -> Result<MutexGuard<'_, Tables>, TermRepositoryError> {
        self.lock().ok_or_else(|| TermRepositoryError::query(POISONED))
    }
}

#[async_trait]
impl UserRepository for InMemoryContentStore {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut tables = self.users_guard()?;
        if tables.users.contains_key(&user.id) {
            return Err(UserRepositoryError::query(format!("duplicate user id {}", user.id)));
        }
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.users_guard()?.users.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let rows = self.users_guard()?.users.values().cloned().collect();
        Ok(oldest_first(rows, |user: &User| (user.created_at, user.id)))
    }

    async fn update_profile(
        &self,
        id: &UserId,
        profile: &UserProfile,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, UserRepositoryError> {
        let mut tables = self.users_guard()?;
        let Some(user) = tables.users.get_mut(id) else {
            return Ok(false);
        };
        user.profile = profile.clone();
        user.updated_at = updated_at;
        Ok(true)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
        let mut tables = self.users_guard()?;
        if tables.users.remove(id).is_none() {
            return Ok(false);
        }
        for blog in tables.blogs.values_mut() {
            if blog.author == Some(*id) {
                blog.author = None;
            }
        }
        Ok(true)
    }

    async fn count(&self) -> Result<u64, UserRepositoryError> {
        Ok(count_of(self.users_guard()?.users.len()))
    }

    async fn list_created_between(
        &self,
        range: &CreatedRange,
    ) -> Result<Vec<User>, UserRepositoryError> {
        let rows = self
            .users_guard()?
            .users
            .values()
            .filter(|user| range.contains(user.created_at))
            .cloned()
            .collect();
        Ok(oldest_first(rows, |user: &User| (user.created_at, user.id)))
    }

    async fn created_timestamps_between(
        &self,
        range: &CreatedRange,
    ) -> Result<Vec<DateTime<Utc>>, UserRepositoryError> {
        let stamps = self
            .users_guard()?
            .users
            .values()
            .map(|user| user.created_at)
            .filter(|created| range.contains(*created))
            .collect();
        Ok(oldest_first(stamps, |created| *created))
    }
}

#[async_trait]
impl BlogRepository for InMemoryContentStore {
    async fn insert(&self, blog: &Blog) -> Result<(), BlogRepositoryError> {
        let mut guard = self.blogs_guard()?;
        let tables = &mut *guard;
        if tables.blogs.contains_key(&blog.id) {
            return Err(BlogRepositoryError::query(format!("duplicate blog id {}", blog.id)));
        }
        if let Some(author) = blog.author {
            let Some(user) = tables.users.get_mut(&author) else {
                return Err(BlogRepositoryError::author_not_found(author.to_string()));
            };
            user.blogs.push(blog.id);
        }
        tables.blogs.insert(blog.id, blog.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &BlogId) -> Result<Option<Blog>, BlogRepositoryError> {
        Ok(self.blogs_guard()?.blogs.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Blog>, BlogRepositoryError> {
        let rows = self.blogs_guard()?.blogs.values().cloned().collect();
        Ok(oldest_first(rows, |blog: &Blog| (blog.created_at, blog.id)))
    }

    async fn list_by_author(&self, author: &UserId) -> Result<Vec<Blog>, BlogRepositoryError> {
        let rows = self
            .blogs_guard()?
            .blogs
            .values()
            .filter(|blog| blog.author == Some(*author))
            .cloned()
            .collect();
        Ok(oldest_first(rows, |blog: &Blog| (blog.created_at, blog.id)))
    }

    async fn update(&self, blog: &Blog) -> Result<bool, BlogRepositoryError> {
        let mut guard = self.blogs_guard()?;
        let tables = &mut *guard;
        let Some(previous) = tables.blogs.get(&blog.id).map(|stored| stored.author) else {
            return Ok(false);
        };
        if previous != blog.author {
            if let Some(new) = blog.author {
                let Some(user) = tables.users.get_mut(&new) else {
                    return Err(BlogRepositoryError::author_not_found(new.to_string()));
                };
                user.blogs.push(blog.id);
            }
            if let Some(old) = previous.and_then(|old| tables.users.get_mut(&old)) {
                old.blogs.retain(|id| *id != blog.id);
            }
        }
        if let Some(stored) = tables.blogs.get_mut(&blog.id) {
            stored.content = blog.content.clone();
            stored.image = blog.image.clone();
            stored.author = blog.author;
            stored.updated_at = blog.updated_at;
        }
        Ok(true)
    }

    async fn delete(&self, id: &BlogId) -> Result<bool, BlogRepositoryError> {
        let mut guard = self.blogs_guard()?;
        let tables = &mut *guard;
        let Some(blog) = tables.blogs.remove(id) else {
            return Ok(false);
        };
        if let Some(user) = blog.author.and_then(|author| tables.users.get_mut(&author)) {
            user.blogs.retain(|linked| linked != id);
        }
        Ok(true)
    }

    async fn count(&self) -> Result<u64, BlogRepositoryError> {
        Ok(count_of(self.blogs_guard()?.blogs.len()))
    }
}

fn term_from_row<K: TermKind>(id: Uuid, row: &StoredTerm) -> Term<K> {
    Term::from_parts(
        RecordId::from_uuid(id),
        row.name.clone(),
        row.created_at,
        row.updated_at,
    )
}

#[async_trait]
impl<K: TermKind> TermRepository<K> for InMemoryContentStore {
    async fn insert(&self, term: &Term<K>) -> Result<(), TermRepositoryError> {
        let mut tables = self.terms_guard()?;
        let table = tables.terms.entry(K::NOUN).or_default();
        let id = *term.id.as_uuid();
        if table.contains_key(&id) {
            return Err(TermRepositoryError::query(format!("duplicate {} id {id}", K::NOUN)));
        }
        table.insert(
            id,
            StoredTerm {
                name: term.name.clone(),
                created_at: term.created_at,
                updated_at: term.updated_at,
            },
        );
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &RecordId<Term<K>>,
    ) -> Result<Option<Term<K>>, TermRepositoryError> {
        let tables = self.terms_guard()?;
        let uuid = *id.as_uuid();
        Ok(tables
            .terms
            .get(K::NOUN)
            .and_then(|table| table.get(&uuid))
            .map(|row| term_from_row(uuid, row)))
    }

    async fn list(&self) -> Result<Vec<Term<K>>, TermRepositoryError> {
        let tables = self.terms_guard()?;
        let rows = tables
            .terms
            .get(K::NOUN)
            .map(|table| {
                table
                    .iter()
                    .map(|(id, row)| term_from_row(*id, row))
                    .collect()
            })
            .unwrap_or_default();
        Ok(oldest_first(rows, |term: &Term<K>| (term.created_at, term.id)))
    }

    async fn rename(
        &self,
        id: &RecordId<Term<K>>,
        name: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, TermRepositoryError> {
        let mut tables = self.terms_guard()?;
        let Some(row) = tables
            .terms
            .get_mut(K::NOUN)
            .and_then(|table| table.get_mut(id.as_uuid()))
        else {
            return Ok(false);
        };
        name.clone_into(&mut row.name);
        row.updated_at = updated_at;
        Ok(true)
    }

    async fn delete(&self, id: &RecordId<Term<K>>) -> Result<bool, TermRepositoryError> {
        let mut tables = self.terms_guard()?;
        Ok(tables
            .terms
            .get_mut(K::NOUN)
            .and_then(|table| table.remove(id.as_uuid()))
            .is_some())
    }

    async fn count(&self) -> Result<u64, TermRepositoryError> {
        let tables = self.terms_guard()?;
        Ok(count_of(tables.terms.get(K::NOUN).map_or(0, HashMap::len)))
    }
}

#[cfg(test)]
mod tests;
