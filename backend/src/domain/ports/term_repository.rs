//! Port for tag and category persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{RecordId, Term, TermKind};

use super::define_port_error;

define_port_error! {
    /// Errors raised by term repository adapters.
    pub enum TermRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "term repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "term repository query failed: {message}",
    }
}

/// Storage for one family of terms.
#[async_trait]
pub trait TermRepository<K: TermKind>: Send + Sync {
    /// Persist a new term.
    async fn insert(&self, term: &Term<K>) -> Result<(), TermRepositoryError>;

    /// Fetch a term by identifier.
    async fn find_by_id(
        &self,
        id: &RecordId<Term<K>>,
    ) -> Result<Option<Term<K>>, TermRepositoryError>;

    /// Every stored term, oldest first.
    async fn list(&self) -> Result<Vec<Term<K>>, TermRepositoryError>;

    /// Replace a term's name. Returns `false` when absent.
    async fn rename(
        &self,
        id: &RecordId<Term<K>>,
        name: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, TermRepositoryError>;

    /// Remove a term. Returns `false` when absent.
    async fn delete(&self, id: &RecordId<Term<K>>) -> Result<bool, TermRepositoryError>;

    /// Number of stored terms.
    async fn count(&self) -> Result<u64, TermRepositoryError>;
}
