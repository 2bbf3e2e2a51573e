//! Driving port for tag and category reads.

use async_trait::async_trait;

use crate::domain::{Error, RecordId, Term, TermKind};

/// Domain use-case port for reading one family of terms.
#[async_trait]
pub trait TermsQuery<K: TermKind>: Send + Sync {
    /// Every term, oldest first.
    async fn list_terms(&self) -> Result<Vec<Term<K>>, Error>;

    /// A single term.
    async fn term(&self, id: &RecordId<Term<K>>) -> Result<Term<K>, Error>;

    /// Number of stored terms.
    async fn count_terms(&self) -> Result<u64, Error>;
}
