//! Driving port for tag and category mutations.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{Error, RecordId, Term, TermKind};

use super::UpdateOutcome;

/// Domain use-case port for one family of terms.
#[async_trait]
pub trait TermsCommand<K: TermKind>: Send + Sync {
    /// Validate and store a new term from a `{ <nameField>: ... }` document.
    async fn create_term(&self, document: &Value) -> Result<Term<K>, Error>;

    /// Rename an existing term.
    async fn rename_term(
        &self,
        id: &RecordId<Term<K>>,
        document: &Value,
    ) -> Result<UpdateOutcome, Error>;

    /// Delete a term.
    async fn delete_term(&self, id: &RecordId<Term<K>>) -> Result<(), Error>;
}
