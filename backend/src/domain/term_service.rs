//! Tag and category domain service.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::Value;
use tracing::info;

use super::ports::{TermRepository, TermRepositoryError, TermsCommand, TermsQuery, UpdateOutcome};
use super::{Error, RecordId, Term, TermKind};

fn map_term_repository_error<K: TermKind>(error: TermRepositoryError) -> Error {
    match error {
        TermRepositoryError::Connection { message } => Error::service_unavailable(format!(
            "{} repository unavailable: {message}",
            K::NOUN
        )),
        TermRepositoryError::Query { message } => {
            Error::internal(format!("{} repository error: {message}", K::NOUN))
        }
    }
}

fn term_not_found<K: TermKind>(id: &RecordId<Term<K>>) -> Error {
    Error::not_found(format!("{} {id} not found", K::NOUN))
}

/// Service implementing the term driving ports for one [`TermKind`].
pub struct TermService<K, R> {
    terms: Arc<R>,
    clock: Arc<dyn Clock>,
    kind: PhantomData<fn() -> K>,
}

impl<K, R> TermService<K, R> {
    /// Create a new service over the given repository.
    pub fn new(terms: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            terms,
            clock,
            kind: PhantomData,
        }
    }
}

impl<K, R> Clone for TermService<K, R> {
    fn clone(&self) -> Self {
        Self {
            terms: Arc::clone(&self.terms),
            clock: Arc::clone(&self.clock),
            kind: PhantomData,
        }
    }
}

impl<K, R> TermService<K, R>
where
    K: TermKind,
    R: TermRepository<K>,
{
    async fn find_term(&self, id: &RecordId<Term<K>>) -> Result<Term<K>, Error> {
        self.terms
            .find_by_id(id)
            .await
            .map_err(map_term_repository_error::<K>)?
            .ok_or_else(|| term_not_found(id))
    }
}

#[async_trait]
impl<K, R> TermsCommand<K> for TermService<K, R>
where
    K: TermKind,
    R: TermRepository<K>,
{
    async fn create_term(&self, document: &Value) -> Result<Term<K>, Error> {
        let name = Term::<K>::name_from_document(document).map_err(Error::validation)?;
        let now = self.clock.utc();
        let term = Term::from_parts(RecordId::random(), name, now, now);
        self.terms
            .insert(&term)
            .await
            .map_err(map_term_repository_error::<K>)?;
        info!(kind = K::NOUN, id = %term.id, "term created");
        Ok(term)
    }

    async fn rename_term(
        &self,
        id: &RecordId<Term<K>>,
        document: &Value,
    ) -> Result<UpdateOutcome, Error> {
        let name = Term::<K>::name_from_document(document).map_err(Error::validation)?;
        let current = self.find_term(id).await?;
        if current.name == name {
            return Ok(UpdateOutcome::Unchanged);
        }
        let renamed = self
            .terms
            .rename(id, &name, self.clock.utc())
            .await
            .map_err(map_term_repository_error::<K>)?;
        if !renamed {
            return Err(term_not_found(id));
        }
        info!(kind = K::NOUN, %id, "term renamed");
        Ok(UpdateOutcome::Modified)
    }

    async fn delete_term(&self, id: &RecordId<Term<K>>) -> Result<(), Error> {
        let deleted = self
            .terms
            .delete(id)
            .await
            .map_err(map_term_repository_error::<K>)?;
        if !deleted {
            return Err(term_not_found(id));
        }
        info!(kind = K::NOUN, %id, "term deleted");
        Ok(())
    }
}

#[async_trait]
impl<K, R> TermsQuery<K> for TermService<K, R>
where
    K: TermKind,
    R: TermRepository<K>,
{
    async fn list_terms(&self) -> Result<Vec<Term<K>>, Error> {
        self.terms
            .list()
            .await
            .map_err(map_term_repository_error::<K>)
    }

    async fn term(&self, id: &RecordId<Term<K>>) -> Result<Term<K>, Error> {
        self.find_term(id).await
    }

    async fn count_terms(&self) -> Result<u64, Error> {
        self.terms
            .count()
            .await
            .map_err(map_term_repository_error::<K>)
    }
}
