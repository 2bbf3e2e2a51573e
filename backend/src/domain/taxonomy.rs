//! Tags and categories.
//!
//! Both are a single named term; they differ only in the JSON key carrying
//! the name, so one generic [`Term`] serves both.

use std::fmt;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;

use super::validation::{FieldReader, FieldViolation, Violations};
use super::{Record, RecordId};

/// Distinguishes one family of terms from another.
pub trait TermKind: Send + Sync + 'static {
    /// Lower-case singular noun, e.g. `"tag"`.
    const NOUN: &'static str;
    /// JSON key carrying the term name, e.g. `"tagName"`.
    const NAME_FIELD: &'static str;
}

/// Marker for blog tags.
#[derive(Debug)]
pub enum TagKind {}

impl TermKind for TagKind {
    const NOUN: &'static str = "tag";
    const NAME_FIELD: &'static str = "tagName";
}

/// Marker for blog categories.
#[derive(Debug)]
pub enum CategoryKind {}

impl TermKind for CategoryKind {
    const NOUN: &'static str = "category";
    const NAME_FIELD: &'static str = "categoryName";
}

/// A stored, named term.
pub struct Term<K> {
    pub id: RecordId<Term<K>>,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    kind: PhantomData<fn() -> K>,
}

/// Blog tag.
pub type Tag = Term<TagKind>;
/// Identifier of a stored [`Tag`].
pub type TagId = RecordId<Tag>;
/// Blog category.
pub type Category = Term<CategoryKind>;
/// Identifier of a stored [`Category`].
pub type CategoryId = RecordId<Category>;

impl<K: TermKind> Record for Term<K> {
    const NOUN: &'static str = K::NOUN;
}

impl<K: TermKind> Term<K> {
    /// Assemble a term from stored parts.
    pub fn from_parts(
        id: RecordId<Self>,
        name: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            created_at,
            updated_at,
            kind: PhantomData,
        }
    }

    /// Read and validate the name from a request document.
    ///
    /// # Examples
    /// ```
    /// use cms_backend::domain::Tag;
    /// use serde_json::json;
    ///
    /// assert_eq!(Tag::name_from_document(&json!({ "tagName": " rust " })), Ok("rust".to_owned()));
    /// assert!(Tag::name_from_document(&json!({ "name": "rust" })).is_err());
    /// ```
    pub fn name_from_document(document: &Value) -> Result<String, Vec<FieldViolation>> {
        let mut violations = Violations::default();
        let name = FieldReader::root(document, &mut violations).string(K::NAME_FIELD, &mut violations);
        violations.finish(name)
    }
}

impl<K> Clone for Term<K> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            kind: PhantomData,
        }
    }
}

impl<K> PartialEq for Term<K> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.created_at == other.created_at
            && self.updated_at == other.updated_at
    }
}

impl<K: TermKind> fmt::Debug for Term<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Term")
            .field("kind", &K::NOUN)
            .field("id", &self.id)
            .field("name", &self.name)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

impl<K: TermKind> Serialize for Term<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Term", 4)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field(K::NAME_FIELD, &self.name)?;
        state.serialize_field("createdAt", &self.created_at)?;
        state.serialize_field("updatedAt", &self.updated_at)?;
        state.end()
    }
}
