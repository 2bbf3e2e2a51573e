//! Typed record identifiers.
//!
//! Every stored entity is keyed by an opaque UUID. [`RecordId`] tags the UUID
//! with the entity it belongs to so a blog id cannot be passed where a user
//! id is expected.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use super::Error;

/// Entity kinds that own a [`RecordId`].
pub trait Record {
    /// Lower-case noun used in messages, e.g. `"user"`.
    const NOUN: &'static str;
}

/// Opaque identifier of a stored `T`.
pub struct RecordId<T> {
    value: Uuid,
    kind: PhantomData<fn() -> T>,
}

impl<T> RecordId<T> {
    /// Allocate a fresh random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(value: Uuid) -> Self {
        Self {
            value,
            kind: PhantomData,
        }
    }

    /// Access the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.value
    }
}

impl<T: Record> RecordId<T> {
    /// Parse a client-supplied identifier.
    ///
    /// # Examples
    /// ```
    /// use cms_backend::domain::{ErrorCode, UserId};
    ///
    /// let err = UserId::parse("not-a-uuid").expect_err("rejects garbage");
    /// assert_eq!(err.code(), ErrorCode::InvalidArgument);
    /// ```
    pub fn parse(raw: &str) -> Result<Self, Error> {
        raw.trim()
            .parse()
            .map_err(|_| Error::invalid_argument(format!("invalid {} id: {raw}", T::NOUN)))
    }
}

impl<T> Clone for RecordId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RecordId<T> {}

impl<T> PartialEq for RecordId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for RecordId<T> {}

impl<T> PartialOrd for RecordId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for RecordId<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> Hash for RecordId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for RecordId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordId").field(&self.value).finish()
    }
}

impl<T> fmt::Display for RecordId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl<T> FromStr for RecordId<T> {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self::from_uuid)
    }
}

impl<T> From<RecordId<T>> for Uuid {
    fn from(value: RecordId<T>) -> Self {
        value.value
    }
}

impl<T> Serialize for RecordId<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for RecordId<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Uuid::deserialize(deserializer).map(Self::from_uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BlogId, ErrorCode, UserId};
    use rstest::rstest;

    #[rstest]
    fn parse_accepts_surrounding_whitespace() {
        let id = UserId::parse(" 3fa85f64-5717-4562-b3fc-2c963f66afa6 ").expect("valid id");
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[rstest]
    #[case("")]
    #[case("42")]
    #[case("65f1c2d9e4b0a1b2c3d4e5f6")]
    fn parse_rejects_non_uuid_values(#[case] raw: &str) {
        let err = BlogId::parse(raw).expect_err("invalid id");
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert!(err.message().starts_with("invalid blog id"));
    }

    #[rstest]
    fn serialises_as_plain_uuid() {
        let id = UserId::from_uuid(Uuid::nil());
        let value = serde_json::to_value(id).expect("serialise id");
        assert_eq!(value, serde_json::json!("00000000-0000-0000-0000-000000000000"));
    }
}
