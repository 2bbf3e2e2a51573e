//! Domain primitives, aggregates and services.
//!
//! Purpose: define the content model (users, blogs, tags, categories), the
//! validation rules applied to submitted documents, the registration
//! analytics, and the services that implement the driving ports. Nothing in
//! this module knows about HTTP or SQL.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Blog, Tag, Category and their typed ids.
//! - Granularity, ReferencePeriod, RegistrationBucket, CreatedRange.
//! - UserService, BlogService, TermService.

pub mod analytics;
pub mod blog;
mod blog_service;
pub mod error;
pub mod image_upload;
pub mod ports;
pub mod record_id;
pub mod taxonomy;
mod term_service;
pub mod trace_id;
pub mod user;
mod user_service;
pub mod validation;

pub use self::analytics::{
    CreatedRange, Granularity, REPORTING_OFFSET_SECONDS, ReferencePeriod, RegistrationBucket,
    UnknownGranularity, reporting_offset,
};
pub use self::blog::{AUTHOR_ID_FIELD, Blog, BlogContent, BlogDraft, BlogId};
pub use self::blog_service::BlogService;
pub use self::error::{Error, ErrorCode};
pub use self::image_upload::IMAGE_FIELD;
pub use self::record_id::{Record, RecordId};
pub use self::taxonomy::{
    Category, CategoryId, CategoryKind, Tag, TagId, TagKind, Term, TermKind,
};
pub use self::term_service::TermService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{User, UserDetail, UserId, UserProfile};
pub use self::user_service::UserService;
pub use self::validation::FieldViolation;
