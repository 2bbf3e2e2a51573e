//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`ImageStore`]) are implemented by outbound
//! adapters; driving ports (`*Command`, `*Query`) are implemented by domain
//! services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod blog_repository;
mod blogs_command;
mod blogs_query;
mod image_store;
mod term_repository;
mod terms_command;
mod terms_query;
mod update_outcome;
mod user_repository;
mod users_command;
mod users_query;

#[cfg(test)]
pub use blog_repository::MockBlogRepository;
pub use blog_repository::{BlogRepository, BlogRepositoryError};
#[cfg(test)]
pub use blogs_command::MockBlogsCommand;
pub use blogs_command::{BlogSubmission, BlogsCommand};
#[cfg(test)]
pub use blogs_query::MockBlogsQuery;
pub use blogs_query::BlogsQuery;
#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{ImageStore, ImageStoreError, StagedImage, StoredImage};
pub use term_repository::{TermRepository, TermRepositoryError};
pub use terms_command::TermsCommand;
pub use terms_query::TermsQuery;
pub use update_outcome::UpdateOutcome;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::{UserSubmission, UsersCommand};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
