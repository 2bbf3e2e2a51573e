//! PostgreSQL persistence adapters using Diesel.
//!
//! Row structs (`models`) and table definitions (`schema`) stay private to
//! this module; repositories translate them to domain types at the boundary.
//!
//! ```ignore
//! use cms_backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/cms")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_blog_repository;
mod diesel_term_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;
mod sql_functions;

pub use diesel_blog_repository::DieselBlogRepository;
pub use diesel_term_repository::{DieselCategoryRepository, DieselTagRepository};
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
