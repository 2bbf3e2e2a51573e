//! HTTP inbound adapter exposing REST endpoints.

pub mod blogs;
pub mod counts;
pub mod error;
pub mod health;
pub mod multipart;
pub mod responses;
pub mod schemas;
pub mod state;
pub mod terms;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
