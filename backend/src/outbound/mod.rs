//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories on Diesel
//! - **memory**: in-process repositories for database-less runs and tests
//! - **uploads**: filesystem image store

pub mod memory;
pub mod persistence;
pub mod uploads;
