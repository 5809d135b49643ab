//! # Storage Module
//!
//! Key-value persistence for the absence reporter.
//!
//! The domain only needs one kind of persisted data: the last identity number
//! submitted for each child. It reaches storage through the
//! [`KeyValueStorage`] trait so the backing store can be swapped without
//! touching the domain.
//!
//! ## Implementations
//!
//! - **DbConnection**: SQLite via SQLx, one `key_values` table
//! - **InMemoryStorage**: process-local map, for tests and for shells that
//!   persist elsewhere

pub mod db;
pub mod memory;
pub mod traits;

pub use db::DbConnection;
pub use memory::InMemoryStorage;
pub use traits::KeyValueStorage;
