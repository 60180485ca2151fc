//! # servicehub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `servicehub-app::ports::storage`
//!   and the `TokenManager` port
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `servicehub-app` (for port traits) and `servicehub-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod device_repo;
pub mod device_template_repo;
pub mod error;
pub mod pool;
pub mod service_repo;
pub mod token_store;

pub use device_repo::SqliteDeviceRepository;
pub use device_template_repo::SqliteDeviceTemplateRepository;
pub use error::StorageError;
pub use pool::{Config, Database};
pub use service_repo::SqliteServiceRepository;
pub use token_store::SqliteTokenStore;
