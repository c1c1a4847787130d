//! # ecohub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `ecohub-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `ecohub-app` (for port traits) and `ecohub-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod device_repo;
pub mod energy_record_repo;
pub mod error;
pub mod pool;

pub use device_repo::SqliteDeviceRepository;
pub use energy_record_repo::SqliteEnergyRecordRepository;
pub use pool::{Config, Database};
