//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the item and user repository ports backed by
//! PostgreSQL through `diesel-async` with `bb8` connection pooling.
//!
//! Row structs (`models.rs`) and table definitions (`schema.rs`) stay private
//! to this module; adapters translate them into validated domain types and
//! map driver failures onto the port error enums.
//!
//! # Example
//!
//! ```ignore
//! use lostfound::outbound::persistence::{DbPool, DieselItemRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/lostfound")).await?;
//! let items = DieselItemRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_item_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_item_repository::DieselItemRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
