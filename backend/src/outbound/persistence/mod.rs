//! PostgreSQL persistence adapters using Diesel.
//!
//! Repository implementations translate between Diesel rows and domain types
//! and carry no business logic. Row structs (`models.rs`) and the schema
//! (`schema.rs`) never leak into the domain. Connections come from a `bb8`
//! pool through `diesel-async`.
//!
//! ```ignore
//! use formly::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/formly")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_form_repository;
pub(crate) mod diesel_helpers;
mod diesel_response_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_form_repository::DieselFormRepository;
pub use diesel_response_repository::DieselResponseRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DEFAULT_CONNECTION_TIMEOUT, DEFAULT_MAX_CONNECTIONS, DbPool, PoolConfig, PoolError};
