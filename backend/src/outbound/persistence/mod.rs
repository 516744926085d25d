//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of domain repository ports
//! backed by PostgreSQL via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories translate between Diesel rows and
//!   domain types. Scoring and authorization stay in the domain services.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are never exposed to the domain layer.
//! - **Atomic writes**: multi-row writes (a game and its players, a default
//!   rule switch) run inside one transaction.
//! - **Typed errors**: database failures become port errors; constraint
//!   violations on game writes keep their meaning.
//!
//! # Example
//!
//! ```ignore
//! use mahjong_ledger::outbound::persistence::{DbPool, DieselRuleRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/mahjong")).await?;
//! let rules = DieselRuleRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_game_repository;
mod diesel_location_repository;
mod diesel_rule_repository;
mod diesel_score_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_game_repository::DieselGameRepository;
pub use diesel_location_repository::DieselLocationRepository;
pub use diesel_rule_repository::DieselRuleRepository;
pub use diesel_score_repository::DieselScoreRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
