//! # arqueo-db: Persistence and Shift Service
//!
//! Stores shifts and their transactions in SQLite (sqlx, async) and runs
//! the `arqueo-core` engine against them.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Arqueo Data Flow                                 │
//! │                                                                         │
//! │  Cashier UI / seed binary                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    arqueo-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐   ┌───────────────┐   ┌──────────────┐      │   │
//! │  │   │ ShiftService │──►│ Repositories  │──►│   Database   │      │   │
//! │  │   │ (service.rs) │   │ shift.rs      │   │  (pool.rs)   │      │   │
//! │  │   │              │   │ transaction.rs│   │  migrations  │      │   │
//! │  │   └──────┬───────┘   └───────────────┘   └──────────────┘      │   │
//! │  │          │ open_shift / close_shift / preview_close             │   │
//! │  └──────────┼──────────────────────────────────────────────────────┘   │
//! │             ▼                                                           │
//! │        arqueo-core (pure engine)                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Environment-driven configuration
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and service error types
//! - [`repository`] - Shift and transaction repositories
//! - [`service`] - Open, record, preview and close round-trips
//!
//! ## Usage
//!
//! ```rust,ignore
//! use arqueo_db::{ArqueoConfig, Database, ShiftService};
//!
//! let config = ArqueoConfig::load()?;
//! let db = Database::new(config.db_config()).await?;
//! let service = ShiftService::new(&db);
//!
//! let shift = service.open_shift("cashier-7", float).await?;
//! let closure = service.close_shift(&shift.id, counted).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ArqueoConfig, ConfigError};
pub use error::{DbError, DbResult, ServiceError, ServiceResult};
pub use pool::{Database, DbConfig};
pub use service::{NewSale, ShiftService};

pub use repository::shift::ShiftRepository;
pub use repository::transaction::TransactionRepository;
