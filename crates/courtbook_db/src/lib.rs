//! Database integration for Courtbook
//!
//! This crate owns the booking ledger: the `users` and `bookings` tables, the
//! connection pool in front of them and the repository through which the
//! service layer reads and writes bookings. It uses SQLx's `Any` driver; the
//! schema is written for SQLite.
//!
//! # Example
//!
//! ```rust,no_run
//! use courtbook_db::{BookingRepository, BookingRepositoryFactory, DbClient, RepositoryFactory};
//!
//! async fn setup_ledger() -> Result<(), Box<dyn std::error::Error>> {
//!     let db_client = DbClient::from_url("sqlite::memory:").await?;
//!     let repo = BookingRepositoryFactory::new().create_repository(db_client);
//!     repo.init_schema().await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod factory;
pub mod repositories;
pub mod repository;


// Re-export the client, factory, and repository traits for ease of use
pub use client::{DbClient, DbTransaction};
pub use error::DbError;
pub use factory::DbClientFactory;
pub use repository::RepositoryFactory;

// Re-export the repositories module components for ease of use
pub use repositories::{
    BookingRepository, BookingRepositoryFactory, SlotOccupancy, SqlBookingRepository,
};
