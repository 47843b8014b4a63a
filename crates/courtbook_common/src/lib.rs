// --- File: crates/courtbook_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod http; // HTTP error responses
pub mod logging; // Logging utilities
pub mod models; // Shared domain models

// Re-export error types and utilities for easier access
pub use error::{validation_error, CourtbookError, HttpStatusCode};

// Re-export HTTP utilities for easier access
pub use http::IntoHttpResponse;

// Re-export logging utilities for easier access
pub use logging::{init_with_config, log_result};

pub use models::{Booking, ConflictKind, CourtType, NewBooking, TimeSlot};
