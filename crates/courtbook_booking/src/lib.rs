// --- File: crates/courtbook_booking/src/lib.rs ---
// Declare modules within this crate
pub mod doc;
pub mod handlers;
pub mod logic;
pub mod routes;
pub mod service;

pub use logic::{enumerate_slots, BookingError, SlotStatus};
pub use routes::{build_state, routes};
pub use service::BookingService;
