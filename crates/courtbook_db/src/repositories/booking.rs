//! Repository for court bookings
//!
//! This module defines the booking ledger interface: the two uniqueness rules
//! (one booking per user per day, one booking per court/date/slot) are
//! enforced behind it.

use crate::error::DbError;
use chrono::NaiveDate;
use courtbook_common::{CourtType, TimeSlot};

// Re-export the shared models for convenience
pub use courtbook_common::{Booking, NewBooking};

/// A taken slot on a given date, as needed to annotate availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotOccupancy {
    pub booking_id: i64,
    pub court_type: CourtType,
    pub time_slot: TimeSlot,
    /// Display name of the owner; `None` if the user row is missing.
    pub booked_by: Option<String>,
}

/// Repository for court bookings
pub trait BookingRepository {
    /// Create the `users` and `bookings` tables if they don't already exist.
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// All taken slots for a date, in a single query.
    fn find_occupancy_for_date(
        &self,
        date: NaiveDate,
    ) -> impl std::future::Future<Output = Result<Vec<SlotOccupancy>, DbError>> + Send;

    /// Conflict-checked insert.
    ///
    /// Upserts the user's display name, checks (in this order) for an existing
    /// booking by the same user on the same date and for an existing booking of
    /// the same court/date/slot, then inserts the booking, all in one
    /// transaction. A conflict rolls the whole transaction back, display name
    /// included. Rule violations come back as [`DbError::Conflict`], also when
    /// the unique constraint rather than the pre-check catches them.
    fn create_booking(
        &self,
        booking: &NewBooking,
    ) -> impl std::future::Future<Output = Result<Booking, DbError>> + Send;

    /// Bookings of a user dated on or after `from`, ordered by date then slot.
    fn find_upcoming_for_user(
        &self,
        user_id: i64,
        from: NaiveDate,
    ) -> impl std::future::Future<Output = Result<Vec<Booking>, DbError>> + Send;

    /// Deletes a booking only if it belongs to `user_id`.
    ///
    /// # Returns
    ///
    /// `true` if a booking was deleted, `false` if none matched both ids
    fn delete_owned_booking(
        &self,
        booking_id: i64,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<bool, DbError>> + Send;
}
