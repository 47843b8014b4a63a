// --- File: crates/courtbook_booking/src/service.rs ---
use crate::logic::{enumerate_slots, BookingError, SlotStatus};
use chrono::{NaiveDate, Utc};
use courtbook_common::{Booking, CourtType, NewBooking, TimeSlot};
use courtbook_db::BookingRepository;
use tracing::{debug, info, warn};

/// Booking operations on top of a [`BookingRepository`].
#[derive(Debug, Clone)]
pub struct BookingService<R> {
    repository: R,
}

impl<R: BookingRepository + Sync> BookingService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Availability of every court and hour on `date`.
    pub async fn list_slots(&self, date: NaiveDate) -> Result<Vec<SlotStatus>, BookingError> {
        let taken = self.repository.find_occupancy_for_date(date).await?;
        debug!("{} of the slots on {} are taken", taken.len(), date);
        Ok(enumerate_slots(date, &taken))
    }

    /// Books a slot for a user, recording `first_name` as their display name.
    ///
    /// # Errors
    ///
    /// * `BookingError::Validation` if the trimmed name is empty
    /// * `BookingError::Conflict` if the user already has a booking that day,
    ///   or the slot is taken
    pub async fn create_booking(
        &self,
        user_id: i64,
        first_name: &str,
        court_type: CourtType,
        date: NaiveDate,
        time_slot: TimeSlot,
    ) -> Result<Booking, BookingError> {
        let first_name = first_name.trim();
        if first_name.is_empty() {
            warn!("Rejected booking for user {}: empty first name", user_id);
            return Err(BookingError::Validation(
                "first_name must not be empty".to_string(),
            ));
        }

        let booking = self
            .repository
            .create_booking(&NewBooking {
                user_id,
                first_name: first_name.to_string(),
                court_type,
                date,
                time_slot,
            })
            .await?;

        info!(
            "User {} booked {} court on {} at {}",
            user_id, court_type, date, time_slot
        );
        Ok(booking)
    }

    /// Bookings of a user from today (UTC) on.
    pub async fn list_upcoming(&self, user_id: i64) -> Result<Vec<Booking>, BookingError> {
        self.list_upcoming_from(user_id, Utc::now().date_naive())
            .await
    }

    /// Bookings of a user dated on or after `today`, ordered by date then slot.
    pub async fn list_upcoming_from(
        &self,
        user_id: i64,
        today: NaiveDate,
    ) -> Result<Vec<Booking>, BookingError> {
        Ok(self
            .repository
            .find_upcoming_for_user(user_id, today)
            .await?)
    }

    /// Cancels a booking on behalf of its owner.
    ///
    /// Unknown bookings and bookings of other users both yield
    /// `BookingError::NotFound`.
    pub async fn cancel_booking(&self, booking_id: i64, user_id: i64) -> Result<(), BookingError> {
        if self
            .repository
            .delete_owned_booking(booking_id, user_id)
            .await?
        {
            info!("Booking {} cancelled by user {}", booking_id, user_id);
            Ok(())
        } else {
            warn!(
                "Booking {} not found for user {}, nothing cancelled",
                booking_id, user_id
            );
            Err(BookingError::NotFound)
        }
    }
}
