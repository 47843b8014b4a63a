// --- File: crates/courtbook_booking/src/logic.rs ---
use chrono::NaiveDate;
use courtbook_common::{Booking, ConflictKind, CourtType, CourtbookError, HttpStatusCode, TimeSlot};
use courtbook_db::error::DbError;
use courtbook_db::SlotOccupancy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

// --- Error Handling ---
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("{0}")]
    Conflict(ConflictKind),
    #[error("Booking not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(DbError),
}

impl From<DbError> for BookingError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Conflict(kind) => BookingError::Conflict(kind),
            other => BookingError::Storage(other),
        }
    }
}

impl HttpStatusCode for BookingError {
    fn status_code(&self) -> u16 {
        match self {
            BookingError::Conflict(_) => 409,
            BookingError::NotFound => 404,
            BookingError::Validation(_) => 400,
            BookingError::Storage(_) => 500,
        }
    }
}

impl From<BookingError> for CourtbookError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Conflict(kind) => CourtbookError::ConflictError(kind.to_string()),
            BookingError::NotFound => CourtbookError::NotFoundError("Booking not found".to_string()),
            BookingError::Validation(msg) => CourtbookError::ValidationError(msg),
            BookingError::Storage(e) => CourtbookError::DatabaseError(e.to_string()),
        }
    }
}

// --- Data Structures ---

/// One (court, slot) cell of the availability grid for a date.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SlotStatus {
    pub court_type: CourtType,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date", example = "2024-06-01"))]
    pub date: NaiveDate,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "09:00-10:00"))]
    pub time_slot: TimeSlot,
    pub is_available: bool,
    /// Display name of whoever holds the slot
    pub booked_by: Option<String>,
    pub booking_id: Option<i64>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct SlotsQuery {
    /// Date in YYYY-MM-DD format
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2024-06-01"))]
    pub date: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookSlotRequest {
    #[cfg_attr(feature = "openapi", schema(example = 123456789))]
    pub user_id: i64,
    #[cfg_attr(feature = "openapi", schema(example = "Anna"))]
    pub first_name: String,
    pub court_type: CourtType,
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2024-06-01"))]
    pub date: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "09:00-10:00"))]
    pub time_slot: TimeSlot,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookingResponse {
    pub success: bool,
    pub message: String,
    pub booking_id: i64,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct MyBookingsQuery {
    #[cfg_attr(feature = "openapi", schema(example = 123456789))]
    pub user_id: i64,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct CancelQuery {
    /// The user claiming ownership of the booking
    #[cfg_attr(feature = "openapi", schema(example = 123456789))]
    pub user_id: i64,
}

/// A user's booking as listed by `/my-bookings`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookingSummary {
    pub id: i64,
    pub court_type: CourtType,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date", example = "2024-06-01"))]
    pub date: NaiveDate,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "09:00-10:00"))]
    pub time_slot: TimeSlot,
}

impl From<Booking> for BookingSummary {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            court_type: booking.court_type,
            date: booking.date,
            time_slot: booking.time_slot,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CancellationResponse {
    pub success: bool,
    pub message: String,
}

// --- Core Logic ---

/// Builds the full availability grid for `date` from the taken slots.
///
/// Courts are the outer loop and hours the inner one, so the result always
/// has `CourtType::ALL.len() * TimeSlot::COUNT` entries in a fixed order.
pub fn enumerate_slots(date: NaiveDate, taken: &[SlotOccupancy]) -> Vec<SlotStatus> {
    let by_slot: HashMap<(CourtType, TimeSlot), &SlotOccupancy> = taken
        .iter()
        .map(|occupancy| ((occupancy.court_type, occupancy.time_slot), occupancy))
        .collect();

    let mut slots = Vec::with_capacity(CourtType::ALL.len() * TimeSlot::COUNT);
    for court_type in CourtType::ALL {
        for time_slot in TimeSlot::all() {
            let status = match by_slot.get(&(court_type, time_slot)) {
                Some(occupancy) => SlotStatus {
                    court_type,
                    date,
                    time_slot,
                    is_available: false,
                    booked_by: occupancy.booked_by.clone(),
                    booking_id: Some(occupancy.booking_id),
                },
                None => SlotStatus {
                    court_type,
                    date,
                    time_slot,
                    is_available: true,
                    booked_by: None,
                    booking_id: None,
                },
            };
            slots.push(status);
        }
    }
    slots
}
