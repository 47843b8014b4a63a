// --- File: crates/courtbook_booking/src/handlers.rs ---
use crate::logic::{
    BookSlotRequest, BookingResponse, BookingSummary, CancelQuery, CancellationResponse,
    MyBookingsQuery, SlotStatus, SlotsQuery,
};
use crate::service::BookingService;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::Json,
};
use courtbook_common::models::parse_date;
use courtbook_common::{validation_error, CourtbookError};
use courtbook_db::SqlBookingRepository;
use std::sync::Arc;
use tracing::debug;

// Shared state for the booking handlers
pub struct BookingState {
    pub service: BookingService<SqlBookingRepository>,
}

/// Handler listing every court and hour for a date with its availability.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/slots", // Relative to /api
    params(SlotsQuery),
    responses(
        (status = 200, description = "Availability of both courts, rubber first, hours ascending", body = [SlotStatus]),
        (status = 400, description = "Missing or malformed date"),
        (status = 500, description = "Storage error")
    ),
    tag = "Booking"
))]
pub async fn list_slots_handler(
    State(state): State<Arc<BookingState>>,
    query: Result<Query<SlotsQuery>, QueryRejection>,
) -> Result<Json<Vec<SlotStatus>>, CourtbookError> {
    let Query(query) = query.map_err(|e| validation_error(e.body_text()))?;
    let date = parse_date(&query.date).map_err(validation_error)?;
    debug!("Listing slots for {}", date);

    let slots = state.service.list_slots(date).await?;
    Ok(Json(slots))
}

/// Handler booking a slot.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/book", // Relative to /api
    request_body = BookSlotRequest,
    responses(
        (status = 200, description = "Booking created", body = BookingResponse),
        (status = 400, description = "Invalid request (e.g., empty name, unknown slot, bad date)"),
        (status = 409, description = "User already booked that day, or slot taken"),
        (status = 500, description = "Storage error")
    ),
    tag = "Booking"
))]
pub async fn book_slot_handler(
    State(state): State<Arc<BookingState>>,
    payload: Result<Json<BookSlotRequest>, JsonRejection>,
) -> Result<Json<BookingResponse>, CourtbookError> {
    let Json(payload) = payload.map_err(|e| validation_error(e.body_text()))?;
    let date = parse_date(&payload.date).map_err(validation_error)?;

    let booking = state
        .service
        .create_booking(
            payload.user_id,
            &payload.first_name,
            payload.court_type,
            date,
            payload.time_slot,
        )
        .await?;

    Ok(Json(BookingResponse {
        success: true,
        message: "Booking created successfully!".to_string(),
        booking_id: booking.id,
    }))
}

/// Handler listing a user's bookings from today on.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/my-bookings", // Relative to /api
    params(MyBookingsQuery),
    responses(
        (status = 200, description = "Upcoming bookings ordered by date then slot", body = [BookingSummary]),
        (status = 400, description = "Missing or malformed user_id"),
        (status = 500, description = "Storage error")
    ),
    tag = "Booking"
))]
pub async fn my_bookings_handler(
    State(state): State<Arc<BookingState>>,
    query: Result<Query<MyBookingsQuery>, QueryRejection>,
) -> Result<Json<Vec<BookingSummary>>, CourtbookError> {
    let Query(query) = query.map_err(|e| validation_error(e.body_text()))?;

    let bookings = state.service.list_upcoming(query.user_id).await?;
    Ok(Json(bookings.into_iter().map(BookingSummary::from).collect()))
}

/// Handler cancelling a booking owned by the given user.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/booking/{booking_id}", // Relative to /api
    params(
        ("booking_id" = i64, Path, description = "The booking to cancel"),
        CancelQuery
    ),
    responses(
        (status = 200, description = "Booking cancelled", body = CancellationResponse),
        (status = 400, description = "Malformed booking_id or user_id"),
        (status = 404, description = "No such booking for this user"),
        (status = 500, description = "Storage error")
    ),
    tag = "Booking"
))]
pub async fn cancel_booking_handler(
    State(state): State<Arc<BookingState>>,
    booking_id: Result<Path<i64>, PathRejection>,
    query: Result<Query<CancelQuery>, QueryRejection>,
) -> Result<Json<CancellationResponse>, CourtbookError> {
    let Path(booking_id) = booking_id.map_err(|e| validation_error(e.body_text()))?;
    let Query(query) = query.map_err(|e| validation_error(e.body_text()))?;

    state
        .service
        .cancel_booking(booking_id, query.user_id)
        .await?;

    Ok(Json(CancellationResponse {
        success: true,
        message: "Booking cancelled".to_string(),
    }))
}
