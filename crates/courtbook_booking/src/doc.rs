// --- File: crates/courtbook_booking/src/doc.rs ---
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{
    BookSlotRequest, BookingResponse, BookingSummary, CancelQuery, CancellationResponse,
    MyBookingsQuery, SlotStatus, SlotsQuery,
};
use courtbook_common::CourtType;

/// OpenAPI documentation for the booking API
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::list_slots_handler,
        crate::handlers::book_slot_handler,
        crate::handlers::my_bookings_handler,
        crate::handlers::cancel_booking_handler
    ),
    components(
        schemas(
            CourtType,
            SlotStatus,
            SlotsQuery,
            BookSlotRequest,
            BookingResponse,
            MyBookingsQuery,
            BookingSummary,
            CancelQuery,
            CancellationResponse
        )
    ),
    tags(
        (name = "Booking", description = "Tennis court availability and bookings")
    ),
    servers(
        (url = "/api", description = "Courtbook API server")
    )
)]
pub struct BookingApiDoc;
