// --- File: crates/courtbook_booking/src/routes.rs ---

use crate::handlers::{
    book_slot_handler, cancel_booking_handler, list_slots_handler, my_bookings_handler,
    BookingState,
};
use crate::logic::BookingError;
use crate::service::BookingService;
use axum::{
    routing::{delete, get, post},
    Router,
};
use courtbook_config::AppConfig;
use courtbook_db::{BookingRepository, BookingRepositoryFactory, DbClientFactory, RepositoryFactory};
use std::sync::Arc;
use tracing::info;

/// Connects to the configured database, creates the schema if needed and
/// wraps the ledger in a [`BookingState`].
pub async fn build_state(config: Arc<AppConfig>) -> Result<Arc<BookingState>, BookingError> {
    let db_client = DbClientFactory::new().from_app_config(&config).await?;
    info!("Connected to {}", db_client);

    let repository = BookingRepositoryFactory::new().create_repository(db_client);
    repository.init_schema().await?;

    Ok(Arc::new(BookingState {
        service: BookingService::new(repository),
    }))
}

/// Creates a router containing all booking routes.
pub fn routes(state: Arc<BookingState>) -> Router {
    Router::new()
        .route("/slots", get(list_slots_handler))
        .route("/book", post(book_slot_handler))
        .route("/my-bookings", get(my_bookings_handler))
        .route("/booking/{booking_id}", delete(cancel_booking_handler))
        .with_state(state)
}
