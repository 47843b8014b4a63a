//! SQL implementation of the booking repository

use crate::error::{classify_booking_violation, is_unique_violation, DbError};
use crate::repositories::booking::{Booking, BookingRepository, NewBooking, SlotOccupancy};
use crate::DbClient;
use chrono::NaiveDate;
use courtbook_common::models::{format_date, parse_date, ModelParseError};
use courtbook_common::{ConflictKind, CourtType, TimeSlot};
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, error, info, warn};

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        user_id INTEGER PRIMARY KEY,
        first_name TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
"#;

const CREATE_BOOKINGS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS bookings (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users (user_id),
        court_type TEXT NOT NULL CHECK (court_type IN ('rubber', 'hard')),
        date TEXT NOT NULL,
        time_slot TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        CONSTRAINT uq_bookings_user_day UNIQUE (user_id, date),
        CONSTRAINT uq_bookings_court_slot UNIQUE (court_type, date, time_slot)
    )
"#;

/// SQL implementation of the booking repository
#[derive(Debug, Clone)]
pub struct SqlBookingRepository {
    /// The database client
    db_client: DbClient,
}

impl SqlBookingRepository {
    /// Create a new SQL booking repository
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

fn decode_error(err: ModelParseError) -> DbError {
    DbError::DecodeError(err.to_string())
}

fn booking_from_row(row: &AnyRow) -> Result<Booking, DbError> {
    let court_type: String = row.try_get("court_type")?;
    let date: String = row.try_get("date")?;
    let time_slot: String = row.try_get("time_slot")?;

    Ok(Booking {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        court_type: court_type.parse().map_err(decode_error)?,
        date: parse_date(&date).map_err(decode_error)?,
        time_slot: time_slot.parse().map_err(decode_error)?,
        created_at: row.try_get("created_at")?,
    })
}

fn occupancy_from_row(row: &AnyRow) -> Result<SlotOccupancy, DbError> {
    let court_type: String = row.try_get("court_type")?;
    let time_slot: String = row.try_get("time_slot")?;

    Ok(SlotOccupancy {
        booking_id: row.try_get("booking_id")?,
        court_type: court_type.parse::<CourtType>().map_err(decode_error)?,
        time_slot: time_slot.parse::<TimeSlot>().map_err(decode_error)?,
        booked_by: row.try_get("first_name")?,
    })
}

impl BookingRepository for SqlBookingRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing booking schema");

        self.db_client.execute(CREATE_USERS_TABLE).await?;
        self.db_client.execute(CREATE_BOOKINGS_TABLE).await?;

        info!("Booking schema initialized successfully");
        Ok(())
    }

    async fn find_occupancy_for_date(&self, date: NaiveDate) -> Result<Vec<SlotOccupancy>, DbError> {
        debug!("Finding taken slots for date: {}", date);

        let query = r#"
            SELECT b.id AS booking_id, b.court_type, b.time_slot, u.first_name
            FROM bookings b
            LEFT JOIN users u ON b.user_id = u.user_id
            WHERE b.date = $1
        "#;

        let rows = sqlx::query(query)
            .bind(format_date(date))
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find taken slots: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        rows.iter().map(occupancy_from_row).collect()
    }

    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, DbError> {
        debug!(
            "Creating booking for user {} on {} {} {}",
            booking.user_id, booking.court_type, booking.date, booking.time_slot
        );

        let date = format_date(booking.date);
        let time_slot = booking.time_slot.label();
        let mut tx = self.db_client.begin().await?;

        // Write first so SQLite takes the write lock before the reads below;
        // a rollback on conflict undoes the upsert.
        sqlx::query(
            r#"
            INSERT INTO users (user_id, first_name)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET first_name = excluded.first_name
            "#,
        )
        .bind(booking.user_id)
        .bind(&booking.first_name)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("Failed to upsert user {}: {}", booking.user_id, e);
            DbError::QueryError(e.to_string())
        })?;

        let same_day = sqlx::query("SELECT id FROM bookings WHERE user_id = $1 AND date = $2")
            .bind(booking.user_id)
            .bind(&date)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;
        if same_day.is_some() {
            warn!("User {} already has a booking on {}", booking.user_id, date);
            return Err(DbError::Conflict(ConflictKind::AlreadyBookedThatDay));
        }

        let same_slot = sqlx::query(
            "SELECT id FROM bookings WHERE court_type = $1 AND date = $2 AND time_slot = $3",
        )
        .bind(booking.court_type.as_str())
        .bind(&date)
        .bind(&time_slot)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DbError::QueryError(e.to_string()))?;
        if same_slot.is_some() {
            warn!(
                "Slot {} {} {} is already taken",
                booking.court_type, date, time_slot
            );
            return Err(DbError::Conflict(ConflictKind::SlotTaken));
        }

        let row = sqlx::query(
            r#"
            INSERT INTO bookings (user_id, court_type, date, time_slot)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, court_type, date, time_slot, created_at
            "#,
        )
        .bind(booking.user_id)
        .bind(booking.court_type.as_str())
        .bind(&date)
        .bind(&time_slot)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                let kind = classify_booking_violation(&e.to_string());
                warn!("Booking rejected by unique constraint: {}", kind);
                DbError::Conflict(kind)
            } else {
                error!("Failed to insert booking: {}", e);
                DbError::QueryError(e.to_string())
            }
        })?;
        let created = booking_from_row(&row)?;

        tx.commit().await.map_err(|e| {
            if is_unique_violation(&e) {
                DbError::Conflict(classify_booking_violation(&e.to_string()))
            } else {
                DbError::TransactionError(e.to_string())
            }
        })?;

        info!("Booking {} created successfully", created.id);
        Ok(created)
    }

    async fn find_upcoming_for_user(
        &self,
        user_id: i64,
        from: NaiveDate,
    ) -> Result<Vec<Booking>, DbError> {
        debug!("Finding bookings for user {} from {}", user_id, from);

        let query = r#"
            SELECT id, user_id, court_type, date, time_slot, created_at
            FROM bookings
            WHERE user_id = $1 AND date >= $2
            ORDER BY date, time_slot
        "#;

        let rows = sqlx::query(query)
            .bind(user_id)
            .bind(format_date(from))
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find bookings: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        rows.iter().map(booking_from_row).collect()
    }

    async fn delete_owned_booking(&self, booking_id: i64, user_id: i64) -> Result<bool, DbError> {
        debug!("Deleting booking {} for user {}", booking_id, user_id);

        let result = sqlx::query("DELETE FROM bookings WHERE id = $1 AND user_id = $2")
            .bind(booking_id)
            .bind(user_id)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to delete booking: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        Ok(result.rows_affected() > 0)
    }
}
