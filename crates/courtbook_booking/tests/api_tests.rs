use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use courtbook_booking::{build_state, routes};
use courtbook_config::{AppConfig, DatabaseConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn app_with(url: &str, max_connections: Option<u32>) -> Router {
    let config = Arc::new(AppConfig {
        database: Some(DatabaseConfig {
            url: url.to_string(),
            max_connections,
        }),
        ..AppConfig::default()
    });
    let state = build_state(config).await.unwrap();
    routes(state)
}

// Every test gets its own private in-memory ledger
async fn app() -> Router {
    app_with("sqlite::memory:", None).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn book(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/book")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn booking(user_id: i64, name: &str, court: &str, date: &str, slot: &str) -> Value {
    json!({
        "user_id": user_id,
        "first_name": name,
        "court_type": court,
        "date": date,
        "time_slot": slot
    })
}

fn count_available(slots: &Value) -> usize {
    slots
        .as_array()
        .unwrap()
        .iter()
        .filter(|s| s["is_available"] == true)
        .count()
}

#[tokio::test]
async fn test_slots_for_empty_day() {
    let app = app().await;
    let (status, body) = send(&app, get("/slots?date=2024-06-01")).await;

    assert_eq!(status, StatusCode::OK);
    let slots = body.as_array().unwrap();
    assert_eq!(slots.len(), 36);
    assert_eq!(count_available(&body), 36);
    assert_eq!(slots[0]["court_type"], "rubber");
    assert_eq!(slots[0]["time_slot"], "06:00-07:00");
    assert_eq!(slots[35]["court_type"], "hard");
    assert_eq!(slots[35]["time_slot"], "23:00-24:00");
}

#[tokio::test]
async fn test_slots_rejects_bad_or_missing_date() {
    let app = app().await;

    let (status, body) = send(&app, get("/slots?date=01.06.2024")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 400);

    let (status, _) = send(&app, get("/slots")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_book_then_cancel_scenario() {
    let app = app().await;

    let (status, body) = send(
        &app,
        book(booking(1, "Anna", "rubber", "2024-06-01", "09:00-10:00")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Booking created successfully!");
    let booking_id = body["booking_id"].as_i64().unwrap();

    let (_, slots) = send(&app, get("/slots?date=2024-06-01")).await;
    assert_eq!(count_available(&slots), 35);
    let taken = slots
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["is_available"] == false)
        .unwrap();
    assert_eq!(taken["court_type"], "rubber");
    assert_eq!(taken["time_slot"], "09:00-10:00");
    assert_eq!(taken["booked_by"], "Anna");
    assert_eq!(taken["booking_id"], booking_id);

    let (status, body) = send(&app, delete(&format!("/booking/{booking_id}?user_id=1"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "Booking cancelled"}));

    let (_, slots) = send(&app, get("/slots?date=2024-06-01")).await;
    assert_eq!(count_available(&slots), 36);
}

#[tokio::test]
async fn test_same_user_same_day_conflicts() {
    let app = app().await;
    send(
        &app,
        book(booking(1, "Anna", "rubber", "2024-06-01", "09:00-10:00")),
    )
    .await;

    let (status, body) = send(
        &app,
        book(booking(1, "Anna", "hard", "2024-06-01", "18:00-19:00")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], 409);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("You already have a booking on this day"));
}

#[tokio::test]
async fn test_taken_slot_conflicts() {
    let app = app().await;
    send(
        &app,
        book(booking(1, "Anna", "hard", "2024-06-01", "10:00-11:00")),
    )
    .await;

    let (status, body) = send(
        &app,
        book(booking(2, "Boris", "hard", "2024-06-01", "10:00-11:00")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("This time slot is already taken"));
}

#[tokio::test]
async fn test_book_rejects_invalid_input() {
    let app = app().await;

    let cases = vec![
        booking(1, "   ", "rubber", "2024-06-01", "09:00-10:00"),
        booking(1, "Anna", "clay", "2024-06-01", "09:00-10:00"),
        booking(1, "Anna", "rubber", "2024-06-01", "05:00-06:00"),
        booking(1, "Anna", "rubber", "2024-06-01", "09:30-10:30"),
        booking(1, "Anna", "rubber", "2024-13-01", "09:00-10:00"),
        json!({"user_id": 1, "court_type": "rubber"}),
    ];
    for case in cases {
        let (status, body) = send(&app, book(case.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {case}");
        assert_eq!(body["error"]["code"], 400);
    }

    let (_, slots) = send(&app, get("/slots?date=2024-06-01")).await;
    assert_eq!(count_available(&slots), 36);
}

#[tokio::test]
async fn test_cancel_by_other_user_is_not_found() {
    let app = app().await;
    let (_, body) = send(
        &app,
        book(booking(1, "Anna", "rubber", "2024-06-01", "09:00-10:00")),
    )
    .await;
    let booking_id = body["booking_id"].as_i64().unwrap();

    let (status, body) = send(&app, delete(&format!("/booking/{booking_id}?user_id=2"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], 404);

    let (status, _) = send(&app, delete("/booking/9999?user_id=1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, slots) = send(&app, get("/slots?date=2024-06-01")).await;
    assert_eq!(count_available(&slots), 35);
}

#[tokio::test]
async fn test_cancel_requires_numeric_ids() {
    let app = app().await;

    let (status, _) = send(&app, delete("/booking/abc?user_id=1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, delete("/booking/1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_my_bookings_lists_only_upcoming() {
    let app = app().await;
    let next_year = chrono::Utc::now().date_naive() + chrono::Duration::days(365);
    let later = next_year + chrono::Duration::days(2);
    let fmt = |d: chrono::NaiveDate| d.format("%Y-%m-%d").to_string();

    send(
        &app,
        book(booking(1, "Anna", "rubber", "2020-01-01", "09:00-10:00")),
    )
    .await;
    send(
        &app,
        book(booking(1, "Anna", "hard", &fmt(later), "07:00-08:00")),
    )
    .await;
    send(
        &app,
        book(booking(1, "Anna", "rubber", &fmt(next_year), "20:00-21:00")),
    )
    .await;
    send(
        &app,
        book(booking(2, "Boris", "rubber", &fmt(later), "09:00-10:00")),
    )
    .await;

    let (status, body) = send(&app, get("/my-bookings?user_id=1")).await;
    assert_eq!(status, StatusCode::OK);
    let bookings = body.as_array().unwrap();
    assert_eq!(bookings.len(), 2);
    assert_eq!(bookings[0]["date"], fmt(next_year));
    assert_eq!(bookings[0]["time_slot"], "20:00-21:00");
    assert_eq!(bookings[1]["date"], fmt(later));
    assert_eq!(bookings[1]["court_type"], "hard");
    assert!(bookings[0].get("user_id").is_none());

    let (status, _) = send(&app, get("/my-bookings?user_id=abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_bookings_of_one_slot() {
    let app = app().await;

    let statuses = race_for_slot(&app, 8).await;

    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::OK).count(), 1);
    assert_eq!(
        statuses
            .iter()
            .filter(|s| **s == StatusCode::CONFLICT)
            .count(),
        7
    );

    let (_, slots) = send(&app, get("/slots?date=2024-06-02")).await;
    assert_eq!(count_available(&slots), 35);
}

async fn race_for_slot(app: &Router, players: i64) -> Vec<StatusCode> {
    let mut tasks = Vec::new();
    for user_id in 1..=players {
        let app = app.clone();
        tasks.push(tokio::spawn(async move {
            let request = book(booking(
                user_id,
                &format!("Player {user_id}"),
                "rubber",
                "2024-06-02",
                "07:00-08:00",
            ));
            app.oneshot(request).await.unwrap().status()
        }));
    }

    let mut statuses = Vec::new();
    for task in tasks {
        statuses.push(task.await.unwrap());
    }
    statuses
}

// A file database lets several pooled connections write at the same time
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_bookings_on_shared_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("ledger.db").display());
    let app = app_with(&url, Some(5)).await;

    let statuses = race_for_slot(&app, 16).await;

    let ok = statuses.iter().filter(|s| **s == StatusCode::OK).count();
    let conflict = statuses
        .iter()
        .filter(|s| **s == StatusCode::CONFLICT)
        .count();
    assert_eq!(ok, 1, "statuses: {statuses:?}");
    assert_eq!(conflict, 15, "statuses: {statuses:?}");

    let (status, slots) = send(&app, get("/slots?date=2024-06-02")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count_available(&slots), 35);
    let taken: Vec<_> = slots
        .as_array()
        .unwrap()
        .iter()
        .filter(|s| s["is_available"] == false)
        .collect();
    assert_eq!(taken[0]["court_type"], "rubber");
    assert_eq!(taken[0]["time_slot"], "07:00-08:00");
    assert!(taken[0]["booked_by"]
        .as_str()
        .is_some_and(|name| name.starts_with("Player ")));
}
