mod common;

use axum::http::{Method, StatusCode};
use fittrack::{app::build_app, auth::jwt::JwtKeys, state::AppState};
use serde_json::json;
use time::{Duration, OffsetDateTime};

use common::{bearer, send};

// Every request below is rejected before any query runs, so the lazy pool never connects.

fn app() -> axum::Router {
    build_app(AppState::fake())
}

fn token_for(user_id: i64) -> String {
    AppState::fake().jwt.sign(user_id).expect("sign")
}

#[tokio::test]
async fn health_is_public() {
    let (status, _) = send(app(), Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_require_header() {
    for (method, uri) in [
        (Method::GET, "/workouts"),
        (Method::GET, "/workouts/get?id=1"),
        (Method::POST, "/workouts/create"),
        (Method::PUT, "/workouts/update"),
        (Method::DELETE, "/workouts/delete?id=1"),
        (Method::GET, "/workouts/report?start_date=2024-01-01&end_date=2024-01-31"),
        (Method::GET, "/exercises"),
        (Method::POST, "/exercises/create"),
        (Method::GET, "/me"),
    ] {
        let (status, body) = send(app(), method.clone(), uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(body["error"], "Missing authorization header");
    }
}

#[tokio::test]
async fn malformed_header_is_rejected() {
    let token = token_for(42);
    for header in [
        format!("Basic {token}"),
        format!("Bearer {token} extra"),
        "Bearer".to_string(),
        token.clone(),
    ] {
        let (status, body) = send(app(), Method::GET, "/workouts", Some(&header), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid authorization header");
    }
}

#[tokio::test]
async fn token_failures_share_one_message() {
    let expired = AppState::fake()
        .jwt
        .sign_at(42, OffsetDateTime::now_utc() - Duration::hours(25))
        .unwrap();
    let foreign = JwtKeys::new("some-other-secret").sign(42).unwrap();

    for token in [expired, foreign, "not-a-token".to_string()] {
        let (status, body) =
            send(app(), Method::GET, "/workouts", Some(&bearer(&token)), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid token");
    }
}

#[tokio::test]
async fn lowercase_scheme_reaches_handler() {
    let header = format!("bearer {}", token_for(42));
    let (status, body) = send(
        app(),
        Method::DELETE,
        "/workouts/delete?id=abc",
        Some(&header),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid workout ID");
}

#[tokio::test]
async fn bad_ids_are_bad_requests() {
    let auth = bearer(&token_for(42));
    for uri in [
        "/workouts/delete",
        "/workouts/delete?id=0",
        "/workouts/get?id=-1",
        "/exercises/get?id=x",
    ] {
        let method = if uri.starts_with("/workouts/delete") {
            Method::DELETE
        } else {
            Method::GET
        };
        let (status, _) = send(app(), method, uri, Some(&auth), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[tokio::test]
async fn report_rejects_bad_dates_before_querying() {
    let auth = bearer(&token_for(42));
    for uri in [
        "/workouts/report?start_date=not-a-date&end_date=2024-01-31",
        "/workouts/report?start_date=2024-01-01",
        "/workouts/report?start_date=2024-02-01&end_date=2024-01-01",
    ] {
        let (status, body) = send(app(), Method::GET, uri, Some(&auth), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn workout_payload_is_validated() {
    let auth = bearer(&token_for(42));

    let (status, _) = send(
        app(),
        Method::POST,
        "/workouts/create",
        Some(&auth),
        Some("{not json"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let zero_sets = json!({
        "name": "Leg day",
        "scheduled_for": "2024-01-15T10:00:00Z",
        "exercises": [{ "exercise_id": 1, "sets": 0, "reps": 5 }]
    })
    .to_string();
    let (status, body) = send(
        app(),
        Method::POST,
        "/workouts/create",
        Some(&auth),
        Some(&zero_sets),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "exercises[0]: sets must be positive");

    let missing_date = json!({ "id": 1, "name": "Leg day" }).to_string();
    let (status, _) = send(
        app(),
        Method::PUT,
        "/workouts/update",
        Some(&auth),
        Some(&missing_date),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn signup_policy_is_checked_before_storage() {
    let short = json!({ "username": "lifter", "email": "lifter@example.com", "password": "short" })
        .to_string();
    let (status, body) = send(app(), Method::POST, "/signup", None, Some(&short)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Password"));

    let (status, _) = send(app(), Method::POST, "/signup", None, Some("[]")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(app(), Method::POST, "/login", None, Some("{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
