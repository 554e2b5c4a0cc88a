use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::dto::{ReportQuery, UpdateWorkoutRequest, WorkoutInput};
use super::repo_types::{Workout, WorkoutRow};
use super::report::WorkoutReport;
use super::services;
use crate::{auth::AuthUser, dto::IdQuery, error::AppResult, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/workouts", get(list_workouts))
        .route("/workouts/get", get(get_workout))
        .route("/workouts/create", post(create_workout))
        .route("/workouts/update", post(update_workout).put(update_workout))
        .route("/workouts/delete", post(delete_workout).delete(delete_workout))
        .route("/workouts/report", get(workout_report))
}

#[instrument(skip(state))]
pub async fn list_workouts(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<WorkoutRow>>> {
    Ok(Json(services::list_workouts(&state.db, user_id).await?))
}

#[instrument(skip(state))]
pub async fn get_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<IdQuery>,
) -> AppResult<Json<Workout>> {
    let id = q.parse("Invalid workout ID")?;
    Ok(Json(services::get_owned_workout(&state.db, user_id, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<WorkoutInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Workout>)> {
    let Json(payload) = payload?;
    let workout = services::create_workout(&state.db, user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(workout)))
}

#[instrument(skip(state, payload))]
pub async fn update_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<UpdateWorkoutRequest>, JsonRejection>,
) -> AppResult<Json<Workout>> {
    let Json(payload) = payload?;
    Ok(Json(services::update_workout(&state.db, user_id, payload).await?))
}

#[instrument(skip(state))]
pub async fn delete_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<IdQuery>,
) -> AppResult<StatusCode> {
    let id = q.parse("Invalid workout ID")?;
    services::delete_workout(&state.db, user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn workout_report(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<ReportQuery>,
) -> AppResult<Json<WorkoutReport>> {
    let report = services::generate_report(
        &state.db,
        user_id,
        q.start_date.as_deref(),
        q.end_date.as_deref(),
    )
    .await?;
    Ok(Json(report))
}
