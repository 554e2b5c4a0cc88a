use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::CreateExerciseRequest;
use super::repo::{self, Exercise};
use crate::{
    auth::AuthUser,
    dto::IdQuery,
    error::{AppError, AppResult},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/exercises", get(list_exercises))
        .route("/exercises/get", get(get_exercise))
        .route("/exercises/create", post(create_exercise))
}

#[instrument(skip(state))]
pub async fn list_exercises(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> AppResult<Json<Vec<Exercise>>> {
    Ok(Json(repo::list_all(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn get_exercise(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(q): Query<IdQuery>,
) -> AppResult<Json<Exercise>> {
    let id = q.parse("Invalid exercise ID")?;
    let exercise = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("Exercise not found"))?;
    Ok(Json(exercise))
}

#[instrument(skip(state, payload))]
pub async fn create_exercise(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<CreateExerciseRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Exercise>)> {
    let Json(mut payload) = payload?;
    payload.validate()?;

    let exercise = repo::create(
        &state.db,
        &payload.name,
        &payload.description,
        &payload.category,
    )
    .await?;

    info!(user_id, exercise_id = exercise.id, "exercise created");
    Ok((StatusCode::CREATED, Json(exercise)))
}
