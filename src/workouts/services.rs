use sqlx::PgPool;
use tracing::{info, warn};

use super::dto::{UpdateWorkoutRequest, WorkoutInput};
use super::repo;
use super::repo_types::{Workout, WorkoutRow};
use super::report::{build_report, ReportWindow, WorkoutReport};
use crate::error::{AppError, AppResult};

/// Only the recorded owner may read or mutate a workout.
pub(crate) fn ensure_owner(workout: &Workout, user_id: i64) -> AppResult<()> {
    if workout.user_id != user_id {
        warn!(
            workout_id = workout.id,
            owner_id = workout.user_id,
            user_id,
            "workout access by non-owner"
        );
        return Err(AppError::Unauthorized("Unauthorized"));
    }
    Ok(())
}

pub async fn create_workout(
    db: &PgPool,
    user_id: i64,
    mut input: WorkoutInput,
) -> AppResult<Workout> {
    input.validate()?;
    let workout = repo::create(db, user_id, &input).await?;
    info!(
        user_id,
        workout_id = workout.id,
        exercises = workout.exercises.len(),
        "workout created"
    );
    Ok(workout)
}

pub async fn list_workouts(db: &PgPool, user_id: i64) -> AppResult<Vec<WorkoutRow>> {
    Ok(repo::list_by_user(db, user_id).await?)
}

pub async fn get_owned_workout(db: &PgPool, user_id: i64, id: i64) -> AppResult<Workout> {
    let workout = repo::get_by_id(db, id)
        .await?
        .ok_or(AppError::NotFound("Workout not found"))?;
    ensure_owner(&workout, user_id)?;
    Ok(workout)
}

pub async fn update_workout(
    db: &PgPool,
    user_id: i64,
    req: UpdateWorkoutRequest,
) -> AppResult<Workout> {
    let UpdateWorkoutRequest { id, mut workout } = req;
    workout.validate()?;

    get_owned_workout(db, user_id, id).await?;

    // gone between the ownership check and the update
    let updated = repo::update(db, user_id, id, &workout)
        .await?
        .ok_or(AppError::NotFound("Workout not found"))?;

    info!(
        user_id,
        workout_id = id,
        exercises = updated.exercises.len(),
        "workout updated"
    );
    Ok(updated)
}

pub async fn delete_workout(db: &PgPool, user_id: i64, id: i64) -> AppResult<()> {
    get_owned_workout(db, user_id, id).await?;

    if !repo::delete(db, user_id, id).await? {
        return Err(AppError::NotFound("Workout not found"));
    }
    info!(user_id, workout_id = id, "workout deleted");
    Ok(())
}

/// Dates are validated before the database is touched.
pub async fn generate_report(
    db: &PgPool,
    user_id: i64,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> AppResult<WorkoutReport> {
    let window = ReportWindow::parse(start_date, end_date)?;
    let (from, until) = window.bounds()?;
    let rows = repo::report_rows(db, user_id, from, until).await?;
    Ok(build_report(&window, rows))
}
