use sqlx::{PgPool, Postgres, Transaction};
use time::OffsetDateTime;

use super::dto::{WorkoutExerciseInput, WorkoutInput};
use super::repo_types::{ReportRow, Workout, WorkoutExercise, WorkoutItemRow, WorkoutRow};

const WORKOUT_COLUMNS: &str =
    "id, user_id, name, description, scheduled_for, created_at, updated_at";

/// Insert line items for `workout_id` within a transaction, preserving input order.
async fn insert_line_items_tx(
    tx: &mut Transaction<'_, Postgres>,
    workout_id: i64,
    items: &[WorkoutExerciseInput],
) -> sqlx::Result<Vec<WorkoutExercise>> {
    let mut inserted = Vec::with_capacity(items.len());
    for item in items {
        let row = sqlx::query_as::<_, WorkoutExercise>(
            r#"
            INSERT INTO workout_exercises (workout_id, exercise_id, sets, reps, weight, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, workout_id, exercise_id, sets, reps, weight, notes
            "#,
        )
        .bind(workout_id)
        .bind(item.exercise_id)
        .bind(item.sets)
        .bind(item.reps)
        .bind(item.weight)
        .bind(&item.notes)
        .fetch_one(&mut **tx)
        .await?;
        inserted.push(row);
    }
    Ok(inserted)
}

/// Inserts the workout and all its line items in one transaction. Any failed insert
/// rolls the whole aggregate back.
pub async fn create(db: &PgPool, user_id: i64, input: &WorkoutInput) -> sqlx::Result<Workout> {
    let now = OffsetDateTime::now_utc();
    let mut tx = db.begin().await?;

    let row = sqlx::query_as::<_, WorkoutRow>(&format!(
        r#"
        INSERT INTO workouts (user_id, name, description, scheduled_for, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING {WORKOUT_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.scheduled_for)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    let exercises = insert_line_items_tx(&mut tx, row.id, &input.exercises).await?;
    tx.commit().await?;

    Ok(Workout::from_parts(row, exercises))
}

pub async fn get_by_id(db: &PgPool, id: i64) -> sqlx::Result<Option<Workout>> {
    let rows = sqlx::query_as::<_, WorkoutItemRow>(
        r#"
        SELECT w.id, w.user_id, w.name, w.description, w.scheduled_for,
               w.created_at, w.updated_at,
               we.id AS item_id, we.exercise_id AS item_exercise_id,
               we.sets AS item_sets, we.reps AS item_reps,
               we.weight AS item_weight, we.notes AS item_notes
          FROM workouts w
          LEFT JOIN workout_exercises we ON we.workout_id = w.id
         WHERE w.id = $1
         ORDER BY we.id ASC
        "#,
    )
    .bind(id)
    .fetch_all(db)
    .await?;

    let mut items = Vec::with_capacity(rows.len());
    let mut workout = None;
    for row in rows {
        if let Some(item) = row.item() {
            items.push(item);
        }
        if workout.is_none() {
            workout = Some(row.workout);
        }
    }

    Ok(workout.map(|w| Workout::from_parts(w, items)))
}

/// Summary rows for one user, most recently scheduled first.
pub async fn list_by_user(db: &PgPool, user_id: i64) -> sqlx::Result<Vec<WorkoutRow>> {
    sqlx::query_as::<_, WorkoutRow>(&format!(
        r#"
        SELECT {WORKOUT_COLUMNS}
          FROM workouts
         WHERE user_id = $1
         ORDER BY scheduled_for DESC, id DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
}

/// Updates the mutable fields and replaces the whole line-item set in one transaction.
/// Returns `None` when no workout with that id belongs to `user_id`.
pub async fn update(
    db: &PgPool,
    user_id: i64,
    id: i64,
    input: &WorkoutInput,
) -> sqlx::Result<Option<Workout>> {
    let now = OffsetDateTime::now_utc();
    let mut tx = db.begin().await?;

    let row = sqlx::query_as::<_, WorkoutRow>(&format!(
        r#"
        UPDATE workouts
           SET name = $1, description = $2, scheduled_for = $3, updated_at = $4
         WHERE id = $5 AND user_id = $6
        RETURNING {WORKOUT_COLUMNS}
        "#
    ))
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.scheduled_for)
    .bind(now)
    .bind(id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;

    // dropping the transaction here rolls it back
    let Some(row) = row else {
        return Ok(None);
    };

    sqlx::query("DELETE FROM workout_exercises WHERE workout_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let exercises = insert_line_items_tx(&mut tx, id, &input.exercises).await?;
    tx.commit().await?;

    Ok(Some(Workout::from_parts(row, exercises)))
}

/// Deletes the workout and its line items. Returns `false` when no workout with that
/// id belongs to `user_id`.
pub async fn delete(db: &PgPool, user_id: i64, id: i64) -> sqlx::Result<bool> {
    let mut tx = db.begin().await?;

    let owned = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM workouts WHERE id = $1 AND user_id = $2 FOR UPDATE",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;
    if owned.is_none() {
        return Ok(false);
    }

    sqlx::query("DELETE FROM workout_exercises WHERE workout_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM workouts WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(true)
}

/// Workouts of `user_id` scheduled in `[from, until)` with their line items, oldest
/// first. Workouts without line items yield one row with NULL item columns.
pub async fn report_rows(
    db: &PgPool,
    user_id: i64,
    from: OffsetDateTime,
    until: OffsetDateTime,
) -> sqlx::Result<Vec<ReportRow>> {
    sqlx::query_as::<_, ReportRow>(
        r#"
        SELECT w.id AS workout_id, w.name, w.scheduled_for,
               we.id AS line_id, we.exercise_id, we.sets, we.reps, we.weight
          FROM workouts w
          LEFT JOIN workout_exercises we ON we.workout_id = w.id
         WHERE w.user_id = $1
           AND w.scheduled_for >= $2
           AND w.scheduled_for < $3
         ORDER BY w.scheduled_for ASC, w.id ASC, we.id ASC
        "#,
    )
    .bind(user_id)
    .bind(from)
    .bind(until)
    .fetch_all(db)
    .await
}
