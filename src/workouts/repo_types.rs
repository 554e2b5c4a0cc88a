use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// A `workouts` row on its own; the summary view returned by listings.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WorkoutRow {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub scheduled_for: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct WorkoutExercise {
    pub id: i64,
    pub workout_id: i64,
    pub exercise_id: i64,
    pub sets: i32,
    pub reps: i32,
    pub weight: f64,
    pub notes: String,
}

/// A workout together with its line items, in insertion order.
#[derive(Debug, Clone, Serialize)]
pub struct Workout {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub scheduled_for: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub exercises: Vec<WorkoutExercise>,
}

impl Workout {
    pub fn from_parts(row: WorkoutRow, exercises: Vec<WorkoutExercise>) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            description: row.description,
            scheduled_for: row.scheduled_for,
            created_at: row.created_at,
            updated_at: row.updated_at,
            exercises,
        }
    }
}

/// One row of `workouts LEFT JOIN workout_exercises`; the item columns are NULL when
/// the workout has no line items.
#[derive(Debug, FromRow)]
pub struct WorkoutItemRow {
    #[sqlx(flatten)]
    pub workout: WorkoutRow,
    pub item_id: Option<i64>,
    pub item_exercise_id: Option<i64>,
    pub item_sets: Option<i32>,
    pub item_reps: Option<i32>,
    pub item_weight: Option<f64>,
    pub item_notes: Option<String>,
}

impl WorkoutItemRow {
    /// The line item carried by this row, if the right side of the join matched.
    pub fn item(&self) -> Option<WorkoutExercise> {
        let id = self.item_id.filter(|id| *id != 0)?;
        Some(WorkoutExercise {
            id,
            workout_id: self.workout.id,
            exercise_id: self.item_exercise_id?,
            sets: self.item_sets?,
            reps: self.item_reps?,
            weight: self.item_weight?,
            notes: self.item_notes.clone().unwrap_or_default(),
        })
    }
}

/// Report query row; `line_id` is NULL for a workout without line items.
#[derive(Debug, Clone, FromRow)]
pub struct ReportRow {
    pub workout_id: i64,
    pub name: String,
    pub scheduled_for: OffsetDateTime,
    pub line_id: Option<i64>,
    pub exercise_id: Option<i64>,
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    pub weight: Option<f64>,
}
