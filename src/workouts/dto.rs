use serde::Deserialize;
use time::OffsetDateTime;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Deserialize)]
pub struct WorkoutExerciseInput {
    pub exercise_id: i64,
    pub sets: i32,
    pub reps: i32,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub notes: String,
}

/// Mutable fields of a workout plus its full line-item set. Owner is never read from
/// the payload.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkoutInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub scheduled_for: OffsetDateTime,
    #[serde(default)]
    pub exercises: Vec<WorkoutExerciseInput>,
}

impl WorkoutInput {
    pub fn validate(&mut self) -> AppResult<()> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(AppError::Validation("name is required".into()));
        }

        for (i, e) in self.exercises.iter().enumerate() {
            let problem = if e.exercise_id <= 0 {
                Some("exercise_id must be a positive id")
            } else if e.sets <= 0 {
                Some("sets must be positive")
            } else if e.reps <= 0 {
                Some("reps must be positive")
            } else if !e.weight.is_finite() || e.weight < 0.0 {
                Some("weight must be a non-negative number")
            } else {
                None
            };
            if let Some(problem) = problem {
                return Err(AppError::Validation(format!("exercises[{i}]: {problem}")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateWorkoutRequest {
    pub id: i64,
    #[serde(flatten)]
    pub workout: WorkoutInput,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}
