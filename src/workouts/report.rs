use serde::Serialize;
use time::{macros::format_description, Date, OffsetDateTime};

use super::repo_types::ReportRow;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportExercise {
    pub exercise_id: i64,
    pub sets: i32,
    pub reps: i32,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkoutSummary {
    pub id: i64,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub scheduled_for: OffsetDateTime,
    pub exercises: Vec<ReportExercise>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkoutReport {
    pub start_date: String,
    pub end_date: String,
    pub total_workouts: usize,
    pub total_exercises: usize,
    pub workouts: Vec<WorkoutSummary>,
}

/// Inclusive calendar-date range of a report, interpreted in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: Date,
    pub end: Date,
}

impl ReportWindow {
    pub fn parse(start: Option<&str>, end: Option<&str>) -> AppResult<Self> {
        let start = parse_date("start_date", start)?;
        let end = parse_date("end_date", end)?;
        if start > end {
            return Err(AppError::InvalidDateRange(
                "start_date must not be after end_date".into(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Half-open instant bounds `[start 00:00, day after end 00:00)`.
    pub fn bounds(&self) -> AppResult<(OffsetDateTime, OffsetDateTime)> {
        let after_end = self
            .end
            .next_day()
            .ok_or_else(|| AppError::InvalidDateRange("end_date is out of range".into()))?;
        Ok((
            self.start.midnight().assume_utc(),
            after_end.midnight().assume_utc(),
        ))
    }
}

fn parse_date(field: &str, raw: Option<&str>) -> AppResult<Date> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::InvalidDateRange(format!("{field} is required (YYYY-MM-DD)")))?;
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map_err(|_| AppError::InvalidDateRange(format!("invalid {field}: {raw}")))
}

/// Folds ordered report rows into per-workout summaries. Rows of one workout are
/// contiguous; a row without a line item contributes the workout only.
pub fn build_report(window: &ReportWindow, rows: Vec<ReportRow>) -> WorkoutReport {
    let mut workouts: Vec<WorkoutSummary> = Vec::new();
    let mut total_exercises = 0;

    for row in rows {
        if workouts.last().map(|w| w.id) != Some(row.workout_id) {
            workouts.push(WorkoutSummary {
                id: row.workout_id,
                name: row.name.clone(),
                scheduled_for: row.scheduled_for,
                exercises: Vec::new(),
            });
        }

        let item = match (row.line_id, row.exercise_id, row.sets, row.reps, row.weight) {
            (Some(_), Some(exercise_id), Some(sets), Some(reps), Some(weight)) => {
                Some(ReportExercise {
                    exercise_id,
                    sets,
                    reps,
                    weight,
                })
            }
            _ => None,
        };
        if let (Some(item), Some(current)) = (item, workouts.last_mut()) {
            current.exercises.push(item);
            total_exercises += 1;
        }
    }

    WorkoutReport {
        start_date: window.start.to_string(),
        end_date: window.end.to_string(),
        total_workouts: workouts.len(),
        total_exercises,
        workouts,
    }
}
