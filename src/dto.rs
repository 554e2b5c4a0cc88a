use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// `?id=` on single-resource routes. Kept as text so a bad value becomes our own 400.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

impl IdQuery {
    /// Positive integer id, or a validation error carrying `message`.
    pub fn parse(&self, message: &str) -> AppResult<i64> {
        self.id
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
            .ok_or_else(|| AppError::Validation(message.to_string()))
    }
}
