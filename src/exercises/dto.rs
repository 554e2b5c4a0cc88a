use serde::Deserialize;

use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct CreateExerciseRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
}

impl CreateExerciseRequest {
    pub fn validate(&mut self) -> AppResult<()> {
        self.name = self.name.trim().to_string();
        self.category = self.category.trim().to_string();
        if self.name.is_empty() {
            return Err(AppError::Validation("name is required".into()));
        }
        if self.category.is_empty() {
            return Err(AppError::Validation("category is required".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_requires_name_and_category() {
        let mut ok = CreateExerciseRequest {
            name: " Squat ".into(),
            description: String::new(),
            category: "legs".into(),
        };
        ok.validate().unwrap();
        assert_eq!(ok.name, "Squat");

        let mut missing = CreateExerciseRequest {
            name: "   ".into(),
            description: String::new(),
            category: "legs".into(),
        };
        assert!(matches!(missing.validate(), Err(AppError::Validation(_))));
    }
}
