use axum::{extract::rejection::JsonRejection, Json};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo_types::{Meal, MealChanges, MealSummary};
use super::services::Metrics;
use crate::error::AppError;

/// Request body for PUT /meal/:id.
#[derive(Debug, Deserialize)]
pub struct MealBody {
    pub name: String,
    pub description: String,
    pub diet_compliant: bool,
}

/// Request body for POST /meal. `date` is optional and defaults to now.
#[derive(Debug, Deserialize)]
pub struct CreateMealBody {
    pub name: String,
    pub description: String,
    pub diet_compliant: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
}

/// Shape-checked meal fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealInput {
    pub name: String,
    pub description: String,
    pub diet_compliant: bool,
}

impl MealInput {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        diet_compliant: bool,
    ) -> Result<Self, AppError> {
        let name = name.into();
        let description = description.into();
        if name.trim().is_empty() {
            return Err(AppError::validation("name must be a non-empty string"));
        }
        if description.trim().is_empty() {
            return Err(AppError::validation("description must be a non-empty string"));
        }
        Ok(Self {
            name,
            description,
            diet_compliant,
        })
    }
}

impl From<MealInput> for MealChanges {
    fn from(i: MealInput) -> Self {
        Self {
            name: i.name,
            description: i.description,
            diet_compliant: i.diet_compliant,
        }
    }
}

impl TryFrom<MealBody> for MealInput {
    type Error = AppError;

    fn try_from(b: MealBody) -> Result<Self, Self::Error> {
        MealInput::new(b.name, b.description, b.diet_compliant)
    }
}

/// Unwraps a JSON body, turning axum's rejection into a validation error.
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(v)| v)
        .map_err(|rej| AppError::Validation(rej.body_text()))
}

#[derive(Debug, Serialize)]
pub struct MealsResponse {
    pub meals: Vec<Meal>,
}

#[derive(Debug, Serialize)]
pub struct MealResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal: Option<Meal>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    pub total_meals: u64,
    pub diet_compliant_total: u64,
    pub diet_not_compliant_meals: u64,
    pub best_sequence: u64,
}

impl From<Metrics> for MetricsResponse {
    fn from(m: Metrics) -> Self {
        Self {
            total_meals: m.total,
            diet_compliant_total: m.diet_compliant_total,
            diet_not_compliant_meals: m.diet_not_compliant_total,
            best_sequence: m.best_sequence,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedMealResponse {
    pub updated_meal: Vec<MealSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedMealResponse {
    pub deleted_meal: Vec<MealSummary>,
}
