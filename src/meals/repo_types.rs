use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Meal record in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub diet_compliant: bool,
    pub session_id: Uuid,
}

/// Fully-formed row ready for insertion.
#[derive(Debug, Clone)]
pub struct NewMeal {
    pub id: Uuid,
    pub session_id: Uuid,
    pub name: String,
    pub description: String,
    pub date: OffsetDateTime,
    pub diet_compliant: bool,
}

impl From<NewMeal> for Meal {
    fn from(m: NewMeal) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            date: m.date,
            diet_compliant: m.diet_compliant,
            session_id: m.session_id,
        }
    }
}

/// Mutable columns; id, date and session_id are fixed at creation.
#[derive(Debug, Clone)]
pub struct MealChanges {
    pub name: String,
    pub description: String,
    pub diet_compliant: bool,
}

/// Rows touched by an update or delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MealSummary {
    pub id: Uuid,
    pub name: String,
}
