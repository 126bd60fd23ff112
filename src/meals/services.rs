use time::OffsetDateTime;
use tracing::{debug, info};
use uuid::Uuid;

use super::dto::MealInput;
use super::repo::MealStore;
use super::repo_types::{Meal, MealSummary, NewMeal};
use crate::{error::AppError, session::SessionId};

/// Derived per-session counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    pub total: u64,
    pub diet_compliant_total: u64,
    pub diet_not_compliant_total: u64,
    pub best_sequence: u64,
}

#[derive(Debug, Clone)]
pub struct CreatedMeal {
    pub meal: Meal,
    pub session: SessionId,
    /// Set when no session was supplied and a new one had to be issued.
    pub session_minted: bool,
}

pub fn parse_meal_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::validation("id must be a valid uuid"))
}

/// Longest run of `true` in the sequence.
pub fn best_sequence<I>(flags: I) -> u64
where
    I: IntoIterator<Item = bool>,
{
    let mut best = 0;
    let mut current = 0;
    for compliant in flags {
        current = if compliant { current + 1 } else { 0 };
        best = best.max(current);
    }
    best
}

pub async fn list(store: &dyn MealStore, session: SessionId) -> Result<Vec<Meal>, AppError> {
    Ok(store.list_by_session(session).await?)
}

pub async fn get(
    store: &dyn MealStore,
    session: SessionId,
    raw_id: &str,
) -> Result<Option<Meal>, AppError> {
    let id = parse_meal_id(raw_id)?;
    Ok(store.find(session, id).await?)
}

pub async fn create(
    store: &dyn MealStore,
    session: Option<SessionId>,
    input: MealInput,
    date: Option<OffsetDateTime>,
) -> Result<CreatedMeal, AppError> {
    let (session, session_minted) = match session {
        Some(s) => (s, false),
        None => {
            let s = SessionId::mint();
            info!(session = %s, "new session issued");
            (s, true)
        }
    };

    let meal = store
        .insert(NewMeal {
            id: Uuid::new_v4(),
            session_id: session.as_uuid(),
            name: input.name,
            description: input.description,
            date: date.unwrap_or_else(OffsetDateTime::now_utc),
            diet_compliant: input.diet_compliant,
        })
        .await?;

    info!(meal_id = %meal.id, session = %session, "meal created");
    Ok(CreatedMeal {
        meal,
        session,
        session_minted,
    })
}

pub async fn update(
    store: &dyn MealStore,
    session: SessionId,
    raw_id: &str,
    input: MealInput,
) -> Result<Vec<MealSummary>, AppError> {
    let id = parse_meal_id(raw_id)?;
    let touched = store.update(session, id, input.into()).await?;
    if touched.is_empty() {
        debug!(meal_id = %id, session = %session, "update matched no meal");
    }
    Ok(touched)
}

pub async fn delete(
    store: &dyn MealStore,
    session: SessionId,
    raw_id: &str,
) -> Result<Vec<MealSummary>, AppError> {
    let id = parse_meal_id(raw_id)?;
    let removed = store.delete(session, id).await?;
    if removed.is_empty() {
        debug!(meal_id = %id, session = %session, "delete matched no meal");
    }
    Ok(removed)
}

pub async fn metrics(store: &dyn MealStore, session: SessionId) -> Result<Metrics, AppError> {
    let mut meals = store.list_by_session(session).await?;
    // sorted here so the streak holds for any store; meals sharing a date
    // have no defined order
    meals.sort_by(|a, b| b.date.cmp(&a.date));

    let total = meals.len() as u64;
    let diet_compliant_total = meals.iter().filter(|m| m.diet_compliant).count() as u64;
    Ok(Metrics {
        total,
        diet_compliant_total,
        diet_not_compliant_total: total - diet_compliant_total,
        best_sequence: best_sequence(meals.iter().map(|m| m.diet_compliant)),
    })
}
