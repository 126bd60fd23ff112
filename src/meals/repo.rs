use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Meal, MealChanges, MealSummary, NewMeal};
use crate::session::SessionId;

/// Persistence seam for meals. Every lookup and mutation is keyed by the
/// owning session.
#[async_trait]
pub trait MealStore: Send + Sync {
    /// All meals of a session, most recent first.
    async fn list_by_session(&self, session: SessionId) -> anyhow::Result<Vec<Meal>>;
    async fn find(&self, session: SessionId, id: Uuid) -> anyhow::Result<Option<Meal>>;
    async fn insert(&self, meal: NewMeal) -> anyhow::Result<Meal>;
    /// Returns the rows that were changed; empty when nothing matched.
    async fn update(
        &self,
        session: SessionId,
        id: Uuid,
        changes: MealChanges,
    ) -> anyhow::Result<Vec<MealSummary>>;
    async fn delete(&self, session: SessionId, id: Uuid) -> anyhow::Result<Vec<MealSummary>>;
}

#[derive(Clone)]
pub struct PgMealStore {
    db: PgPool,
}

impl PgMealStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MealStore for PgMealStore {
    async fn list_by_session(&self, session: SessionId) -> anyhow::Result<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, name, description, date, diet_compliant, session_id
            FROM meals
            WHERE session_id = $1
            ORDER BY date DESC
            "#,
        )
        .bind(session.as_uuid())
        .fetch_all(&self.db)
        .await
        .context("list meals by session")?;
        Ok(rows)
    }

    async fn find(&self, session: SessionId, id: Uuid) -> anyhow::Result<Option<Meal>> {
        let row = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, name, description, date, diet_compliant, session_id
            FROM meals
            WHERE session_id = $1 AND id = $2
            "#,
        )
        .bind(session.as_uuid())
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find meal")?;
        Ok(row)
    }

    async fn insert(&self, meal: NewMeal) -> anyhow::Result<Meal> {
        let row = sqlx::query_as::<_, Meal>(
            r#"
            INSERT INTO meals (id, session_id, name, description, date, diet_compliant)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, date, diet_compliant, session_id
            "#,
        )
        .bind(meal.id)
        .bind(meal.session_id)
        .bind(&meal.name)
        .bind(&meal.description)
        .bind(meal.date)
        .bind(meal.diet_compliant)
        .fetch_one(&self.db)
        .await
        .context("insert meal")?;
        Ok(row)
    }

    async fn update(
        &self,
        session: SessionId,
        id: Uuid,
        changes: MealChanges,
    ) -> anyhow::Result<Vec<MealSummary>> {
        let rows = sqlx::query_as::<_, MealSummary>(
            r#"
            UPDATE meals
               SET name = $3, description = $4, diet_compliant = $5
             WHERE session_id = $1 AND id = $2
            RETURNING id, name
            "#,
        )
        .bind(session.as_uuid())
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.diet_compliant)
        .fetch_all(&self.db)
        .await
        .context("update meal")?;
        Ok(rows)
    }

    async fn delete(&self, session: SessionId, id: Uuid) -> anyhow::Result<Vec<MealSummary>> {
        let rows = sqlx::query_as::<_, MealSummary>(
            r#"
            DELETE FROM meals
             WHERE session_id = $1 AND id = $2
            RETURNING id, name
            "#,
        )
        .bind(session.as_uuid())
        .bind(id)
        .fetch_all(&self.db)
        .await
        .context("delete meal")?;
        Ok(rows)
    }
}
