use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repo::MealStore;
use super::repo_types::{Meal, MealChanges, MealSummary, NewMeal};
use crate::session::SessionId;

/// In-memory `MealStore` used by the test suite.
#[derive(Default)]
pub struct MemoryMealStore {
    rows: RwLock<Vec<Meal>>,
    calls: AtomicUsize,
}

impl MemoryMealStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn owned_by(m: &Meal, session: SessionId, id: Uuid) -> bool {
    m.session_id == session.as_uuid() && m.id == id
}

#[async_trait]
impl MealStore for MemoryMealStore {
    async fn list_by_session(&self, session: SessionId) -> anyhow::Result<Vec<Meal>> {
        self.touch();
        let mut out: Vec<Meal> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|m| m.session_id == session.as_uuid())
            .cloned()
            .collect();
        out.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(out)
    }

    async fn find(&self, session: SessionId, id: Uuid) -> anyhow::Result<Option<Meal>> {
        self.touch();
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|m| owned_by(m, session, id)).cloned())
    }

    async fn insert(&self, meal: NewMeal) -> anyhow::Result<Meal> {
        self.touch();
        let mut rows = self.rows.write().await;
        anyhow::ensure!(
            rows.iter().all(|m| m.id != meal.id),
            "duplicate key value violates unique constraint \"meals_pkey\""
        );
        let meal = Meal::from(meal);
        rows.push(meal.clone());
        Ok(meal)
    }

    async fn update(
        &self,
        session: SessionId,
        id: Uuid,
        changes: MealChanges,
    ) -> anyhow::Result<Vec<MealSummary>> {
        self.touch();
        let mut rows = self.rows.write().await;
        let mut touched = Vec::new();
        for m in rows.iter_mut().filter(|m| owned_by(m, session, id)) {
            m.name = changes.name.clone();
            m.description = changes.description.clone();
            m.diet_compliant = changes.diet_compliant;
            touched.push(MealSummary {
                id: m.id,
                name: m.name.clone(),
            });
        }
        Ok(touched)
    }

    async fn delete(&self, session: SessionId, id: Uuid) -> anyhow::Result<Vec<MealSummary>> {
        self.touch();
        let mut rows = self.rows.write().await;
        let mut removed = Vec::new();
        rows.retain(|m| {
            if owned_by(m, session, id) {
                removed.push(MealSummary {
                    id: m.id,
                    name: m.name.clone(),
                });
                false
            } else {
                true
            }
        });
        Ok(removed)
    }
}
