//! Database repository for the experiment catalog.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use tracing::instrument;

use super::PgStore;
use crate::db::{
    errors::Result,
    models::experiments::{ExperimentCreateDBRequest, ExperimentDBResponse, ExperimentFilter, ExperimentUpdateDBRequest},
    store::ExperimentStore,
};
use crate::types::ExperimentId;

#[derive(Debug, Clone, FromRow)]
struct Experiment {
    id: ExperimentId,
    title: String,
    description: Option<String>,
    category: Option<String>,
    difficulty: Option<String>,
    estimated_time: Option<String>,
    path: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Experiment> for ExperimentDBResponse {
    fn from(row: Experiment) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category,
            difficulty: row.difficulty,
            estimated_time: row.estimated_time,
            path: row.path,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct Experiments<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Experiments<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(title = %request.title), err)]
    pub async fn create(&mut self, request: &ExperimentCreateDBRequest) -> Result<ExperimentDBResponse> {
        let row = sqlx::query_as::<_, Experiment>(
            r#"
            INSERT INTO experiments (title, description, category, difficulty, estimated_time, path)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.category)
        .bind(&request.difficulty)
        .bind(&request.estimated_time)
        .bind(&request.path)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(row.into())
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_id(&mut self, id: ExperimentId) -> Result<Option<ExperimentDBResponse>> {
        let row = sqlx::query_as::<_, Experiment>("SELECT * FROM experiments WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;
        Ok(row.map(Into::into))
    }

    #[instrument(skip(self, filter), fields(category = ?filter.category), err)]
    pub async fn list(&mut self, filter: &ExperimentFilter) -> Result<Vec<ExperimentDBResponse>> {
        let rows = sqlx::query_as::<_, Experiment>(
            "SELECT * FROM experiments WHERE ($1::text IS NULL OR category = $1) ORDER BY created_at DESC, id DESC",
        )
        .bind(&filter.category)
        .fetch_all(&mut *self.db)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, request), err)]
    pub async fn update(&mut self, id: ExperimentId, request: &ExperimentUpdateDBRequest) -> Result<Option<ExperimentDBResponse>> {
        let row = sqlx::query_as::<_, Experiment>(
            r#"
            UPDATE experiments SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                difficulty = COALESCE($5, difficulty),
                estimated_time = COALESCE($6, estimated_time),
                path = COALESCE($7, path),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.category)
        .bind(&request.difficulty)
        .bind(&request.estimated_time)
        .bind(&request.path)
        .fetch_optional(&mut *self.db)
        .await?;
        Ok(row.map(Into::into))
    }

    #[instrument(skip(self), err)]
    pub async fn delete(&mut self, id: ExperimentId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM experiments WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ExperimentStore for PgStore {
    async fn create_experiment(&self, request: &ExperimentCreateDBRequest) -> Result<ExperimentDBResponse> {
        let mut conn = self.pool().acquire().await?;
        Experiments::new(&mut conn).create(request).await
    }

    async fn get_experiment(&self, id: ExperimentId) -> Result<Option<ExperimentDBResponse>> {
        let mut conn = self.pool().acquire().await?;
        Experiments::new(&mut conn).get_by_id(id).await
    }

    async fn list_experiments(&self, filter: &ExperimentFilter) -> Result<Vec<ExperimentDBResponse>> {
        let mut conn = self.pool().acquire().await?;
        Experiments::new(&mut conn).list(filter).await
    }

    async fn update_experiment(&self, id: ExperimentId, request: &ExperimentUpdateDBRequest) -> Result<Option<ExperimentDBResponse>> {
        let mut conn = self.pool().acquire().await?;
        Experiments::new(&mut conn).update(id, request).await
    }

    async fn delete_experiment(&self, id: ExperimentId) -> Result<bool> {
        let mut conn = self.pool().acquire().await?;
        Experiments::new(&mut conn).delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_category_filter_and_partial_update(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Experiments::new(&mut conn);

        let sorting = repo
            .create(&ExperimentCreateDBRequest {
                title: "Sorting".to_string(),
                description: Some("Compare sorting algorithms".to_string()),
                category: Some("algorithms".to_string()),
                difficulty: Some("easy".to_string()),
                estimated_time: Some("30 min".to_string()),
                path: Some("/experiments/sorting".to_string()),
            })
            .await
            .unwrap();
        repo.create(&ExperimentCreateDBRequest {
            title: "Sockets".to_string(),
            description: None,
            category: Some("networking".to_string()),
            difficulty: None,
            estimated_time: None,
            path: None,
        })
        .await
        .unwrap();

        let algorithms = repo
            .list(&ExperimentFilter {
                category: Some("algorithms".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(algorithms.len(), 1);
        assert_eq!(repo.list(&ExperimentFilter::default()).await.unwrap().len(), 2);

        let updated = repo
            .update(
                sorting.id,
                &ExperimentUpdateDBRequest {
                    difficulty: Some("medium".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.difficulty.as_deref(), Some("medium"));
        assert_eq!(updated.title, "Sorting");

        assert!(repo.delete(sorting.id).await.unwrap());
        assert!(!repo.delete(sorting.id).await.unwrap());
    }
}
