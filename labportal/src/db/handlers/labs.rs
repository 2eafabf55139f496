//! Database repository for labs.
//!
//! Every statement that reads or modifies an existing lab carries `developer_id = $owner` in its
//! WHERE clause.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use tracing::instrument;

use super::PgStore;
use crate::db::{
    errors::Result,
    models::labs::{LabCreateDBRequest, LabDBResponse, LabUpdateDBRequest},
    store::LabStore,
};
use crate::types::{DeveloperId, ExperimentId, LabId};

#[derive(Debug, Clone, FromRow)]
struct Lab {
    id: LabId,
    developer_id: DeveloperId,
    name: String,
    description: Option<String>,
    experiment_id: Option<ExperimentId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Lab> for LabDBResponse {
    fn from(row: Lab) -> Self {
        Self {
            id: row.id,
            developer_id: row.developer_id,
            name: row.name,
            description: row.description,
            experiment_id: row.experiment_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct Labs<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Labs<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(owner = request.developer_id), err)]
    pub async fn create(&mut self, request: &LabCreateDBRequest) -> Result<LabDBResponse> {
        let row = sqlx::query_as::<_, Lab>(
            r#"
            INSERT INTO labs (developer_id, name, description, experiment_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(request.developer_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.experiment_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(row.into())
    }

    #[instrument(skip(self), err)]
    pub async fn list(&mut self, owner: DeveloperId) -> Result<Vec<LabDBResponse>> {
        let rows = sqlx::query_as::<_, Lab>("SELECT * FROM labs WHERE developer_id = $1 ORDER BY created_at DESC, id DESC")
            .bind(owner)
            .fetch_all(&mut *self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self), err)]
    pub async fn get(&mut self, id: LabId, owner: DeveloperId) -> Result<Option<LabDBResponse>> {
        let row = sqlx::query_as::<_, Lab>("SELECT * FROM labs WHERE id = $1 AND developer_id = $2")
            .bind(id)
            .bind(owner)
            .fetch_optional(&mut *self.db)
            .await?;
        Ok(row.map(Into::into))
    }

    #[instrument(skip(self, request), err)]
    pub async fn update(&mut self, id: LabId, owner: DeveloperId, request: &LabUpdateDBRequest) -> Result<Option<LabDBResponse>> {
        let row = sqlx::query_as::<_, Lab>(
            r#"
            UPDATE labs SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                experiment_id = COALESCE($5, experiment_id),
                updated_at = NOW()
            WHERE id = $1 AND developer_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.experiment_id)
        .fetch_optional(&mut *self.db)
        .await?;
        Ok(row.map(Into::into))
    }

    #[instrument(skip(self), err)]
    pub async fn delete(&mut self, id: LabId, owner: DeveloperId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM labs WHERE id = $1 AND developer_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&mut *self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl LabStore for PgStore {
    async fn create_lab(&self, request: &LabCreateDBRequest) -> Result<LabDBResponse> {
        let mut conn = self.pool().acquire().await?;
        Labs::new(&mut conn).create(request).await
    }

    async fn list_labs(&self, owner: DeveloperId) -> Result<Vec<LabDBResponse>> {
        let mut conn = self.pool().acquire().await?;
        Labs::new(&mut conn).list(owner).await
    }

    async fn get_lab(&self, id: LabId, owner: DeveloperId) -> Result<Option<LabDBResponse>> {
        let mut conn = self.pool().acquire().await?;
        Labs::new(&mut conn).get(id, owner).await
    }

    async fn update_lab(&self, id: LabId, owner: DeveloperId, request: &LabUpdateDBRequest) -> Result<Option<LabDBResponse>> {
        let mut conn = self.pool().acquire().await?;
        Labs::new(&mut conn).update(id, owner, request).await
    }

    async fn delete_lab(&self, id: LabId, owner: DeveloperId) -> Result<bool> {
        let mut conn = self.pool().acquire().await?;
        Labs::new(&mut conn).delete(id, owner).await
    }
}
