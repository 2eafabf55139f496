//! Database repository for experiment files.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use tracing::instrument;

use super::PgStore;
use crate::db::{
    errors::Result,
    models::experiment_files::{ExperimentFileCreateDBRequest, ExperimentFileDBResponse},
    store::ExperimentFileStore,
};
use crate::types::{DeveloperId, ExperimentFileId, ExperimentId};

#[derive(Debug, Clone, FromRow)]
struct ExperimentFile {
    id: ExperimentFileId,
    experiment_id: ExperimentId,
    file_name: String,
    file_path: String,
    file_type: Option<String>,
    developer_id: Option<DeveloperId>,
    created_at: DateTime<Utc>,
}

impl From<ExperimentFile> for ExperimentFileDBResponse {
    fn from(row: ExperimentFile) -> Self {
        Self {
            id: row.id,
            experiment_id: row.experiment_id,
            file_name: row.file_name,
            file_path: row.file_path,
            file_type: row.file_type,
            developer_id: row.developer_id,
            created_at: row.created_at,
        }
    }
}

pub struct ExperimentFiles<'c> {
    db: &'c mut PgConnection,
}

impl<'c> ExperimentFiles<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(experiment_id = request.experiment_id), err)]
    pub async fn create(&mut self, request: &ExperimentFileCreateDBRequest) -> Result<ExperimentFileDBResponse> {
        let row = sqlx::query_as::<_, ExperimentFile>(
            r#"
            INSERT INTO experiment_files (experiment_id, file_name, file_path, file_type, developer_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(request.experiment_id)
        .bind(&request.file_name)
        .bind(&request.file_path)
        .bind(&request.file_type)
        .bind(request.developer_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(row.into())
    }

    #[instrument(skip(self), err)]
    pub async fn list(&mut self, experiment_id: Option<ExperimentId>) -> Result<Vec<ExperimentFileDBResponse>> {
        let rows = sqlx::query_as::<_, ExperimentFile>(
            "SELECT * FROM experiment_files WHERE ($1::bigint IS NULL OR experiment_id = $1) ORDER BY created_at DESC, id DESC",
        )
        .bind(experiment_id)
        .fetch_all(&mut *self.db)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self), err)]
    pub async fn get(&mut self, id: ExperimentFileId) -> Result<Option<ExperimentFileDBResponse>> {
        let row = sqlx::query_as::<_, ExperimentFile>("SELECT * FROM experiment_files WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;
        Ok(row.map(Into::into))
    }

    #[instrument(skip(self), err)]
    pub async fn delete(&mut self, id: ExperimentFileId, caller: Option<DeveloperId>) -> Result<bool> {
        let result = sqlx::query("DELETE FROM experiment_files WHERE id = $1 AND (developer_id IS NULL OR developer_id = $2)")
            .bind(id)
            .bind(caller)
            .execute(&mut *self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ExperimentFileStore for PgStore {
    async fn create_experiment_file(&self, request: &ExperimentFileCreateDBRequest) -> Result<ExperimentFileDBResponse> {
        let mut conn = self.pool().acquire().await?;
        ExperimentFiles::new(&mut conn).create(request).await
    }

    async fn list_experiment_files(&self, experiment_id: Option<ExperimentId>) -> Result<Vec<ExperimentFileDBResponse>> {
        let mut conn = self.pool().acquire().await?;
        ExperimentFiles::new(&mut conn).list(experiment_id).await
    }

    async fn get_experiment_file(&self, id: ExperimentFileId) -> Result<Option<ExperimentFileDBResponse>> {
        let mut conn = self.pool().acquire().await?;
        ExperimentFiles::new(&mut conn).get(id).await
    }

    async fn delete_experiment_file(&self, id: ExperimentFileId, caller: Option<DeveloperId>) -> Result<bool> {
        let mut conn = self.pool().acquire().await?;
        ExperimentFiles::new(&mut conn).delete(id, caller).await
    }
}
