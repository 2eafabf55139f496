//! Database repository for lab files. Ownership is checked through a join on the parent lab.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use tracing::instrument;

use super::PgStore;
use crate::db::{
    errors::Result,
    models::lab_files::{LabFileCreateDBRequest, LabFileDBResponse},
    store::LabFileStore,
};
use crate::types::{DeveloperId, LabFileId, LabId};

#[derive(Debug, Clone, FromRow)]
struct LabFile {
    id: LabFileId,
    lab_id: LabId,
    file_name: String,
    file_path: String,
    file_type: Option<String>,
    file_size: Option<i64>,
    created_at: DateTime<Utc>,
}

impl From<LabFile> for LabFileDBResponse {
    fn from(row: LabFile) -> Self {
        Self {
            id: row.id,
            lab_id: row.lab_id,
            file_name: row.file_name,
            file_path: row.file_path,
            file_type: row.file_type,
            file_size: row.file_size,
            created_at: row.created_at,
        }
    }
}

pub struct LabFiles<'c> {
    db: &'c mut PgConnection,
}

impl<'c> LabFiles<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(lab_id = request.lab_id), err)]
    pub async fn create(&mut self, request: &LabFileCreateDBRequest) -> Result<LabFileDBResponse> {
        let row = sqlx::query_as::<_, LabFile>(
            r#"
            INSERT INTO lab_files (lab_id, file_name, file_path, file_type, file_size)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(request.lab_id)
        .bind(&request.file_name)
        .bind(&request.file_path)
        .bind(&request.file_type)
        .bind(request.file_size)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(row.into())
    }

    #[instrument(skip(self), err)]
    pub async fn list(&mut self, owner: DeveloperId, lab_id: Option<LabId>) -> Result<Vec<LabFileDBResponse>> {
        let rows = sqlx::query_as::<_, LabFile>(
            r#"
            SELECT f.* FROM lab_files f
            JOIN labs l ON l.id = f.lab_id
            WHERE l.developer_id = $1 AND ($2::bigint IS NULL OR f.lab_id = $2)
            ORDER BY f.created_at DESC, f.id DESC
            "#,
        )
        .bind(owner)
        .bind(lab_id)
        .fetch_all(&mut *self.db)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self), err)]
    pub async fn get(&mut self, id: LabFileId, owner: DeveloperId) -> Result<Option<LabFileDBResponse>> {
        let row = sqlx::query_as::<_, LabFile>(
            r#"
            SELECT f.* FROM lab_files f
            JOIN labs l ON l.id = f.lab_id
            WHERE f.id = $1 AND l.developer_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *self.db)
        .await?;
        Ok(row.map(Into::into))
    }

    #[instrument(skip(self), err)]
    pub async fn delete(&mut self, id: LabFileId, owner: DeveloperId) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM lab_files f
            USING labs l
            WHERE f.id = $1 AND l.id = f.lab_id AND l.developer_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .execute(&mut *self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl LabFileStore for PgStore {
    async fn create_lab_file(&self, request: &LabFileCreateDBRequest) -> Result<LabFileDBResponse> {
        let mut conn = self.pool().acquire().await?;
        LabFiles::new(&mut conn).create(request).await
    }

    async fn list_lab_files(&self, owner: DeveloperId, lab_id: Option<LabId>) -> Result<Vec<LabFileDBResponse>> {
        let mut conn = self.pool().acquire().await?;
        LabFiles::new(&mut conn).list(owner, lab_id).await
    }

    async fn get_lab_file(&self, id: LabFileId, owner: DeveloperId) -> Result<Option<LabFileDBResponse>> {
        let mut conn = self.pool().acquire().await?;
        LabFiles::new(&mut conn).get(id, owner).await
    }

    async fn delete_lab_file(&self, id: LabFileId, owner: DeveloperId) -> Result<bool> {
        let mut conn = self.pool().acquire().await?;
        LabFiles::new(&mut conn).delete(id, owner).await
    }
}
