//! Database repository for developer accounts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Connection, FromRow, PgConnection};
use tracing::instrument;

use super::PgStore;
use crate::db::{
    errors::{DbError, Result},
    models::developers::{DeveloperCreateDBRequest, DeveloperDBResponse, DeveloperDeleteOutcome, DeveloperUpdateDBRequest},
    store::DeveloperStore,
};
use crate::types::{DeveloperId, Operation, Role};

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct Developer {
    id: DeveloperId,
    name: String,
    last_name: Option<String>,
    email: String,
    password_hash: String,
    role: String,
    profile_image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Developer> for DeveloperDBResponse {
    fn from(row: Developer) -> Self {
        Self {
            id: row.id,
            name: row.name,
            last_name: row.last_name,
            email: row.email,
            password_hash: row.password_hash,
            role: Role::from(row.role),
            profile_image: row.profile_image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct Developers<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Developers<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(email = %request.email), err)]
    pub async fn create(&mut self, request: &DeveloperCreateDBRequest) -> Result<DeveloperDBResponse> {
        let row = sqlx::query_as::<_, Developer>(
            r#"
            INSERT INTO developers (name, last_name, email, password_hash, role, profile_image)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(request.last_name.as_deref())
        .bind(&request.email)
        .bind(&request.password_hash)
        .bind(request.role.as_str())
        .bind(&request.profile_image)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(row.into())
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_id(&mut self, id: DeveloperId) -> Result<Option<DeveloperDBResponse>> {
        let row = sqlx::query_as::<_, Developer>("SELECT * FROM developers WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;
        Ok(row.map(Into::into))
    }

    #[instrument(skip(self, email), err)]
    pub async fn get_by_email(&mut self, email: &str) -> Result<Option<DeveloperDBResponse>> {
        let row = sqlx::query_as::<_, Developer>("SELECT * FROM developers WHERE lower(email) = lower($1)")
            .bind(email)
            .fetch_optional(&mut *self.db)
            .await?;
        Ok(row.map(Into::into))
    }

    #[instrument(skip(self), err)]
    pub async fn list(&mut self) -> Result<Vec<DeveloperDBResponse>> {
        let rows = sqlx::query_as::<_, Developer>("SELECT * FROM developers ORDER BY created_at DESC, id DESC")
            .fetch_all(&mut *self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self), err)]
    pub async fn first_admin(&mut self) -> Result<Option<DeveloperDBResponse>> {
        let row = sqlx::query_as::<_, Developer>("SELECT * FROM developers WHERE role = $1 ORDER BY created_at ASC, id ASC LIMIT 1")
            .bind(Role::ADMIN)
            .fetch_optional(&mut *self.db)
            .await?;
        Ok(row.map(Into::into))
    }

    /// Lock every admin row until the surrounding transaction ends and return their ids
    async fn lock_admins(&mut self) -> Result<Vec<DeveloperId>> {
        let ids = sqlx::query_scalar::<_, DeveloperId>("SELECT id FROM developers WHERE role = $1 ORDER BY id FOR UPDATE")
            .bind(Role::ADMIN)
            .fetch_all(&mut *self.db)
            .await?;
        Ok(ids)
    }

    #[instrument(skip(self, request), err)]
    pub async fn update(&mut self, id: DeveloperId, request: &DeveloperUpdateDBRequest) -> Result<Option<DeveloperDBResponse>> {
        let mut tx = self.db.begin().await?;

        if request.role.as_ref().is_some_and(|role| !role.is_admin()) {
            let admins = Developers::new(&mut tx).lock_admins().await?;
            if admins.len() <= 1 && admins.contains(&id) {
                return Err(DbError::ProtectedEntity {
                    operation: Operation::Update,
                    reason: "Cannot remove the admin role from the last admin account".to_string(),
                    entity_type: "developer".to_string(),
                    entity_id: Some(id.to_string()),
                });
            }
        }

        let row = sqlx::query_as::<_, Developer>(
            r#"
            UPDATE developers SET
                name = COALESCE($2, name),
                last_name = CASE WHEN $8 THEN $3 ELSE last_name END,
                email = COALESCE($4, email),
                role = COALESCE($5, role),
                password_hash = COALESCE($6, password_hash),
                profile_image = COALESCE($7, profile_image),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(&request.last_name)
        .bind(&request.email)
        .bind(request.role.as_ref().map(Role::as_str))
        .bind(&request.password_hash)
        .bind(&request.profile_image)
        .bind(request.last_name.is_some())
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row.map(Into::into))
    }

    /// Delete unless the account is the last admin.
    ///
    /// Admin rows are locked before the role check, so two concurrent deletes of the final two
    /// admins serialize and the second one sees a single remaining admin.
    #[instrument(skip(self), err)]
    pub async fn delete(&mut self, id: DeveloperId) -> Result<DeveloperDeleteOutcome> {
        let mut tx = self.db.begin().await?;

        let admins = Developers::new(&mut tx).lock_admins().await?;

        let role = sqlx::query_scalar::<_, String>("SELECT role FROM developers WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(role) = role else {
            tx.rollback().await?;
            return Ok(DeveloperDeleteOutcome::NotFound);
        };

        if Role::from(role).is_admin() && admins.len() <= 1 {
            tx.rollback().await?;
            return Ok(DeveloperDeleteOutcome::LastAdmin);
        }

        sqlx::query("DELETE FROM developers WHERE id = $1").bind(id).execute(&mut *tx).await?;
        tx.commit().await?;

        Ok(DeveloperDeleteOutcome::Deleted)
    }
}

#[async_trait]
impl DeveloperStore for PgStore {
    async fn create_developer(&self, request: &DeveloperCreateDBRequest) -> Result<DeveloperDBResponse> {
        let mut conn = self.pool().acquire().await?;
        Developers::new(&mut conn).create(request).await
    }

    async fn get_developer(&self, id: DeveloperId) -> Result<Option<DeveloperDBResponse>> {
        let mut conn = self.pool().acquire().await?;
        Developers::new(&mut conn).get_by_id(id).await
    }

    async fn get_developer_by_email(&self, email: &str) -> Result<Option<DeveloperDBResponse>> {
        let mut conn = self.pool().acquire().await?;
        Developers::new(&mut conn).get_by_email(email).await
    }

    async fn list_developers(&self) -> Result<Vec<DeveloperDBResponse>> {
        let mut conn = self.pool().acquire().await?;
        Developers::new(&mut conn).list().await
    }

    async fn first_admin(&self) -> Result<Option<DeveloperDBResponse>> {
        let mut conn = self.pool().acquire().await?;
        Developers::new(&mut conn).first_admin().await
    }

    async fn update_developer(&self, id: DeveloperId, request: &DeveloperUpdateDBRequest) -> Result<Option<DeveloperDBResponse>> {
        let mut conn = self.pool().acquire().await?;
        Developers::new(&mut conn).update(id, request).await
    }

    async fn delete_developer(&self, id: DeveloperId) -> Result<DeveloperDeleteOutcome> {
        let mut conn = self.pool().acquire().await?;
        Developers::new(&mut conn).delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    fn create_request(email: &str, role: Role) -> DeveloperCreateDBRequest {
        DeveloperCreateDBRequest {
            name: "Test".to_string(),
            last_name: Some("Developer".to_string()),
            email: email.to_string(),
            password_hash: "$argon2id$v=19$m=128,t=1,p=1$c2FsdA$aGFzaA".to_string(),
            role,
            profile_image: None,
        }
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_unique_index_is_case_insensitive(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Developers::new(&mut conn);

        repo.create(&create_request("ann@x.com", Role::developer())).await.unwrap();
        let err = repo.create(&create_request("ANN@X.COM", Role::developer())).await.unwrap_err();
        assert!(err.is_duplicate_email());

        let found = repo.get_by_email("Ann@x.com").await.unwrap().unwrap();
        assert_eq!(found.email, "ann@x.com");
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_last_admin_guard(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Developers::new(&mut conn);

        let first = repo.create(&create_request("a1@x.com", Role::admin())).await.unwrap();
        let second = repo.create(&create_request("a2@x.com", Role::admin())).await.unwrap();
        let dev = repo.create(&create_request("dev@x.com", Role::developer())).await.unwrap();

        assert_eq!(repo.delete(dev.id).await.unwrap(), DeveloperDeleteOutcome::Deleted);
        assert_eq!(repo.delete(first.id).await.unwrap(), DeveloperDeleteOutcome::Deleted);
        assert_eq!(repo.delete(second.id).await.unwrap(), DeveloperDeleteOutcome::LastAdmin);
        assert_eq!(repo.delete(first.id).await.unwrap(), DeveloperDeleteOutcome::NotFound);

        let demote = DeveloperUpdateDBRequest {
            role: Some(Role::developer()),
            ..Default::default()
        };
        assert!(matches!(repo.update(second.id, &demote).await, Err(DbError::ProtectedEntity { .. })));
        assert!(repo.get_by_id(second.id).await.unwrap().unwrap().role.is_admin());
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_concurrent_deletes_keep_one_admin(pool: PgPool) {
        let (first, second) = {
            let mut conn = pool.acquire().await.unwrap();
            let mut repo = Developers::new(&mut conn);
            let first = repo.create(&create_request("a1@x.com", Role::admin())).await.unwrap();
            let second = repo.create(&create_request("a2@x.com", Role::admin())).await.unwrap();
            (first, second)
        };

        let store = PgStore::new(pool.clone());
        let (r1, r2) = tokio::join!(store.delete_developer(first.id), store.delete_developer(second.id));
        let outcomes = [r1.unwrap(), r2.unwrap()];

        assert!(outcomes.contains(&DeveloperDeleteOutcome::Deleted));
        assert!(outcomes.contains(&DeveloperDeleteOutcome::LastAdmin));
        assert!(store.first_admin().await.unwrap().is_some());
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_partial_update(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Developers::new(&mut conn);
        let dev = repo.create(&create_request("dev@x.com", Role::developer())).await.unwrap();

        let update = DeveloperUpdateDBRequest {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        let updated = repo.update(dev.id, &update).await.unwrap().unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.email, "dev@x.com");
        assert_eq!(updated.last_name.as_deref(), Some("Developer"));

        let clear = DeveloperUpdateDBRequest {
            last_name: Some(None),
            ..Default::default()
        };
        let cleared = repo.update(dev.id, &clear).await.unwrap().unwrap();
        assert!(cleared.last_name.is_none());
        assert_eq!(cleared.name, "Renamed");

        assert!(repo.update(dev.id + 1000, &update).await.unwrap().is_none());
    }
}
