//! In-memory store.
//!
//! All tables live behind a single lock, so multi-row rules (unique emails, the last-admin guard,
//! cascading deletes) are applied atomically. Constraint failures are reported with the same
//! [`DbError`] variants the Postgres schema produces. Data is lost on restart.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use super::errors::{DbError, Result};
use super::models::{
    developers::{DeveloperCreateDBRequest, DeveloperDBResponse, DeveloperDeleteOutcome, DeveloperUpdateDBRequest},
    experiment_files::{ExperimentFileCreateDBRequest, ExperimentFileDBResponse},
    experiments::{ExperimentCreateDBRequest, ExperimentDBResponse, ExperimentFilter, ExperimentUpdateDBRequest},
    lab_files::{LabFileCreateDBRequest, LabFileDBResponse},
    labs::{LabCreateDBRequest, LabDBResponse, LabUpdateDBRequest},
};
use super::store::{DeveloperStore, ExperimentFileStore, ExperimentStore, LabFileStore, LabStore, Store};
use crate::types::{DeveloperId, ExperimentFileId, ExperimentId, LabFileId, LabId, Operation, Role};

#[derive(Default)]
struct Tables {
    next_id: i64,
    developers: BTreeMap<DeveloperId, DeveloperDBResponse>,
    experiments: BTreeMap<ExperimentId, ExperimentDBResponse>,
    labs: BTreeMap<LabId, LabDBResponse>,
    lab_files: BTreeMap<LabFileId, LabFileDBResponse>,
    experiment_files: BTreeMap<ExperimentFileId, ExperimentFileDBResponse>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn email_taken(&self, email: &str, except: Option<DeveloperId>) -> bool {
        let email = email.to_lowercase();
        self.developers
            .values()
            .any(|d| Some(d.id) != except && d.email.to_lowercase() == email)
    }

    fn admin_count(&self) -> usize {
        self.developers.values().filter(|d| d.role.is_admin()).count()
    }

    fn owns_lab(&self, lab_id: LabId, owner: DeveloperId) -> bool {
        self.labs.get(&lab_id).is_some_and(|lab| lab.developer_id == owner)
    }

    fn remove_lab(&mut self, lab_id: LabId) {
        self.labs.remove(&lab_id);
        self.lab_files.retain(|_, file| file.lab_id != lab_id);
    }
}

fn duplicate_email() -> DbError {
    DbError::UniqueViolation {
        constraint: Some("developers_email_lower_key".to_string()),
        table: Some("developers".to_string()),
        message: "duplicate key value violates unique constraint \"developers_email_lower_key\"".to_string(),
    }
}

fn missing_reference(table: &str, constraint: &str) -> DbError {
    DbError::ForeignKeyViolation {
        constraint: Some(constraint.to_string()),
        table: Some(table.to_string()),
        message: format!("insert or update on table \"{table}\" violates foreign key constraint \"{constraint}\""),
    }
}

fn check_role(role: &Role) -> Result<()> {
    if role.as_str().trim().is_empty() {
        return Err(DbError::CheckViolation {
            constraint: Some("developers_role_not_empty".to_string()),
            table: Some("developers".to_string()),
            message: "new row for relation \"developers\" violates check constraint \"developers_role_not_empty\"".to_string(),
        });
    }
    Ok(())
}

/// Process-local [`Store`] implementation.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DeveloperStore for MemoryStore {
    async fn create_developer(&self, request: &DeveloperCreateDBRequest) -> Result<DeveloperDBResponse> {
        check_role(&request.role)?;
        let mut tables = self.tables.write();
        if tables.email_taken(&request.email, None) {
            return Err(duplicate_email());
        }

        let now = Utc::now();
        let developer = DeveloperDBResponse {
            id: tables.allocate_id(),
            name: request.name.clone(),
            last_name: request.last_name.clone(),
            email: request.email.clone(),
            password_hash: request.password_hash.clone(),
            role: request.role.clone(),
            profile_image: request.profile_image.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.developers.insert(developer.id, developer.clone());
        Ok(developer)
    }

    async fn get_developer(&self, id: DeveloperId) -> Result<Option<DeveloperDBResponse>> {
        Ok(self.tables.read().developers.get(&id).cloned())
    }

    async fn get_developer_by_email(&self, email: &str) -> Result<Option<DeveloperDBResponse>> {
        let email = email.to_lowercase();
        Ok(self
            .tables
            .read()
            .developers
            .values()
            .find(|d| d.email.to_lowercase() == email)
            .cloned())
    }

    async fn list_developers(&self) -> Result<Vec<DeveloperDBResponse>> {
        Ok(self.tables.read().developers.values().rev().cloned().collect())
    }

    async fn first_admin(&self) -> Result<Option<DeveloperDBResponse>> {
        Ok(self.tables.read().developers.values().find(|d| d.role.is_admin()).cloned())
    }

    async fn update_developer(&self, id: DeveloperId, request: &DeveloperUpdateDBRequest) -> Result<Option<DeveloperDBResponse>> {
        if let Some(role) = &request.role {
            check_role(role)?;
        }

        let mut tables = self.tables.write();
        let Some(current) = tables.developers.get(&id).cloned() else {
            return Ok(None);
        };

        if let Some(email) = &request.email
            && tables.email_taken(email, Some(id))
        {
            return Err(duplicate_email());
        }

        let demotes_admin = current.role.is_admin() && request.role.as_ref().is_some_and(|r| !r.is_admin());
        if demotes_admin && tables.admin_count() <= 1 {
            return Err(DbError::ProtectedEntity {
                operation: Operation::Update,
                reason: "Cannot remove the admin role from the last admin account".to_string(),
                entity_type: "developer".to_string(),
                entity_id: Some(id.to_string()),
            });
        }

        let mut updated = current;
        if let Some(name) = &request.name {
            updated.name = name.clone();
        }
        if let Some(last_name) = &request.last_name {
            updated.last_name = last_name.clone();
        }
        if let Some(email) = &request.email {
            updated.email = email.clone();
        }
        if let Some(role) = &request.role {
            updated.role = role.clone();
        }
        if let Some(hash) = &request.password_hash {
            updated.password_hash = hash.clone();
        }
        if let Some(image) = &request.profile_image {
            updated.profile_image = Some(image.clone());
        }
        updated.updated_at = Utc::now();

        tables.developers.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete_developer(&self, id: DeveloperId) -> Result<DeveloperDeleteOutcome> {
        let mut tables = self.tables.write();
        let Some(developer) = tables.developers.get(&id) else {
            return Ok(DeveloperDeleteOutcome::NotFound);
        };
        if developer.role.is_admin() && tables.admin_count() <= 1 {
            return Ok(DeveloperDeleteOutcome::LastAdmin);
        }

        tables.developers.remove(&id);

        // ON DELETE CASCADE for labs, SET NULL for uploaded experiment files
        let owned: Vec<LabId> = tables.labs.values().filter(|lab| lab.developer_id == id).map(|lab| lab.id).collect();
        for lab_id in owned {
            tables.remove_lab(lab_id);
        }
        for file in tables.experiment_files.values_mut() {
            if file.developer_id == Some(id) {
                file.developer_id = None;
            }
        }

        Ok(DeveloperDeleteOutcome::Deleted)
    }
}

#[async_trait]
impl ExperimentStore for MemoryStore {
    async fn create_experiment(&self, request: &ExperimentCreateDBRequest) -> Result<ExperimentDBResponse> {
        let mut tables = self.tables.write();
        let now = Utc::now();
        let experiment = ExperimentDBResponse {
            id: tables.allocate_id(),
            title: request.title.clone(),
            description: request.description.clone(),
            category: request.category.clone(),
            difficulty: request.difficulty.clone(),
            estimated_time: request.estimated_time.clone(),
            path: request.path.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.experiments.insert(experiment.id, experiment.clone());
        Ok(experiment)
    }

    async fn get_experiment(&self, id: ExperimentId) -> Result<Option<ExperimentDBResponse>> {
        Ok(self.tables.read().experiments.get(&id).cloned())
    }

    async fn list_experiments(&self, filter: &ExperimentFilter) -> Result<Vec<ExperimentDBResponse>> {
        Ok(self
            .tables
            .read()
            .experiments
            .values()
            .rev()
            .filter(|e| filter.category.is_none() || e.category == filter.category)
            .cloned()
            .collect())
    }

    async fn update_experiment(&self, id: ExperimentId, request: &ExperimentUpdateDBRequest) -> Result<Option<ExperimentDBResponse>> {
        let mut tables = self.tables.write();
        let Some(experiment) = tables.experiments.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = &request.title {
            experiment.title = title.clone();
        }
        if let Some(description) = &request.description {
            experiment.description = Some(description.clone());
        }
        if let Some(category) = &request.category {
            experiment.category = Some(category.clone());
        }
        if let Some(difficulty) = &request.difficulty {
            experiment.difficulty = Some(difficulty.clone());
        }
        if let Some(estimated_time) = &request.estimated_time {
            experiment.estimated_time = Some(estimated_time.clone());
        }
        if let Some(path) = &request.path {
            experiment.path = Some(path.clone());
        }
        experiment.updated_at = Utc::now();

        Ok(Some(experiment.clone()))
    }

    async fn delete_experiment(&self, id: ExperimentId) -> Result<bool> {
        let mut tables = self.tables.write();
        if tables.experiments.remove(&id).is_none() {
            return Ok(false);
        }

        tables.experiment_files.retain(|_, file| file.experiment_id != id);
        for lab in tables.labs.values_mut() {
            if lab.experiment_id == Some(id) {
                lab.experiment_id = None;
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl LabStore for MemoryStore {
    async fn create_lab(&self, request: &LabCreateDBRequest) -> Result<LabDBResponse> {
        let mut tables = self.tables.write();
        if !tables.developers.contains_key(&request.developer_id) {
            return Err(missing_reference("labs", "labs_developer_id_fkey"));
        }
        if let Some(experiment_id) = request.experiment_id
            && !tables.experiments.contains_key(&experiment_id)
        {
            return Err(missing_reference("labs", "labs_experiment_id_fkey"));
        }

        let now = Utc::now();
        let lab = LabDBResponse {
            id: tables.allocate_id(),
            developer_id: request.developer_id,
            name: request.name.clone(),
            description: request.description.clone(),
            experiment_id: request.experiment_id,
            created_at: now,
            updated_at: now,
        };
        tables.labs.insert(lab.id, lab.clone());
        Ok(lab)
    }

    async fn list_labs(&self, owner: DeveloperId) -> Result<Vec<LabDBResponse>> {
        Ok(self
            .tables
            .read()
            .labs
            .values()
            .rev()
            .filter(|lab| lab.developer_id == owner)
            .cloned()
            .collect())
    }

    async fn get_lab(&self, id: LabId, owner: DeveloperId) -> Result<Option<LabDBResponse>> {
        Ok(self.tables.read().labs.get(&id).filter(|lab| lab.developer_id == owner).cloned())
    }

    async fn update_lab(&self, id: LabId, owner: DeveloperId, request: &LabUpdateDBRequest) -> Result<Option<LabDBResponse>> {
        let mut tables = self.tables.write();
        if !tables.owns_lab(id, owner) {
            return Ok(None);
        }
        if let Some(experiment_id) = request.experiment_id
            && !tables.experiments.contains_key(&experiment_id)
        {
            return Err(missing_reference("labs", "labs_experiment_id_fkey"));
        }

        let Some(lab) = tables.labs.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &request.name {
            lab.name = name.clone();
        }
        if let Some(description) = &request.description {
            lab.description = Some(description.clone());
        }
        if let Some(experiment_id) = request.experiment_id {
            lab.experiment_id = Some(experiment_id);
        }
        lab.updated_at = Utc::now();

        Ok(Some(lab.clone()))
    }

    async fn delete_lab(&self, id: LabId, owner: DeveloperId) -> Result<bool> {
        let mut tables = self.tables.write();
        if !tables.owns_lab(id, owner) {
            return Ok(false);
        }
        tables.remove_lab(id);
        Ok(true)
    }
}

#[async_trait]
impl LabFileStore for MemoryStore {
    async fn create_lab_file(&self, request: &LabFileCreateDBRequest) -> Result<LabFileDBResponse> {
        let mut tables = self.tables.write();
        if !tables.labs.contains_key(&request.lab_id) {
            return Err(missing_reference("lab_files", "lab_files_lab_id_fkey"));
        }

        let file = LabFileDBResponse {
            id: tables.allocate_id(),
            lab_id: request.lab_id,
            file_name: request.file_name.clone(),
            file_path: request.file_path.clone(),
            file_type: request.file_type.clone(),
            file_size: request.file_size,
            created_at: Utc::now(),
        };
        tables.lab_files.insert(file.id, file.clone());
        Ok(file)
    }

    async fn list_lab_files(&self, owner: DeveloperId, lab_id: Option<LabId>) -> Result<Vec<LabFileDBResponse>> {
        let tables = self.tables.read();
        Ok(tables
            .lab_files
            .values()
            .rev()
            .filter(|file| lab_id.is_none_or(|lab_id| file.lab_id == lab_id))
            .filter(|file| tables.owns_lab(file.lab_id, owner))
            .cloned()
            .collect())
    }

    async fn get_lab_file(&self, id: LabFileId, owner: DeveloperId) -> Result<Option<LabFileDBResponse>> {
        let tables = self.tables.read();
        Ok(tables.lab_files.get(&id).filter(|file| tables.owns_lab(file.lab_id, owner)).cloned())
    }

    async fn delete_lab_file(&self, id: LabFileId, owner: DeveloperId) -> Result<bool> {
        let mut tables = self.tables.write();
        let owned = tables.lab_files.get(&id).is_some_and(|file| tables.owns_lab(file.lab_id, owner));
        if owned {
            tables.lab_files.remove(&id);
        }
        Ok(owned)
    }
}

#[async_trait]
impl ExperimentFileStore for MemoryStore {
    async fn create_experiment_file(&self, request: &ExperimentFileCreateDBRequest) -> Result<ExperimentFileDBResponse> {
        let mut tables = self.tables.write();
        if !tables.experiments.contains_key(&request.experiment_id) {
            return Err(missing_reference("experiment_files", "experiment_files_experiment_id_fkey"));
        }
        if let Some(developer_id) = request.developer_id
            && !tables.developers.contains_key(&developer_id)
        {
            return Err(missing_reference("experiment_files", "experiment_files_developer_id_fkey"));
        }

        let file = ExperimentFileDBResponse {
            id: tables.allocate_id(),
            experiment_id: request.experiment_id,
            file_name: request.file_name.clone(),
            file_path: request.file_path.clone(),
            file_type: request.file_type.clone(),
            developer_id: request.developer_id,
            created_at: Utc::now(),
        };
        tables.experiment_files.insert(file.id, file.clone());
        Ok(file)
    }

    async fn list_experiment_files(&self, experiment_id: Option<ExperimentId>) -> Result<Vec<ExperimentFileDBResponse>> {
        Ok(self
            .tables
            .read()
            .experiment_files
            .values()
            .rev()
            .filter(|file| experiment_id.is_none_or(|id| file.experiment_id == id))
            .cloned()
            .collect())
    }

    async fn get_experiment_file(&self, id: ExperimentFileId) -> Result<Option<ExperimentFileDBResponse>> {
        Ok(self.tables.read().experiment_files.get(&id).cloned())
    }

    async fn delete_experiment_file(&self, id: ExperimentFileId, caller: Option<DeveloperId>) -> Result<bool> {
        let mut tables = self.tables.write();
        let deletable = tables
            .experiment_files
            .get(&id)
            .is_some_and(|file| file.developer_id.is_none() || file.developer_id == caller);
        if deletable {
            tables.experiment_files.remove(&id);
        }
        Ok(deletable)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn init(&self) -> Result<()> {
        Ok(())
    }

    async fn close(&self) {}

    fn kind(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn developer(email: &str, role: Role) -> DeveloperCreateDBRequest {
        DeveloperCreateDBRequest {
            name: "Test".to_string(),
            last_name: None,
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            role,
            profile_image: None,
        }
    }

    fn lab(owner: DeveloperId, name: &str) -> LabCreateDBRequest {
        LabCreateDBRequest {
            developer_id: owner,
            name: name.to_string(),
            description: None,
            experiment_id: None,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_case_insensitive() {
        let store = MemoryStore::new();
        store.create_developer(&developer("ann@x.com", Role::developer())).await.unwrap();

        let err = store.create_developer(&developer("ANN@x.com", Role::developer())).await.unwrap_err();
        assert!(err.is_duplicate_email());
        assert!(store.get_developer_by_email("Ann@X.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn last_admin_cannot_be_deleted() {
        let store = MemoryStore::new();
        let admin = store.create_developer(&developer("root@x.com", Role::admin())).await.unwrap();
        let dev = store.create_developer(&developer("dev@x.com", Role::developer())).await.unwrap();

        assert_eq!(store.delete_developer(admin.id).await.unwrap(), DeveloperDeleteOutcome::LastAdmin);
        assert!(store.get_developer(admin.id).await.unwrap().is_some());

        assert_eq!(store.delete_developer(dev.id).await.unwrap(), DeveloperDeleteOutcome::Deleted);
        assert_eq!(store.delete_developer(dev.id).await.unwrap(), DeveloperDeleteOutcome::NotFound);
    }

    #[tokio::test]
    async fn non_last_admin_can_be_deleted() {
        let store = MemoryStore::new();
        let first = store.create_developer(&developer("a1@x.com", Role::admin())).await.unwrap();
        let second = store.create_developer(&developer("a2@x.com", Role::admin())).await.unwrap();

        assert_eq!(store.delete_developer(first.id).await.unwrap(), DeveloperDeleteOutcome::Deleted);
        assert_eq!(store.delete_developer(second.id).await.unwrap(), DeveloperDeleteOutcome::LastAdmin);
    }

    #[tokio::test]
    async fn last_admin_cannot_be_demoted() {
        let store = MemoryStore::new();
        let admin = store.create_developer(&developer("root@x.com", Role::admin())).await.unwrap();

        let update = DeveloperUpdateDBRequest {
            role: Some(Role::developer()),
            ..Default::default()
        };
        let err = store.update_developer(admin.id, &update).await.unwrap_err();
        assert!(matches!(err, DbError::ProtectedEntity { .. }));

        // Keeping the role while editing other fields is fine
        let update = DeveloperUpdateDBRequest {
            name: Some("Root".to_string()),
            role: Some(Role::admin()),
            ..Default::default()
        };
        let updated = store.update_developer(admin.id, &update).await.unwrap().unwrap();
        assert_eq!(updated.name, "Root");
    }

    #[tokio::test]
    async fn labs_are_scoped_to_their_owner() {
        let store = MemoryStore::new();
        let a = store.create_developer(&developer("a@x.com", Role::developer())).await.unwrap();
        let b = store.create_developer(&developer("b@x.com", Role::developer())).await.unwrap();
        let created = store.create_lab(&lab(a.id, "sorting")).await.unwrap();

        assert!(store.get_lab(created.id, b.id).await.unwrap().is_none());
        assert!(store.get_lab(created.id, a.id).await.unwrap().is_some());
        assert!(!store.delete_lab(created.id, b.id).await.unwrap());
        assert!(store.list_labs(b.id).await.unwrap().is_empty());
        assert_eq!(store.list_labs(a.id).await.unwrap().len(), 1);

        let update = LabUpdateDBRequest {
            name: Some("stolen".to_string()),
            ..Default::default()
        };
        assert!(store.update_lab(created.id, b.id, &update).await.unwrap().is_none());
        assert_eq!(store.get_lab(created.id, a.id).await.unwrap().unwrap().name, "sorting");
    }

    #[tokio::test]
    async fn lab_files_follow_parent_ownership() {
        let store = MemoryStore::new();
        let a = store.create_developer(&developer("a@x.com", Role::developer())).await.unwrap();
        let b = store.create_developer(&developer("b@x.com", Role::developer())).await.unwrap();
        let lab = store.create_lab(&lab(a.id, "graphs")).await.unwrap();

        let file = store
            .create_lab_file(&LabFileCreateDBRequest {
                lab_id: lab.id,
                file_name: "bfs.py".to_string(),
                file_path: "labs/graphs/bfs.py".to_string(),
                file_type: Some("text/x-python".to_string()),
                file_size: Some(120),
            })
            .await
            .unwrap();

        assert!(store.get_lab_file(file.id, b.id).await.unwrap().is_none());
        assert!(store.list_lab_files(b.id, Some(lab.id)).await.unwrap().is_empty());
        assert_eq!(store.list_lab_files(a.id, None).await.unwrap().len(), 1);
        assert!(!store.delete_lab_file(file.id, b.id).await.unwrap());

        // Deleting the lab removes its files
        assert!(store.delete_lab(lab.id, a.id).await.unwrap());
        assert!(store.get_lab_file(file.id, a.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_parent_is_a_foreign_key_violation() {
        let store = MemoryStore::new();
        let err = store
            .create_experiment_file(&ExperimentFileCreateDBRequest {
                experiment_id: 999,
                file_name: "a".to_string(),
                file_path: "b".to_string(),
                file_type: None,
                developer_id: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn experiment_files_respect_uploader() {
        let store = MemoryStore::new();
        let a = store.create_developer(&developer("a@x.com", Role::developer())).await.unwrap();
        let b = store.create_developer(&developer("b@x.com", Role::developer())).await.unwrap();
        let experiment = store
            .create_experiment(&ExperimentCreateDBRequest {
                title: "Sorting".to_string(),
                description: None,
                category: Some("algorithms".to_string()),
                difficulty: None,
                estimated_time: None,
                path: None,
            })
            .await
            .unwrap();

        let file = |developer_id| ExperimentFileCreateDBRequest {
            experiment_id: experiment.id,
            file_name: "notes.md".to_string(),
            file_path: "experiments/sorting/notes.md".to_string(),
            file_type: None,
            developer_id,
        };
        let owned = store.create_experiment_file(&file(Some(a.id))).await.unwrap();
        let anonymous = store.create_experiment_file(&file(None)).await.unwrap();

        assert!(!store.delete_experiment_file(owned.id, Some(b.id)).await.unwrap());
        assert!(!store.delete_experiment_file(owned.id, None).await.unwrap());
        assert!(store.delete_experiment_file(owned.id, Some(a.id)).await.unwrap());
        assert!(store.delete_experiment_file(anonymous.id, None).await.unwrap());

        // Deleting the experiment cascades
        store.create_experiment_file(&file(None)).await.unwrap();
        assert!(store.delete_experiment(experiment.id).await.unwrap());
        assert!(store.list_experiment_files(Some(experiment.id)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn experiment_category_filter() {
        let store = MemoryStore::new();
        for (title, category) in [("Sorting", "algorithms"), ("TCP", "networking"), ("Graphs", "algorithms")] {
            store
                .create_experiment(&ExperimentCreateDBRequest {
                    title: title.to_string(),
                    description: None,
                    category: Some(category.to_string()),
                    difficulty: None,
                    estimated_time: None,
                    path: None,
                })
                .await
                .unwrap();
        }

        let filter = ExperimentFilter {
            category: Some("algorithms".to_string()),
        };
        let titles: Vec<String> = store.list_experiments(&filter).await.unwrap().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["Graphs", "Sorting"]);
        assert_eq!(store.list_experiments(&ExperimentFilter::default()).await.unwrap().len(), 3);
    }
}
