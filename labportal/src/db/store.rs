//! The storage seam.
//!
//! Handlers only ever talk to an `Arc<dyn Store>`. Ownership rules for labs and lab files are
//! part of the method contracts: every lookup takes the caller's id and an implementation must
//! apply it in the same query that selects the row, so a foreign id is indistinguishable from a
//! missing one.

use async_trait::async_trait;

use crate::db::errors::Result;
use crate::db::models::{
    developers::{DeveloperCreateDBRequest, DeveloperDBResponse, DeveloperDeleteOutcome, DeveloperUpdateDBRequest},
    experiment_files::{ExperimentFileCreateDBRequest, ExperimentFileDBResponse},
    experiments::{ExperimentCreateDBRequest, ExperimentDBResponse, ExperimentFilter, ExperimentUpdateDBRequest},
    lab_files::{LabFileCreateDBRequest, LabFileDBResponse},
    labs::{LabCreateDBRequest, LabDBResponse, LabUpdateDBRequest},
};
use crate::types::{DeveloperId, ExperimentFileId, ExperimentId, LabFileId, LabId};

#[async_trait]
pub trait DeveloperStore: Send + Sync {
    /// Insert a developer. A duplicate email (case-insensitive) fails with
    /// [`DbError::UniqueViolation`](crate::db::errors::DbError::UniqueViolation).
    async fn create_developer(&self, request: &DeveloperCreateDBRequest) -> Result<DeveloperDBResponse>;

    async fn get_developer(&self, id: DeveloperId) -> Result<Option<DeveloperDBResponse>>;

    /// Case-insensitive email lookup
    async fn get_developer_by_email(&self, email: &str) -> Result<Option<DeveloperDBResponse>>;

    /// All developers, newest first
    async fn list_developers(&self) -> Result<Vec<DeveloperDBResponse>>;

    /// The earliest-created admin account, if any
    async fn first_admin(&self) -> Result<Option<DeveloperDBResponse>>;

    /// Apply a partial update. Returns `None` for an unknown id. Demoting the last admin fails
    /// with [`DbError::ProtectedEntity`](crate::db::errors::DbError::ProtectedEntity).
    async fn update_developer(&self, id: DeveloperId, request: &DeveloperUpdateDBRequest) -> Result<Option<DeveloperDBResponse>>;

    /// Delete a developer unless it is the last admin. The check and the delete are atomic.
    async fn delete_developer(&self, id: DeveloperId) -> Result<DeveloperDeleteOutcome>;
}

#[async_trait]
pub trait ExperimentStore: Send + Sync {
    async fn create_experiment(&self, request: &ExperimentCreateDBRequest) -> Result<ExperimentDBResponse>;

    async fn get_experiment(&self, id: ExperimentId) -> Result<Option<ExperimentDBResponse>>;

    async fn list_experiments(&self, filter: &ExperimentFilter) -> Result<Vec<ExperimentDBResponse>>;

    async fn update_experiment(&self, id: ExperimentId, request: &ExperimentUpdateDBRequest) -> Result<Option<ExperimentDBResponse>>;

    /// Deleting an experiment removes its files and unlinks labs that referenced it
    async fn delete_experiment(&self, id: ExperimentId) -> Result<bool>;
}

#[async_trait]
pub trait LabStore: Send + Sync {
    async fn create_lab(&self, request: &LabCreateDBRequest) -> Result<LabDBResponse>;

    async fn list_labs(&self, owner: DeveloperId) -> Result<Vec<LabDBResponse>>;

    async fn get_lab(&self, id: LabId, owner: DeveloperId) -> Result<Option<LabDBResponse>>;

    async fn update_lab(&self, id: LabId, owner: DeveloperId, request: &LabUpdateDBRequest) -> Result<Option<LabDBResponse>>;

    /// Deleting a lab removes its files
    async fn delete_lab(&self, id: LabId, owner: DeveloperId) -> Result<bool>;
}

#[async_trait]
pub trait LabFileStore: Send + Sync {
    /// Insert a file record. Callers verify parent-lab ownership first.
    async fn create_lab_file(&self, request: &LabFileCreateDBRequest) -> Result<LabFileDBResponse>;

    /// Files of labs owned by `owner`, optionally restricted to one lab
    async fn list_lab_files(&self, owner: DeveloperId, lab_id: Option<LabId>) -> Result<Vec<LabFileDBResponse>>;

    async fn get_lab_file(&self, id: LabFileId, owner: DeveloperId) -> Result<Option<LabFileDBResponse>>;

    async fn delete_lab_file(&self, id: LabFileId, owner: DeveloperId) -> Result<bool>;
}

#[async_trait]
pub trait ExperimentFileStore: Send + Sync {
    async fn create_experiment_file(&self, request: &ExperimentFileCreateDBRequest) -> Result<ExperimentFileDBResponse>;

    async fn list_experiment_files(&self, experiment_id: Option<ExperimentId>) -> Result<Vec<ExperimentFileDBResponse>>;

    async fn get_experiment_file(&self, id: ExperimentFileId) -> Result<Option<ExperimentFileDBResponse>>;

    /// Delete a file if it has no recorded uploader or was uploaded by `caller`
    async fn delete_experiment_file(&self, id: ExperimentFileId, caller: Option<DeveloperId>) -> Result<bool>;
}

/// Everything the HTTP layer needs from storage, plus lifecycle hooks.
#[async_trait]
pub trait Store: DeveloperStore + ExperimentStore + LabStore + LabFileStore + ExperimentFileStore {
    /// Prepare the backend (run migrations, etc.)
    async fn init(&self) -> Result<()>;

    /// Release connections. Called once after the server stops.
    async fn close(&self);

    /// Short backend name for logs
    fn kind(&self) -> &'static str;
}
