//! HTTP request handlers for all API endpoints.
//!
//! Handlers validate the request, call the [`Store`](crate::db::Store) in the application state
//! and map the result to a response. Failures are returned as [`crate::errors::Error`], which
//! renders the status code and `{"error": ...}` body.
//!
//! # Handler Modules
//!
//! - [`developers`]: registration, login, profile and account management
//! - [`experiment_files`]: files attached to catalog experiments
//! - [`experiments`]: catalog CRUD
//! - [`health`]: liveness check
//! - [`lab_files`]: files of owned labs
//! - [`labs`]: owned labs

pub mod developers;
pub mod experiment_files;
pub mod experiments;
pub mod health;
pub mod lab_files;
pub mod labs;
