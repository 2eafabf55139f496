//! API layer for HTTP request handling and data models.
//!
//! - **[`extract`]**: request extractors that report rejections in the standard error body
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: request/response data structures
//!
//! # API Structure
//!
//! - **Developers** (`/api/developers/*`): registration, login, profile and account management
//! - **Experiments** (`/api/experiments/*`): the shared experiment catalog
//! - **Labs** (`/api/lab/*`): labs owned by the authenticated developer
//! - **Lab files** (`/api/lab-files/*`): file records of owned labs
//! - **Experiment files** (`/api/experiment-files/*`): file records attached to experiments
//!
//! OpenAPI documentation is served at `/docs`.

pub mod extract;
pub mod handlers;
pub mod models;
