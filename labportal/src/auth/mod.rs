//! Authentication and authorization.
//!
//! Developers log in with email and password and receive a bearer token (an HS256 JWT) that
//! carries their id and email. Tokens are stateless: nothing is stored server side and a token
//! stays valid until it expires.
//!
//! # Modules
//!
//! - [`current_user`]: extractors for the authenticated developer
//! - [`middleware`]: the bearer-token layer for owner-scoped routes
//! - [`password`]: Argon2id hashing and verification
//! - [`permissions`]: role checks for the management routes
//! - [`session`]: token issue and verification
//!
//! # Usage in Handlers
//!
//! ```ignore
//! use labportal::api::models::developers::CurrentDeveloper;
//!
//! async fn my_labs(current: CurrentDeveloper, State(state): State<AppState>) -> Result<Json<Vec<LabResponse>>> {
//!     let labs = state.store.list_labs(current.id).await?;
//!     Ok(Json(labs.into_iter().map(Into::into).collect()))
//! }
//! ```

pub mod current_user;
pub mod middleware;
pub mod password;
pub mod permissions;
pub mod session;
