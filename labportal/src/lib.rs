//! # labportal: CS Lab Portal API
//!
//! `labportal` is the backend of a computer-science lab portal. Developers register and log in
//! with email and password, browse a shared catalog of experiments, and keep private labs with
//! attached file records.
//!
//! ## Architecture
//!
//! The HTTP layer is built on [Axum](https://github.com/tokio-rs/axum). Persistence goes through
//! the [`db::Store`] trait object held in [`AppState`], backed either by PostgreSQL
//! ([`db::PgStore`]) or by process-local tables ([`db::MemoryStore`]).
//!
//! ### Request Flow
//!
//! Every route lives under `/api`, plus `/health` and the API docs. Routes that act on the
//! caller's own data (profile, labs, lab files) sit behind the [`auth::middleware::require_bearer`]
//! layer, which verifies the session token and stores a
//! [`CurrentDeveloper`](api::models::developers::CurrentDeveloper) in the request extensions.
//! Catalog reads and experiment file routes are public; developer management and catalog writes
//! are public unless `auth.protect_management_routes` is set, see [`auth::permissions`].
//!
//! Handlers validate the request, call the store, and map storage results to responses. Every
//! failure is an [`errors::Error`], which renders the status code and `{"error": ...}` body.
//!
//! ### Core Components
//!
//! - [`api`]: handlers, extractors and request/response models
//! - [`auth`]: password hashing, session tokens, bearer extraction and role checks
//! - [`config`]: YAML + environment configuration
//! - [`db`]: the storage seam and its two implementations
//! - [`errors`]: the error type and its HTTP mapping
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use labportal::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = labportal::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     labportal::telemetry::init_telemetry(config.log_format)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod openapi;
pub mod telemetry;
pub mod types;

#[cfg(test)]
mod test_utils;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{self, HeaderValue, Method},
    middleware::{self, from_fn_with_state},
    routing::{get, post, put},
};
use bon::Builder;
use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use config::Config;

use crate::{
    api::handlers::{developers, experiment_files, experiments, health, lab_files, labs},
    auth::{
        middleware::require_bearer,
        password::{self, Argon2Params},
        session::TokenCodec,
    },
    config::CorsOrigin,
    db::{Store, models::developers::DeveloperCreateDBRequest},
    openapi::ApiDoc,
    types::{DeveloperId, Role},
};

/// Application state shared across all request handlers.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .store(Arc::new(MemoryStore::new()))
///     .config(config)
///     .tokens(tokens)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Config,
    pub tokens: TokenCodec,
}

/// Create the initial admin account if no account uses `email` yet.
///
/// Returns the id of the created or existing account. An existing account is left untouched,
/// whatever its role.
#[instrument(skip_all)]
pub async fn create_initial_admin_user(store: &dyn Store, email: &str, password: &str, params: Argon2Params) -> anyhow::Result<DeveloperId> {
    let email = email.trim().to_lowercase();

    if let Some(existing) = store.get_developer_by_email(&email).await? {
        debug!(developer_id = existing.id, "Initial admin account already exists");
        return Ok(existing.id);
    }

    let password_hash = password::hash_password_blocking(password.to_string(), params).await?;
    let created = store
        .create_developer(&DeveloperCreateDBRequest {
            name: "Admin".to_string(),
            last_name: None,
            email,
            password_hash,
            role: Role::admin(),
            profile_image: None,
        })
        .await?;

    info!(developer_id = created.id, "Created initial admin account");
    Ok(created.id)
}

fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors = &config.cors;

    let allow_origin = if cors.allowed_origins.iter().any(|origin| matches!(origin, CorsOrigin::Wildcard)) {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in &cors.allowed_origins {
            origins.push(origin.header_value().parse::<HeaderValue>()?);
        }
        AllowOrigin::list(origins)
    };

    let mut layer = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([http::header::AUTHORIZATION, http::header::CONTENT_TYPE])
        .allow_credentials(cors.allow_credentials);

    if let Some(max_age) = cors.max_age {
        layer = layer.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(layer)
}

/// Build the application router with all endpoints and middleware.
///
/// # Errors
///
/// Returns an error if the CORS configuration cannot be turned into header values.
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    let bearer = from_fn_with_state(state.clone(), require_bearer);

    let profile_routes = Router::new()
        .route("/developers/profile", get(developers::get_profile).put(developers::update_profile))
        .route_layer(bearer.clone());

    let developer_routes = Router::new()
        .route("/developers/register", post(developers::register))
        .route("/developers/login", post(developers::login))
        .route("/developers/admin-details", get(developers::get_admin_details))
        .route("/developers", get(developers::list_developers).post(developers::create_developer))
        .route("/developers/{id}", put(developers::update_developer).delete(developers::delete_developer));

    let lab_routes = Router::new()
        .route("/lab", get(labs::list_labs).post(labs::create_lab))
        .route("/lab/{id}", get(labs::get_lab).put(labs::update_lab).delete(labs::delete_lab))
        .route("/lab-files", get(lab_files::list_lab_files).post(lab_files::create_lab_file))
        .route("/lab-files/{id}", get(lab_files::get_lab_file).delete(lab_files::delete_lab_file))
        .route_layer(bearer);

    let catalog_routes = Router::new()
        .route("/experiments", get(experiments::list_experiments).post(experiments::create_experiment))
        .route(
            "/experiments/{id}",
            get(experiments::get_experiment)
                .put(experiments::update_experiment)
                .delete(experiments::delete_experiment),
        )
        .route(
            "/experiment-files",
            get(experiment_files::list_experiment_files).post(experiment_files::create_experiment_file),
        )
        .route(
            "/experiment-files/{id}",
            get(experiment_files::get_experiment_file).delete(experiment_files::delete_experiment_file),
        );

    let api_routes = Router::new()
        .merge(profile_routes)
        .merge(developer_routes)
        .merge(lab_routes)
        .merge(catalog_routes);

    let router = Router::new()
        .route("/health", get(health::health))
        .nest("/api", api_routes)
        .with_state(state.clone())
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .route("/api-docs/openapi.json", get(|| async { axum::Json(ApiDoc::openapi()) }))
        .layer(DefaultBodyLimit::max(state.config.limits.max_upload_bytes))
        .layer(CatchPanicLayer::custom(errors::panic_response));

    // Internal error chains only leave the process in development
    let router = if state.config.is_development() {
        router.layer(middleware::from_fn(errors::expose_error_details))
    } else {
        router
    };

    let router = router.layer(create_cors_layer(&state.config)?);

    let router = router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// The assembled server: store, state and router.
///
/// 1. **Create**: [`Application::new`] builds the configured store, runs migrations and creates
///    the initial admin account
/// 2. **Serve**: [`Application::serve`] binds the TCP listener and handles requests
/// 3. **Shutdown**: when the shutdown future resolves, in-flight requests finish and the store is
///    closed
pub struct Application {
    router: Router,
    app_state: AppState,
    config: Config,
}

impl Application {
    /// Create a new application instance using the configured storage backend
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting lab portal with configuration: {:#?}", config);

        let store = db::connect(&config.database)?;
        Self::with_store(config, store).await
    }

    /// Create an application on top of an existing store
    pub async fn with_store(config: Config, store: Arc<dyn Store>) -> anyhow::Result<Self> {
        store.init().await?;
        info!(backend = store.kind(), "Storage initialized");

        let tokens = TokenCodec::new(config.jwt_secret.as_deref().unwrap_or_default(), config.auth.token_lifetime)?;

        if let (Some(email), Some(admin_password)) = (&config.admin_email, &config.admin_password) {
            create_initial_admin_user(store.as_ref(), email, admin_password, Argon2Params::from(&config.auth.password)).await?;
        }

        let app_state = AppState::builder().store(store).config(config.clone()).tokens(tokens).build();
        let router = build_router(&app_state)?;

        Ok(Self { router, app_state, config })
    }

    pub fn state(&self) -> &AppState {
        &self.app_state
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router.into_make_service()).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "Lab portal listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing storage connections...");
        self.app_state.store.close().await;

        Ok(())
    }
}
