//! OpenAPI documentation for the portal API.
//!
//! The generated document is served at `/api-docs/openapi.json` and rendered with Scalar at
//! `/docs`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::{api, errors::ErrorBody, types::Role};

/// Security scheme for session tokens.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "BearerAuth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Session token returned by register and login. Include it in the `Authorization` header:\n\n\
                            ```\nAuthorization: Bearer YOUR_TOKEN\n```",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CS Lab Portal API",
        description = "Developer accounts, the experiment catalog and owned lab workspaces."
    ),
    modifiers(&SecurityAddon),
    paths(
        api::handlers::health::health,
        api::handlers::developers::register,
        api::handlers::developers::login,
        api::handlers::developers::get_profile,
        api::handlers::developers::update_profile,
        api::handlers::developers::list_developers,
        api::handlers::developers::get_admin_details,
        api::handlers::developers::create_developer,
        api::handlers::developers::update_developer,
        api::handlers::developers::delete_developer,
        api::handlers::experiments::list_experiments,
        api::handlers::experiments::get_experiment,
        api::handlers::experiments::create_experiment,
        api::handlers::experiments::update_experiment,
        api::handlers::experiments::delete_experiment,
        api::handlers::labs::list_labs,
        api::handlers::labs::get_lab,
        api::handlers::labs::create_lab,
        api::handlers::labs::update_lab,
        api::handlers::labs::delete_lab,
        api::handlers::lab_files::list_lab_files,
        api::handlers::lab_files::get_lab_file,
        api::handlers::lab_files::create_lab_file,
        api::handlers::lab_files::delete_lab_file,
        api::handlers::experiment_files::list_experiment_files,
        api::handlers::experiment_files::get_experiment_file,
        api::handlers::experiment_files::create_experiment_file,
        api::handlers::experiment_files::delete_experiment_file,
    ),
    components(
        schemas(
            ErrorBody,
            Role,
            api::models::MessageResponse,
            api::models::HealthResponse,
            api::models::developers::RegisterRequest,
            api::models::developers::LoginRequest,
            api::models::developers::DeveloperCreate,
            api::models::developers::DeveloperUpdate,
            api::models::developers::DeveloperResponse,
            api::models::developers::AuthResponse,
            api::models::developers::DeveloperMessageResponse,
            api::models::experiments::ExperimentCreate,
            api::models::experiments::ExperimentUpdate,
            api::models::experiments::ExperimentResponse,
            api::models::labs::LabCreate,
            api::models::labs::LabUpdate,
            api::models::labs::LabResponse,
            api::models::lab_files::LabFileCreate,
            api::models::lab_files::LabFileResponse,
            api::models::experiment_files::ExperimentFileCreate,
            api::models::experiment_files::ExperimentFileResponse,
        )
    ),
    tags(
        (name = "health", description = "Liveness"),
        (name = "developers", description = "Registration, login, profiles and account management"),
        (name = "experiments", description = "Experiment catalog"),
        (name = "labs", description = "Labs owned by the authenticated developer"),
        (name = "lab-files", description = "Files of owned labs"),
        (name = "experiment-files", description = "Files attached to catalog experiments"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::ApiDoc;
    use utoipa::OpenApi;

    #[test]
    fn test_document_lists_routes_and_security() {
        let doc = ApiDoc::openapi();

        for path in ["/health", "/api/developers/register", "/api/lab/{id}", "/api/experiment-files"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("BearerAuth"));
        assert!(components.schemas.contains_key("ErrorBody"));
    }
}
