use axum::Json;
use chrono::Utc;

use crate::api::models::HealthResponse;

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Server is up", body = HealthResponse),
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{create_test_app, create_test_config};
    use serde_json::Value;

    #[test_log::test(tokio::test)]
    async fn test_health() {
        let (server, _state) = create_test_app(create_test_config()).await;

        let response = server.get("/health").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "OK");
        let timestamp = body["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }
}
