//! GET /api/health

use axum::Json;

use kafra_types::wire::HealthResponse;

pub const SERVICE_NAME: &str = "Kafra Assistant";

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
