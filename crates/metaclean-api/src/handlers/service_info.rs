//! Liveness handler describing the service and its endpoints.

use crate::constants::{SERVICE_NAME, SERVICE_VERSION};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoints {
    pub health: &'static str,
    pub health_check: &'static str,
    pub clear_metadata: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ServiceInfoResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: Endpoints,
}

pub async fn service_info() -> Json<ServiceInfoResponse> {
    Json(ServiceInfoResponse {
        status: "ok",
        service: SERVICE_NAME,
        version: SERVICE_VERSION,
        endpoints: Endpoints {
            health: "GET /",
            health_check: "GET /health",
            clear_metadata: "POST /clear-metadata",
        },
    })
}
