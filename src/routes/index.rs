use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct ServiceStatus {
    status: &'static str,
    service: &'static str,
}

pub async fn index() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        status: "ok",
        service: "notification-dispatch",
    })
}
