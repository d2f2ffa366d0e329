use actix_web::{get, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

/// Liveness check. A 200 means the process is up and serving requests; it
/// says nothing about the database, which is only touched by real traffic.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "now": Utc::now()
    }))
}
