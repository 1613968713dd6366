use actix_web::{HttpRequest, HttpResponse, Responder};

use crate::middleware::RequestIdExt;

pub async fn index() -> impl Responder {
    HttpResponse::Ok().body("Fleet API v1")
}

pub async fn health(req: HttpRequest) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "request_id": req.correlation_id().map(|id| id.0),
    }))
}
