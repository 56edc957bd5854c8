use actix_web::{web, HttpResponse};
use serde::Serialize;
use time::OffsetDateTime;

use crate::error::AppError;
use crate::state::app_state::AppState;

pub async fn root() -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().body("Hello from the four-in-a-row backend!"))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub app_version: String,
    pub time: String,
    pub connections: usize,
    pub active_games: usize,
    pub waiting_players: usize,
}

async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let app_version = env!("CARGO_PKG_VERSION").to_string();

    let time = OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    let coordinator = &app_state.coordinator;
    let response = HealthResponse {
        status: "ok".to_string(),
        app_version,
        time,
        connections: coordinator.hub().connected_count().await,
        active_games: coordinator.sessions().len(),
        waiting_players: coordinator.matchmaker().waiting_count(),
    };

    Ok(HttpResponse::Ok().json(response))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}
