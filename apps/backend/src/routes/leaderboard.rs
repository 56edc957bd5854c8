use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::app_state::AppState;

/// Upper bound on `?limit=`, whatever the configured default.
const MAX_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

async fn leaderboard(
    query: web::Query<LeaderboardQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let limit = query
        .limit
        .unwrap_or(app_state.config.leaderboard_size)
        .min(MAX_LIMIT);
    let entries = app_state.store.top_players(limit).await?;
    Ok(HttpResponse::Ok().json(entries))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/leaderboard", web::get().to(leaderboard));
}
