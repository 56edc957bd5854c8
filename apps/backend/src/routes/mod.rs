use actix_web::web;

pub mod health;
pub mod leaderboard;
pub mod realtime;

/// Register every HTTP and websocket route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health::root));

    // Health and leaderboard: /api/**
    cfg.service(
        web::scope("/api")
            .configure(health::configure_routes)
            .configure(leaderboard::configure_routes),
    );

    // Realtime: /ws
    cfg.configure(realtime::configure_routes);
}
