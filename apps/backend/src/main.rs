use actix_web::{web, App, HttpServer};
use fourrow::config::server::ServerConfig;
use fourrow::infra::state::build_state;
use fourrow::routes;
use fourrow::telemetry;
use tracing::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment.
    // Every variable is optional; see ServerConfig for names and defaults.
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    };
    let (host, port) = (config.host.clone(), config.port);

    let app_state = match build_state().with_config(config).build().await {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    info!(host = %host, port, "Starting four-in-a-row backend");

    // Wrap AppState with web::Data before passing to HttpServer
    let data = web::Data::new(app_state);

    // Stops on SIGINT/SIGTERM; background tasks end with the runtime.
    HttpServer::new(move || App::new().app_data(data.clone()).configure(routes::configure))
        .bind((host.as_str(), port))?
        .run()
        .await
}
