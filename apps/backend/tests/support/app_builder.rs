use std::time::Duration;

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use fourrow::config::server::ServerConfig;
use fourrow::infra::state::build_state;
use fourrow::routes;
use fourrow::{AppError, AppState};

/// Fast timings so bot fallback and bot replies happen within a test.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        match_timeout: Duration::from_millis(300),
        ..ServerConfig::for_tests()
    }
}

pub async fn build_test_state() -> Result<AppState, AppError> {
    build_state()
        .with_config(test_config())
        .without_sweeper()
        .build()
        .await
}

/// In-process service with the production routes.
pub async fn create_test_app(
    state: web::Data<AppState>,
) -> impl Service<Request, Response = ServiceResponse, Error = Error> {
    test::init_service(App::new().app_data(state).configure(routes::configure)).await
}
