//! worksheet-server
//!
//! HTTP surface of the worksheet generator: the form page, the generation
//! endpoint, and the PDF endpoint. The router is built here so integration
//! tests can drive it without binding a socket.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::middleware as axum_mw;
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use worksheet_bedrock::generator::TextGenerator;

use state::AppState;

pub fn router<G: TextGenerator + 'static>(state: AppState<G>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::form::index))
        .route("/health", get(routes::health::health_check))
        .route(
            "/api/worksheets",
            post(routes::worksheets::create_worksheet::<G>),
        )
        .route(
            "/api/worksheets/pdf",
            post(routes::worksheets::render_pdf::<G>),
        )
        .layer(
            ServiceBuilder::new()
                .layer(axum_mw::from_fn(middleware::audit::audit_log))
                .layer(cors),
        )
        .with_state(state)
}
