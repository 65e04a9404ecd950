pub mod error;
pub mod routes;
pub mod state;

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/items",
            get(routes::items::list_items).post(routes::items::create_item),
        )
        // One parameterized segment serves three verbs: GET filters by
        // status, PUT/DELETE address an item by id.
        .route(
            "/api/items/{key}",
            get(routes::items::list_by_status)
                .put(routes::items::update_item)
                .delete(routes::items::delete_item),
        )
        .route("/api/health", get(routes::health::health))
        .route("/api/chat", axum::routing::post(routes::chat::chat))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the API server on `0.0.0.0:{port}`.
pub async fn serve(app_state: AppState, port: u16) -> anyhow::Result<()> {
    let app = build_router(app_state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Useful Work API listening on http://localhost:{port}");

    axum::serve(listener, app).await?;
    Ok(())
}
