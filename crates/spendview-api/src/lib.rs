//! JSON API over the transaction view coordinator
//!
//! Routes are organized into modules:
//! - routes::view: Current view, employee selection, pagination, approval
//! - routes::employees: Employee selector entries

pub mod error;
pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use spendview_config::Config;
use spendview_core::ViewCoordinator;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<ViewCoordinator>,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::employees::api_employees;
    use routes::view::{api_load_more, api_select, api_set_approval, api_view};

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/view", get(api_view))
        .route("/api/employees", get(api_employees))
        .route("/api/select", post(api_select))
        .route("/api/load-more", post(api_load_more))
        .route("/api/transactions/:id/approval", post(api_set_approval))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Serve the API until the listener fails
pub async fn start_server(config: Config, coordinator: Arc<ViewCoordinator>) -> anyhow::Result<()> {
    let addr = config.bind_address();
    let router = create_router(AppState { coordinator });

    let listener = TcpListener::bind(&addr).await?;
    log::info!(target: "spendview::api", "Starting spendview API on http://{}", addr);
    log::info!(target: "spendview::api", "  GET  /api/view, /api/employees");
    log::info!(target: "spendview::api", "  POST /api/select, /api/load-more, /api/transactions/:id/approval");

    axum::serve(listener, router).await?;
    log::info!(target: "spendview::api", "Server stopped gracefully");
    Ok(())
}

// ==================== Tests ====================
