//! View API endpoints
//!
//! Endpoints:
//! - api_view: Current view snapshot (JSON)
//! - api_select: Select an employee, or all when the id is empty (JSON)
//! - api_load_more: Append the next feed page (JSON)
//! - api_set_approval: Approve or unapprove a transaction (JSON)

use crate::error::ApiError;
use crate::routes::json_response;
use crate::AppState;
use axum::extract::{Path, Query};
use axum::response::Response;
use serde::Serialize;
use spendview_core::{TransitionOutcome, ViewSnapshot};
use std::collections::HashMap;

/// Result of a user action together with the view it produced
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub outcome: TransitionOutcome,
    pub view: ViewSnapshot,
}

/// Get the current view (JSON API)
pub async fn api_view(state: axum::extract::State<AppState>) -> Result<Response, ApiError> {
    json_response(&state.coordinator.snapshot())
}

/// Select an employee filter (JSON API)
///
/// A missing or empty `employee_id` selects all employees.
pub async fn api_select(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let employee_id = params.get("employee_id").map(|s| s.trim()).unwrap_or("");
    let outcome = state.coordinator.select_employee(employee_id).await;
    json_response(&ActionResponse {
        outcome,
        view: state.coordinator.snapshot(),
    })
}

/// Load the next page of the feed (JSON API)
pub async fn api_load_more(state: axum::extract::State<AppState>) -> Result<Response, ApiError> {
    let outcome = state.coordinator.load_next_page().await;
    json_response(&ActionResponse {
        outcome,
        view: state.coordinator.snapshot(),
    })
}

/// Set the approval flag of a transaction (JSON API)
pub async fn api_set_approval(
    state: axum::extract::State<AppState>,
    path: Path<String>,
    params: Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let approved = match params.get("value").map(|s| s.as_str()) {
        Some("true") => true,
        Some("false") => false,
        other => {
            return Err(ApiError::BadRequest {
                message: format!("value must be 'true' or 'false', got {:?}", other),
            })
        }
    };

    state
        .coordinator
        .set_transaction_approval(&path.0, approved)
        .await?;
    json_response(&state.coordinator.snapshot())
}
