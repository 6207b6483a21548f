//! Employees API endpoints

use crate::error::ApiError;
use crate::routes::json_response;
use crate::AppState;
use axum::response::Response;
use serde::Serialize;
use spendview_core::Employee;

/// Selector entry
#[derive(Debug, Serialize)]
pub struct EmployeeOption {
    pub value: String,
    pub label: String,
}

impl From<Employee> for EmployeeOption {
    fn from(employee: Employee) -> Self {
        Self {
            label: employee.display_name(),
            value: employee.id,
        }
    }
}

/// Get selector entries, "All Employees" first (JSON API)
///
/// Empty while the directory has not loaded.
pub async fn api_employees(state: axum::extract::State<AppState>) -> Result<Response, ApiError> {
    let options: Vec<EmployeeOption> = state
        .coordinator
        .employee_options()
        .into_iter()
        .map(EmployeeOption::from)
        .collect();
    json_response(&options)
}
