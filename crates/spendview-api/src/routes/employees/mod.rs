//! Employee routes - selector entries for the employee filter

pub mod api;

pub use api::api_employees;
