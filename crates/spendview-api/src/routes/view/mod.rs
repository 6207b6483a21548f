//! View routes - current transaction list and the user actions on it
//!
//! Structure:
//! - api.rs: JSON API endpoints

pub mod api;

pub use api::{api_load_more, api_select, api_set_approval, api_view};
