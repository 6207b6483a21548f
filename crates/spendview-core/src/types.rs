//! Basic types shared by the caches and the coordinator

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A selectable employee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Unique employee identifier; empty for the "all employees" sentinel
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

impl Employee {
    pub fn new(id: impl Into<String>, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Sentinel entry meaning "no filter / show all"
    pub fn all() -> Self {
        Self::new("", "All", "Employees")
    }

    /// Label shown in a selector
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A single transaction record
///
/// The coordinator treats this as opaque payload; only the approval
/// update looks at `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub amount: f64,
    pub employee: Employee,
    pub merchant: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub approved: bool,
}

/// One page of the unfiltered feed as returned by the collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse {
    pub data: Vec<Transaction>,
    /// Next page to request; absent when the feed is exhausted
    pub next_page: Option<u32>,
}

/// Accumulated feed data held by the feed cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    pub records: Vec<Transaction>,
    pub next_page: Option<u32>,
}

impl From<PaginatedResponse> for FeedPage {
    fn from(response: PaginatedResponse) -> Self {
        Self {
            records: response.data,
            next_page: response.next_page,
        }
    }
}

impl FeedPage {
    /// Append a freshly fetched page and move the cursor
    pub fn append(&mut self, response: PaginatedResponse) {
        self.records.extend(response.data);
        self.next_page = response.next_page;
    }
}

/// Transactions for exactly one employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredResult {
    pub employee_id: String,
    pub records: Vec<Transaction>,
}

/// Whether a finished fetch changed the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// Result committed to the cache
    Applied,
    /// The cache was invalidated or moved on while the fetch was in flight
    Discarded,
    /// No request was made because the feed has no further pages
    Exhausted,
}
