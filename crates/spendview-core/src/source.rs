//! Boundary with the transport layer that actually performs requests

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::CoreResult;
use crate::types::{Employee, PaginatedResponse, Transaction};

/// API reference type
pub type ApiRef = Arc<dyn TransactionApi>;

/// Requests the coordinator and its caches issue
#[async_trait]
pub trait TransactionApi: Send + Sync {
    /// All selectable employees
    async fn employees(&self) -> CoreResult<Vec<Employee>>;

    /// One page of the unfiltered feed, `page` counted from zero
    async fn paginated_transactions(&self, page: u32) -> CoreResult<PaginatedResponse>;

    /// Every transaction of one employee, in a single round trip
    async fn transactions_by_employee(&self, employee_id: &str) -> CoreResult<Vec<Transaction>>;

    /// Mark a transaction as approved or not
    async fn set_transaction_approval(&self, transaction_id: &str, approved: bool) -> CoreResult<()>;
}
