//! In-process `TransactionApi` serving a JSON fixture

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::RwLock;
use std::time::Duration;

use crate::error::{CoreError, CoreResult};
use crate::loading::{read, write};
use crate::source::TransactionApi;
use crate::types::{Employee, PaginatedResponse, Transaction};

/// Fixture file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureData {
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl FixtureData {
    pub fn from_json(content: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

pub struct FixtureApi {
    employees: Vec<Employee>,
    transactions: RwLock<Vec<Transaction>>,
    page_size: usize,
    latency: Option<Duration>,
}

impl FixtureApi {
    pub fn new(data: FixtureData, page_size: usize) -> Self {
        Self {
            employees: data.employees,
            transactions: RwLock::new(data.transactions),
            page_size: page_size.max(1),
            latency: None,
        }
    }

    /// Delay every request, like a remote service would
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = (!latency.is_zero()).then_some(latency);
        self
    }

    /// Load a fixture file
    pub async fn from_file(path: impl AsRef<Path>, page_size: usize) -> CoreResult<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| CoreError::FixtureError {
            message: format!("{}: {}", path.display(), e),
        })?;
        let data = FixtureData::from_json(&content)?;
        log::info!(
            target: "spendview::fixture",
            "Fixture {} loaded: {} employees, {} transactions",
            path.display(),
            data.employees.len(),
            data.transactions.len()
        );
        Ok(Self::new(data, page_size))
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl TransactionApi for FixtureApi {
    async fn employees(&self) -> CoreResult<Vec<Employee>> {
        self.simulate_latency().await;
        Ok(self.employees.clone())
    }

    async fn paginated_transactions(&self, page: u32) -> CoreResult<PaginatedResponse> {
        self.simulate_latency().await;

        let transactions = read(&self.transactions);
        let start = page as usize * self.page_size;
        if start > transactions.len() {
            return Err(CoreError::InvalidRequest {
                message: format!("Invalid page {}", page),
            });
        }
        let end = (start + self.page_size).min(transactions.len());

        Ok(PaginatedResponse {
            data: transactions[start..end].to_vec(),
            next_page: (end < transactions.len()).then_some(page + 1),
        })
    }

    async fn transactions_by_employee(&self, employee_id: &str) -> CoreResult<Vec<Transaction>> {
        self.simulate_latency().await;

        if employee_id.is_empty() {
            return Err(CoreError::InvalidRequest {
                message: "Employee id cannot be empty".to_string(),
            });
        }

        Ok(read(&self.transactions)
            .iter()
            .filter(|t| t.employee.id == employee_id)
            .cloned()
            .collect())
    }

    async fn set_transaction_approval(&self, transaction_id: &str, approved: bool) -> CoreResult<()> {
        self.simulate_latency().await;

        let mut transactions = write(&self.transactions);
        let transaction = transactions
            .iter_mut()
            .find(|t| t.id == transaction_id)
            .ok_or_else(|| CoreError::TransactionNotFound {
                id: transaction_id.to_string(),
            })?;
        transaction.approved = approved;
        Ok(())
    }
}
