//! Scripted `TransactionApi` used by the unit tests

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Semaphore;

use crate::error::{CoreError, CoreResult};
use crate::source::TransactionApi;
use crate::types::{Employee, PaginatedResponse, Transaction};

pub(crate) fn records(prefix: &str, count: usize, employee: &Employee) -> Vec<Transaction> {
    (0..count)
        .map(|i| Transaction {
            id: format!("{}-{}", prefix, i),
            amount: 10.0 + i as f64,
            employee: employee.clone(),
            merchant: format!("Merchant {}", i),
            date: NaiveDate::from_ymd_opt(2024, 1, 1 + (i % 28) as u32).unwrap(),
            approved: false,
        })
        .collect()
}

pub(crate) fn staff() -> Vec<Employee> {
    vec![
        Employee::new("e1", "Ada", "Lovelace"),
        Employee::new("e2", "Alan", "Turing"),
        Employee::new("e7", "Grace", "Hopper"),
    ]
}

/// Yield to spawned tasks until `condition` holds
pub(crate) async fn wait_until(condition: impl Fn() -> bool) {
    for _ in 0..10_000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition never became true");
}

/// Answers from in-memory scripts; a missing script entry is a fetch failure
#[derive(Default)]
pub(crate) struct ScriptedApi {
    employees: Mutex<Option<Vec<Employee>>>,
    pages: Mutex<HashMap<u32, PaginatedResponse>>,
    by_employee: Mutex<HashMap<String, Vec<Transaction>>>,
    fail_feed: AtomicBool,
    gate: Option<Semaphore>,
    pub employee_calls: AtomicUsize,
    pub feed_calls: AtomicUsize,
    pub filtered_calls: AtomicUsize,
    pub approval_calls: AtomicUsize,
    pub requested_pages: Mutex<Vec<u32>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request waits for a permit handed out by [`ScriptedApi::release`]
    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    pub fn with_employees(self, employees: Vec<Employee>) -> Self {
        self.set_employees(Some(employees));
        self
    }

    pub fn with_page(self, page: u32, count: usize, next_page: Option<u32>) -> Self {
        let data = records(&format!("p{}", page), count, &Employee::new("e1", "Ada", "Lovelace"));
        self.pages
            .lock()
            .unwrap()
            .insert(page, PaginatedResponse { data, next_page });
        self
    }

    pub fn with_employee_transactions(self, employee_id: &str, count: usize) -> Self {
        let employee = Employee::new(employee_id, "Test", "Employee");
        self.by_employee
            .lock()
            .unwrap()
            .insert(employee_id.to_string(), records(employee_id, count, &employee));
        self
    }

    pub fn set_employees(&self, employees: Option<Vec<Employee>>) {
        *self.employees.lock().unwrap() = employees;
    }

    pub fn set_feed_failure(&self, fail: bool) {
        self.fail_feed.store(fail, Ordering::SeqCst);
    }

    pub fn release(&self, permits: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(permits);
        }
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    async fn pass_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
    }
}

fn rejected(resource: &str) -> CoreError {
    CoreError::FetchFailed {
        resource: resource.to_string(),
        message: "scripted failure".to_string(),
    }
}

#[async_trait]
impl TransactionApi for ScriptedApi {
    async fn employees(&self) -> CoreResult<Vec<Employee>> {
        self.employee_calls.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;
        self.employees
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| rejected("employees"))
    }

    async fn paginated_transactions(&self, page: u32) -> CoreResult<PaginatedResponse> {
        self.feed_calls.fetch_add(1, Ordering::SeqCst);
        self.requested_pages.lock().unwrap().push(page);
        self.pass_gate().await;
        if self.fail_feed.load(Ordering::SeqCst) {
            return Err(rejected("paginatedTransactions"));
        }
        self.pages
            .lock()
            .unwrap()
            .get(&page)
            .cloned()
            .ok_or_else(|| rejected("paginatedTransactions"))
    }

    async fn transactions_by_employee(&self, employee_id: &str) -> CoreResult<Vec<Transaction>> {
        self.filtered_calls.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;
        self.by_employee
            .lock()
            .unwrap()
            .get(employee_id)
            .cloned()
            .ok_or_else(|| rejected("transactionsByEmployee"))
    }

    async fn set_transaction_approval(&self, transaction_id: &str, _approved: bool) -> CoreResult<()> {
        self.approval_calls.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;
        if transaction_id.is_empty() {
            return Err(CoreError::TransactionNotFound {
                id: transaction_id.to_string(),
            });
        }
        Ok(())
    }
}
