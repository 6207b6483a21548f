//! Cache of one employee's transactions

use std::sync::RwLock;

use crate::error::CoreResult;
use crate::loading::{read, write, LoadingFlag};
use crate::source::ApiRef;
use crate::types::{FetchStatus, FilteredResult};

#[derive(Debug, Default)]
struct FilteredState {
    result: Option<FilteredResult>,
    generation: u64,
}

pub struct FilteredCache {
    api: ApiRef,
    state: RwLock<FilteredState>,
    loading: LoadingFlag,
}

impl FilteredCache {
    pub fn new(api: ApiRef) -> Self {
        Self {
            api,
            state: RwLock::new(FilteredState::default()),
            loading: LoadingFlag::new(),
        }
    }

    /// Replace the cached result with the transactions of `employee_id`
    pub async fn fetch_for(&self, employee_id: &str) -> CoreResult<FetchStatus> {
        let generation = read(&self.state).generation;

        let records = {
            let _loading = self.loading.begin();
            log::debug!(target: "spendview::filtered", "Fetching transactions for {}", employee_id);
            self.api.transactions_by_employee(employee_id).await?
        };

        let mut state = write(&self.state);
        if state.generation != generation {
            log::debug!(
                target: "spendview::filtered",
                "Dropping transactions for {}: cache invalidated while in flight",
                employee_id
            );
            return Ok(FetchStatus::Discarded);
        }

        log::info!(
            target: "spendview::filtered",
            "Loaded {} transactions for {}",
            records.len(),
            employee_id
        );
        state.result = Some(FilteredResult {
            employee_id: employee_id.to_string(),
            records,
        });
        Ok(FetchStatus::Applied)
    }

    pub fn invalidate(&self) {
        let mut state = write(&self.state);
        state.result = None;
        state.generation += 1;
    }

    pub fn data(&self) -> Option<FilteredResult> {
        read(&self.state).result.clone()
    }

    pub fn is_loaded(&self) -> bool {
        read(&self.state).result.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// Update the approval flag of a cached record; false if it is not cached
    pub fn set_approval(&self, transaction_id: &str, approved: bool) -> bool {
        let mut state = write(&self.state);
        state
            .result
            .as_mut()
            .and_then(|result| result.records.iter_mut().find(|t| t.id == transaction_id))
            .map(|record| record.approved = approved)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{wait_until, ScriptedApi};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fetch_replaces_wholesale() {
        let api = Arc::new(
            ScriptedApi::new()
                .with_employee_transactions("e1", 2)
                .with_employee_transactions("e7", 4),
        );
        let filtered = FilteredCache::new(api);

        filtered.fetch_for("e1").await.unwrap();
        assert_eq!(filtered.data().unwrap().records.len(), 2);

        filtered.fetch_for("e7").await.unwrap();
        let result = filtered.data().unwrap();
        assert_eq!(result.employee_id, "e7");
        assert_eq!(result.records.len(), 4);
        assert!(result.records.iter().all(|t| t.id.starts_with("e7-")));
    }

    #[tokio::test]
    async fn test_failed_fetch_after_invalidate_stays_unloaded() {
        let api = Arc::new(ScriptedApi::new().with_employee_transactions("e1", 2));
        let filtered = FilteredCache::new(api);

        filtered.fetch_for("e1").await.unwrap();
        filtered.invalidate();
        assert!(filtered.fetch_for("unknown").await.is_err());
        assert!(!filtered.is_loaded());
        assert!(!filtered.is_loading());
    }

    #[tokio::test]
    async fn test_invalidate_during_fetch_discards_result() {
        let api = Arc::new(ScriptedApi::new().with_employee_transactions("e7", 4).gated());
        let filtered = Arc::new(FilteredCache::new(api.clone()));

        let task = tokio::spawn({
            let filtered = filtered.clone();
            async move { filtered.fetch_for("e7").await }
        });
        wait_until(|| ScriptedApi::calls(&api.filtered_calls) == 1).await;
        assert!(filtered.is_loading());

        filtered.invalidate();
        api.release(1);

        assert_eq!(task.await.unwrap().unwrap(), FetchStatus::Discarded);
        assert!(filtered.data().is_none());
        assert!(!filtered.is_loading());
    }
}
