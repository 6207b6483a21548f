//! View coordinator - one logical transaction list over two caches
//!
//! Phases:
//! - `Initializing`: nothing requested yet
//! - `AwaitingDirectory`: employee directory requested
//! - `AllActive`: the paginated feed is the active source
//! - `ByEmployeeActive`: one employee's transactions are the active source
//!
//! Every selection invalidates the opposite cache before its fetch is issued,
//! so at most one cache holds data at any time. Visibility of the "load more"
//! control is dropped before a fetch starts and restored only once it
//! resolves successfully.

use serde::Serialize;
use std::sync::RwLock;

use crate::directory::DirectoryLoader;
use crate::error::{log_error, CoreResult, ErrorDetails};
use crate::feed::FeedCache;
use crate::filtered::FilteredCache;
use crate::loading::{read, write, LoadingFlag};
use crate::source::ApiRef;
use crate::types::{Employee, FeedPage, FetchStatus, FilteredResult, Transaction};

/// Where the coordinator is in its session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "employee_id", rename_all = "snake_case")]
pub enum Phase {
    Initializing,
    AwaitingDirectory,
    AllActive,
    ByEmployeeActive(String),
}

/// The cache currently holding data
#[derive(Debug, Clone, PartialEq)]
pub enum ActiveSource {
    None,
    All(FeedPage),
    ByEmployee(FilteredResult),
}

impl ActiveSource {
    pub fn into_records(self) -> Option<Vec<Transaction>> {
        match self {
            ActiveSource::None => None,
            ActiveSource::All(page) => Some(page.records),
            ActiveSource::ByEmployee(result) => Some(result.records),
        }
    }
}

/// Result of a user action or lifecycle trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionOutcome {
    /// Fetch resolved and the view was updated
    Completed,
    /// A later selection took over while the fetch was in flight
    Superseded,
    /// The fetch was rejected; see `last_error`
    Failed,
    /// Preconditions did not hold, nothing was requested
    Ignored,
}

/// Everything the presentation layer reads
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub phase: Phase,
    pub transactions: Option<Vec<Transaction>>,
    pub page_count: u32,
    /// Feed cursor, or -1 while the feed is not loaded or exhausted
    pub max_pages: i64,
    pub load_more_visible: bool,
    pub show_load_more: bool,
    pub is_initial_loading: bool,
    pub feed_loading: bool,
    pub filtered_loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<ErrorDetails>,
}

#[derive(Debug)]
struct ViewState {
    phase: Phase,
    page_count: u32,
    load_more_visible: bool,
    /// One-shot guard for the directory-ready transition
    default_load_issued: bool,
    /// Bumped by every selection
    selection_epoch: u64,
    last_error: Option<ErrorDetails>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            phase: Phase::Initializing,
            page_count: 0,
            load_more_visible: false,
            default_load_issued: false,
            selection_epoch: 0,
            last_error: None,
        }
    }
}

fn load_more_offered(
    phase: &Phase,
    load_more_visible: bool,
    feed_loaded: bool,
    page_count: u32,
    max_pages: i64,
) -> bool {
    *phase == Phase::AllActive && load_more_visible && feed_loaded && i64::from(page_count) < max_pages
}

pub struct ViewCoordinator {
    api: ApiRef,
    directory: DirectoryLoader,
    feed: FeedCache,
    filtered: FilteredCache,
    state: RwLock<ViewState>,
    initial_loading: LoadingFlag,
}

impl ViewCoordinator {
    pub fn new(api: ApiRef) -> Self {
        Self {
            directory: DirectoryLoader::new(api.clone()),
            feed: FeedCache::new(api.clone()),
            filtered: FilteredCache::new(api.clone()),
            api,
            state: RwLock::new(ViewState::default()),
            initial_loading: LoadingFlag::new(),
        }
    }

    // ==================== Lifecycle ====================

    /// Load the employee directory, then fire the default feed load
    ///
    /// Runs once per session. A further call is only honoured while the
    /// directory is still unloaded and no load is running, which makes it
    /// an explicit retry after a failed directory fetch.
    pub async fn start(&self) -> TransitionOutcome {
        let initial = {
            let mut state = write(&self.state);
            let first = state.phase == Phase::Initializing;
            let retry = !first && !self.directory.is_loaded() && !self.initial_loading.is_loading();
            if !first && !retry {
                log::debug!(target: "spendview::coordinator", "Start ignored in phase {:?}", state.phase);
                return TransitionOutcome::Ignored;
            }
            if first {
                state.phase = Phase::AwaitingDirectory;
            }
            self.initial_loading.begin()
        };

        let loaded = self.directory.load_all().await;
        drop(initial);

        if let Err(error) = loaded {
            log_error(&error, "loadEmployees");
            write(&self.state).last_error = Some(error.to_details());
            return TransitionOutcome::Failed;
        }

        self.on_directory_changed().await
    }

    /// Directory-ready trigger
    ///
    /// Issues the default feed load at most once per session, and only when
    /// the directory is loaded and idle. A user selection made earlier
    /// counts as the default load.
    pub async fn on_directory_changed(&self) -> TransitionOutcome {
        let epoch = {
            let mut state = write(&self.state);
            if state.default_load_issued {
                return TransitionOutcome::Ignored;
            }
            if !self.directory.is_loaded() || self.directory.is_loading() {
                log::debug!(target: "spendview::coordinator", "Directory not ready, waiting");
                return TransitionOutcome::Ignored;
            }
            log::info!(target: "spendview::coordinator", "Directory ready, issuing default transaction load");
            self.begin_all_selection(&mut state)
        };

        let result = self.feed.fetch_page().await;
        self.settle(epoch, result, "loadAllTransactions", false)
    }

    // ==================== User actions ====================

    /// Show the unfiltered feed, restarting from page zero
    pub async fn select_all(&self) -> TransitionOutcome {
        let epoch = {
            let mut state = write(&self.state);
            log::info!(target: "spendview::coordinator", "Selecting all employees");
            self.begin_all_selection(&mut state)
        };

        let result = self.feed.fetch_page().await;
        self.settle(epoch, result, "loadAllTransactions", false)
    }

    /// Show one employee's transactions; the empty id selects all
    pub async fn select_employee(&self, employee_id: &str) -> TransitionOutcome {
        if employee_id.is_empty() {
            return self.select_all().await;
        }

        let epoch = {
            let mut state = write(&self.state);
            log::info!(target: "spendview::coordinator", "Selecting employee {}", employee_id);
            state.selection_epoch += 1;
            state.default_load_issued = true;
            state.phase = Phase::ByEmployeeActive(employee_id.to_string());
            state.load_more_visible = false;
            self.feed.invalidate();
            self.filtered.invalidate();
            state.selection_epoch
        };

        let result = self.filtered.fetch_for(employee_id).await;
        self.settle(epoch, result, "loadTransactionsByEmployee", false)
    }

    /// Append the next feed page
    ///
    /// Ignored unless the feed is active, the control is visible and the
    /// page count is below the feed cursor.
    pub async fn load_next_page(&self) -> TransitionOutcome {
        let epoch = {
            let mut state = write(&self.state);
            if state.phase != Phase::AllActive || !state.load_more_visible {
                log::debug!(target: "spendview::coordinator", "Load more ignored: control not offered");
                return TransitionOutcome::Ignored;
            }
            match self.feed.next_page() {
                Some(next) if state.page_count < next => {}
                _ => {
                    log::debug!(
                        target: "spendview::coordinator",
                        "Load more ignored: page {} is the last one",
                        state.page_count
                    );
                    return TransitionOutcome::Ignored;
                }
            }
            state.load_more_visible = false;
            state.selection_epoch
        };

        let result = self.feed.fetch_page().await;
        self.settle(epoch, result, "loadNextPage", true)
    }

    /// Approve or unapprove a transaction and update the cached copy
    pub async fn set_transaction_approval(&self, transaction_id: &str, approved: bool) -> CoreResult<()> {
        if let Err(error) = self.api.set_transaction_approval(transaction_id, approved).await {
            log_error(&error, "setTransactionApproval");
            return Err(error);
        }

        let cached = self.feed.set_approval(transaction_id, approved)
            || self.filtered.set_approval(transaction_id, approved);
        log::info!(
            target: "spendview::coordinator",
            "Transaction {} approved={} (in view: {})",
            transaction_id,
            approved,
            cached
        );
        Ok(())
    }

    // ==================== Derived reads ====================

    pub fn active_source(&self) -> ActiveSource {
        if let Some(page) = self.feed.data() {
            ActiveSource::All(page)
        } else if let Some(result) = self.filtered.data() {
            ActiveSource::ByEmployee(result)
        } else {
            ActiveSource::None
        }
    }

    /// Feed records if loaded, else the filtered records, else nothing
    pub fn merged_transactions(&self) -> Option<Vec<Transaction>> {
        self.active_source().into_records()
    }

    pub fn max_pages(&self) -> i64 {
        self.feed.next_page().map(i64::from).unwrap_or(-1)
    }

    pub fn show_load_more(&self) -> bool {
        let state = read(&self.state);
        load_more_offered(
            &state.phase,
            state.load_more_visible,
            self.feed.is_loaded(),
            state.page_count,
            self.max_pages(),
        )
    }

    pub fn phase(&self) -> Phase {
        read(&self.state).phase.clone()
    }

    pub fn page_count(&self) -> u32 {
        read(&self.state).page_count
    }

    pub fn load_more_visible(&self) -> bool {
        read(&self.state).load_more_visible
    }

    pub fn is_initial_loading(&self) -> bool {
        self.initial_loading.is_loading()
    }

    pub fn last_error(&self) -> Option<ErrorDetails> {
        read(&self.state).last_error.clone()
    }

    /// Selector entries, "all employees" first; empty until the directory loads
    pub fn employee_options(&self) -> Vec<Employee> {
        self.directory.options()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let (phase, page_count, load_more_visible, last_error) = {
            let state = read(&self.state);
            (
                state.phase.clone(),
                state.page_count,
                state.load_more_visible,
                state.last_error.clone(),
            )
        };
        let source = self.active_source();
        let max_pages = match &source {
            ActiveSource::All(page) => page.next_page.map(i64::from).unwrap_or(-1),
            _ => -1,
        };
        let feed_loaded = matches!(source, ActiveSource::All(_));

        ViewSnapshot {
            show_load_more: load_more_offered(&phase, load_more_visible, feed_loaded, page_count, max_pages),
            phase,
            transactions: source.into_records(),
            page_count,
            max_pages,
            load_more_visible,
            is_initial_loading: self.is_initial_loading(),
            feed_loading: self.feed.is_loading(),
            filtered_loading: self.filtered.is_loading(),
            last_error,
        }
    }

    // ==================== Internals ====================

    fn begin_all_selection(&self, state: &mut ViewState) -> u64 {
        state.selection_epoch += 1;
        state.default_load_issued = true;
        state.phase = Phase::AllActive;
        state.page_count = 0;
        state.load_more_visible = false;
        self.filtered.invalidate();
        self.feed.invalidate();
        state.selection_epoch
    }

    /// Apply the result of a fetch issued under `epoch`
    fn settle(
        &self,
        epoch: u64,
        result: CoreResult<FetchStatus>,
        operation: &str,
        advance_page: bool,
    ) -> TransitionOutcome {
        let mut state = write(&self.state);
        let current = state.selection_epoch == epoch;

        match result {
            Err(error) => {
                log_error(&error, operation);
                if !current {
                    return TransitionOutcome::Superseded;
                }
                state.last_error = Some(error.to_details());
                TransitionOutcome::Failed
            }
            Ok(FetchStatus::Discarded) => TransitionOutcome::Superseded,
            Ok(_) if !current => TransitionOutcome::Superseded,
            Ok(FetchStatus::Exhausted) => {
                // nothing was appended; only the hidden control comes back
                state.load_more_visible = true;
                log::debug!(target: "spendview::coordinator", "{} found no further page", operation);
                TransitionOutcome::Ignored
            }
            Ok(FetchStatus::Applied) => {
                if advance_page {
                    state.page_count += 1;
                }
                state.load_more_visible = true;
                state.last_error = None;
                log::debug!(
                    target: "spendview::coordinator",
                    "{} settled: page {}, phase {:?}",
                    operation,
                    state.page_count,
                    state.phase
                );
                TransitionOutcome::Completed
            }
        }
    }
}

// ==================== Tests ====================
