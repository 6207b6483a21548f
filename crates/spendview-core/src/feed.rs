//! Paginated cache of the unfiltered transaction feed

use std::sync::RwLock;

use crate::error::CoreResult;
use crate::loading::{read, write, LoadingFlag};
use crate::source::ApiRef;
use crate::types::{FeedPage, FetchStatus};

#[derive(Debug, Default)]
struct FeedState {
    page: Option<FeedPage>,
    /// Bumped by every invalidate
    generation: u64,
}

pub struct FeedCache {
    api: ApiRef,
    state: RwLock<FeedState>,
    loading: LoadingFlag,
}

impl FeedCache {
    pub fn new(api: ApiRef) -> Self {
        Self {
            api,
            state: RwLock::new(FeedState::default()),
            loading: LoadingFlag::new(),
        }
    }

    /// Fetch the page at the cursor and append it
    ///
    /// Starts from page zero when nothing is loaded. Once the cursor is
    /// absent the feed is exhausted and no request is made. A result that
    /// arrives after an invalidate, or after another fetch moved the cursor,
    /// is dropped.
    pub async fn fetch_page(&self) -> CoreResult<FetchStatus> {
        let (generation, cursor) = {
            let state = read(&self.state);
            let cursor = state.page.as_ref().map(|page| page.next_page);
            (state.generation, cursor)
        };
        let page_index = match cursor {
            None => 0,
            Some(Some(next)) => next,
            Some(None) => {
                log::debug!(target: "spendview::feed", "Feed exhausted, nothing to fetch");
                return Ok(FetchStatus::Exhausted);
            }
        };

        let response = {
            let _loading = self.loading.begin();
            log::debug!(target: "spendview::feed", "Fetching page {}", page_index);
            self.api.paginated_transactions(page_index).await?
        };

        let mut state = write(&self.state);
        let current_cursor = state.page.as_ref().map(|page| page.next_page);
        if state.generation != generation || current_cursor != cursor {
            log::debug!(
                target: "spendview::feed",
                "Dropping page {}: cache changed while it was in flight",
                page_index
            );
            return Ok(FetchStatus::Discarded);
        }

        let received = response.data.len();
        match state.page.as_mut() {
            Some(page) => page.append(response),
            None => state.page = Some(FeedPage::from(response)),
        }
        log::info!(
            target: "spendview::feed",
            "Page {} appended {} records (next page: {:?})",
            page_index,
            received,
            state.page.as_ref().and_then(|page| page.next_page)
        );
        Ok(FetchStatus::Applied)
    }

    /// Drop everything fetched so far; the next fetch starts at page zero
    pub fn invalidate(&self) {
        let mut state = write(&self.state);
        state.page = None;
        state.generation += 1;
    }

    pub fn data(&self) -> Option<FeedPage> {
        read(&self.state).page.clone()
    }

    pub fn is_loaded(&self) -> bool {
        read(&self.state).page.is_some()
    }

    /// Cursor of the next page; `None` when not loaded or exhausted
    pub fn next_page(&self) -> Option<u32> {
        read(&self.state).page.as_ref().and_then(|page| page.next_page)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// Update the approval flag of a cached record; false if it is not cached
    pub fn set_approval(&self, transaction_id: &str, approved: bool) -> bool {
        let mut state = write(&self.state);
        state
            .page
            .as_mut()
            .and_then(|page| page.records.iter_mut().find(|t| t.id == transaction_id))
            .map(|record| record.approved = approved)
            .is_some()
    }
}
