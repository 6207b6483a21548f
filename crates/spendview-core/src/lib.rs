//! Core transaction view logic
//!
//! A [`ViewCoordinator`] presents one transaction list backed by two
//! mutually exclusive caches: the paginated feed of all transactions
//! ([`FeedCache`]) and the transactions of one selected employee
//! ([`FilteredCache`]). Requests go through a [`TransactionApi`].

pub mod coordinator;
pub mod directory;
pub mod error;
pub mod feed;
pub mod filtered;
pub mod fixture;
pub mod loading;
pub mod source;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::{ActiveSource, Phase, TransitionOutcome, ViewCoordinator, ViewSnapshot};
pub use directory::DirectoryLoader;
pub use error::{CoreError, CoreResult, ErrorCode, ErrorDetails, ErrorSeverity};
pub use feed::FeedCache;
pub use filtered::FilteredCache;
pub use fixture::{FixtureApi, FixtureData};
pub use source::{ApiRef, TransactionApi};
pub use types::{Employee, FeedPage, FetchStatus, FilteredResult, PaginatedResponse, Transaction};
