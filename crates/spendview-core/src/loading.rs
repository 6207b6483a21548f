//! Loading flags with guaranteed cleanup

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Counts in-flight requests; loading while the count is non-zero
#[derive(Debug, Default)]
pub struct LoadingFlag {
    in_flight: AtomicUsize,
}

impl LoadingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one request as started; dropping the guard marks it finished
    pub fn begin(&self) -> LoadingGuard<'_> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        LoadingGuard { flag: self }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }
}

/// Clears its share of the flag on drop, whether the request succeeded,
/// failed or the future was dropped
#[derive(Debug)]
pub struct LoadingGuard<'a> {
    flag: &'a LoadingFlag,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.flag.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

// State locks are never held across an await, so a poisoned lock only means
// a panic elsewhere; the data itself is still consistent.
pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
