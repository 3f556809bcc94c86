use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use folio_core::error::{FolioError, Result};

/// External counter behind `/api/visitor-count`.
///
/// `increment` must be a single atomic operation on the store side; callers
/// hold no lock and never read-modify-write.
#[async_trait]
pub trait CounterStore: Send + Sync {
    fn backend(&self) -> &'static str;
    /// Current value; a missing key reads as 0.
    async fn read(&self) -> Result<u64>;
    /// Increment by one and return the new value.
    async fn increment(&self) -> Result<u64>;
}

/// In-process counter for local development and tests.
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    value: AtomicU64,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(value: u64) -> Self {
        Self {
            value: AtomicU64::new(value),
        }
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn read(&self) -> Result<u64> {
        Ok(self.value.load(Ordering::SeqCst))
    }

    async fn increment(&self) -> Result<u64> {
        Ok(self.value.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// Stand-in when the configured backend has no credentials.
#[derive(Debug)]
pub struct DisabledCounterStore {
    missing: &'static str,
}

impl DisabledCounterStore {
    pub fn new(missing: &'static str) -> Self {
        Self { missing }
    }
}

#[async_trait]
impl CounterStore for DisabledCounterStore {
    fn backend(&self) -> &'static str {
        "disabled"
    }

    async fn read(&self) -> Result<u64> {
        Err(FolioError::NotConfigured(self.missing))
    }

    async fn increment(&self) -> Result<u64> {
        Err(FolioError::NotConfigured(self.missing))
    }
}
