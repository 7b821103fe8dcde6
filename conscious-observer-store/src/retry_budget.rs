// conscious-observer-store/src/retry_budget.rs
// ============================================================================
// Module: In-Memory Retry Budget Store
// Description: TTL-bounded, mutex-guarded retry counter keyed by output id.
// Purpose: Back Gate-Out's "max N retries per output" rule (§4.7, §9).
// Dependencies: conscious-observer-core, std::sync
// ============================================================================

//! ## Overview
//! One invocation's Gate-Out retries share a single [`OutputId`] across the
//! whole retry loop, so a simple count-and-expire map is sufficient: no
//! invocation runs long enough for the TTL to matter, and the TTL exists only
//! to bound memory if a caller never calls
//! [`InMemoryRetryBudgetStore::try_consume`]'s paired
//! [`RetryBudgetStore::clear`].

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use async_trait::async_trait;
use conscious_observer_core::OutputId;
use conscious_observer_core::RetryBudgetStore;

/// Default time an unreferenced retry counter is kept before being treated
/// as expired and reset.
const DEFAULT_TTL: Duration = Duration::from_secs(300);

struct Entry {
    count: u32,
    inserted_at: Instant,
}

/// A `Mutex<HashMap<String, Entry>>`-backed [`RetryBudgetStore`] with a
/// fixed TTL per entry.
pub struct InMemoryRetryBudgetStore {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl std::fmt::Debug for InMemoryRetryBudgetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRetryBudgetStore").field("ttl", &self.ttl).finish()
    }
}

impl Default for InMemoryRetryBudgetStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }
}

impl InMemoryRetryBudgetStore {
    /// Builds a store whose entries expire after `ttl` of inactivity.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl, entries: Mutex::new(HashMap::new()) }
    }

    /// Number of live (non-expired) entries currently tracked; exposed for
    /// tests and operational introspection.
    #[must_use]
    pub fn live_entry_count(&self) -> usize {
        let now = Instant::now();
        let guard = self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.values().filter(|entry| now.duration_since(entry.inserted_at) < self.ttl).count()
    }
}

#[async_trait]
impl RetryBudgetStore for InMemoryRetryBudgetStore {
    async fn try_consume(&self, output_id: &OutputId, max_retries: u32) -> Option<u32> {
        let now = Instant::now();
        let mut guard = self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let key = output_id.as_str().to_owned();
        let expired = guard.get(&key).is_some_and(|entry| now.duration_since(entry.inserted_at) >= self.ttl);
        if expired {
            guard.remove(&key);
        }
        let entry = guard.entry(key).or_insert(Entry { count: 0, inserted_at: now });
        if entry.count >= max_retries {
            return None;
        }
        entry.count += 1;
        Some(entry.count)
    }

    async fn clear(&self, output_id: &OutputId) {
        let mut guard = self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.remove(output_id.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn consumes_up_to_the_max_then_returns_none() {
        let store = InMemoryRetryBudgetStore::default();
        let id = OutputId::new("out-1");
        assert_eq!(store.try_consume(&id, 2).await, Some(1));
        assert_eq!(store.try_consume(&id, 2).await, Some(2));
        assert_eq!(store.try_consume(&id, 2).await, None);
    }

    #[tokio::test]
    async fn clear_resets_the_counter() {
        let store = InMemoryRetryBudgetStore::default();
        let id = OutputId::new("out-2");
        store.try_consume(&id, 1).await;
        store.clear(&id).await;
        assert_eq!(store.try_consume(&id, 1).await, Some(1));
    }

    #[tokio::test]
    async fn an_expired_entry_starts_fresh() {
        let store = InMemoryRetryBudgetStore::with_ttl(Duration::from_millis(10));
        let id = OutputId::new("out-3");
        assert_eq!(store.try_consume(&id, 1).await, Some(1));
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(store.try_consume(&id, 1).await, Some(1));
    }
}
