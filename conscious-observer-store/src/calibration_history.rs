// conscious-observer-store/src/calibration_history.rs
// ============================================================================
// Module: In-Memory Calibration History Store
// Description: TTL-bounded, mutex-guarded per-domain calibration curves.
// Purpose: Feed the calibrator (C7 step 2) a domain's correction history.
// Dependencies: conscious-observer-core, std::sync
// ============================================================================

//! ## Overview
//! [`conscious_observer_core::CalibrationHistoryStore`] is read-only from
//! the orchestrator's point of view (`history_for` only); this backend adds
//! an inherent [`InMemoryCalibrationHistoryStore::record`] a caller (the CLI,
//! after it observes a Gate-Out outcome) uses to update the curve between
//! invocations within the same process. Nothing here survives a restart —
//! persistent calibration learning is a non-goal.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use async_trait::async_trait;
use conscious_observer_core::CalibrationHistoryEntry;
use conscious_observer_core::CalibrationHistoryStore;
use conscious_observer_core::DomainTag;

/// Default time a domain's history is kept before being swept as stale.
const DEFAULT_TTL: Duration = Duration::from_secs(3_600);

struct DomainHistory {
    entries: Vec<CalibrationHistoryEntry>,
    updated_at: Instant,
}

/// A `Mutex<HashMap<String, DomainHistory>>`-backed
/// [`CalibrationHistoryStore`] with a fixed TTL per domain.
pub struct InMemoryCalibrationHistoryStore {
    ttl: Duration,
    domains: Mutex<HashMap<String, DomainHistory>>,
}

impl std::fmt::Debug for InMemoryCalibrationHistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCalibrationHistoryStore").field("ttl", &self.ttl).finish()
    }
}

impl Default for InMemoryCalibrationHistoryStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }
}

impl InMemoryCalibrationHistoryStore {
    /// Builds a store whose per-domain history expires after `ttl` of
    /// inactivity.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl, domains: Mutex::new(HashMap::new()) }
    }

    /// Appends one calibration sample for `domain`, replacing the domain's
    /// history if its prior entry had gone stale.
    pub fn record(&self, domain: &DomainTag, entry: CalibrationHistoryEntry) {
        let now = Instant::now();
        let mut guard = self.domains.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let key = domain.as_str().to_owned();
        let stale = guard.get(&key).is_some_and(|history| now.duration_since(history.updated_at) >= self.ttl);
        if stale {
            guard.remove(&key);
        }
        let history = guard.entry(key).or_insert(DomainHistory { entries: Vec::new(), updated_at: now });
        history.entries.push(entry);
        history.updated_at = now;
    }
}

#[async_trait]
impl CalibrationHistoryStore for InMemoryCalibrationHistoryStore {
    async fn history_for(&self, domain: &DomainTag) -> Vec<CalibrationHistoryEntry> {
        let now = Instant::now();
        let guard = self.domains.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        guard
            .get(domain.as_str())
            .filter(|history| now.duration_since(history.updated_at) < self.ttl)
            .map(|history| history.entries.clone())
            .unwrap_or_default()
    }
}
