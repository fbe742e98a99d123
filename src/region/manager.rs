/*!
 * Region Manager
 * Create/attach/detach/destroy lifecycle for shared regions, keyed by a
 * well-known lookup key
 *
 * Destroy follows reclaim semantics: the backing entry is removed from the
 * lookup table immediately, while participants already holding a handle keep
 * a valid view until they drop it.
 */

use super::region::{RegionHandle, SharedRegion};
use crate::core::errors::RegionError;
use crate::core::types::Pid;
use ahash::RandomState;
use dashmap::DashMap;
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

/// Well-known lookup key for a shared region
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegionKey(String);

impl RegionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RegionKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl std::fmt::Display for RegionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

struct RegionEntry {
    handle: RegionHandle,
    attached: Mutex<HashSet<Pid>>,
}

/// Region lifecycle manager
///
/// Cloneable; all clones share the same lookup table so tests can build
/// isolated managers per case.
pub struct RegionManager {
    regions: Arc<DashMap<RegionKey, RegionEntry, RandomState>>,
}

impl RegionManager {
    pub fn new() -> Self {
        Self {
            regions: Arc::new(DashMap::with_hasher(RandomState::new())),
        }
    }

    /// Create and zero-fill a region sized for exactly `candidate_count`
    /// records
    ///
    /// A stale region under the same key is reclaimed; if it still has
    /// attached participants, creation fails.
    pub fn initialize(
        &self,
        key: &RegionKey,
        candidate_count: usize,
    ) -> Result<RegionHandle, RegionError> {
        if candidate_count == 0 {
            return Err(RegionError::AllocationFailed(
                "candidate count cannot be zero".to_string(),
            ));
        }

        if let Some(entry) = self.regions.get(key) {
            let attached = entry.attached.lock().len();
            if attached > 0 {
                return Err(RegionError::AllocationFailed(format!(
                    "region '{}' still attached by {} participants",
                    key, attached
                )));
            }
            drop(entry);
            warn!("Region '{}' already exists, reclaiming stale region", key);
            self.regions.remove(key);
        }

        let handle: RegionHandle = Arc::new(SharedRegion::new(candidate_count));
        self.regions.insert(
            key.clone(),
            RegionEntry {
                handle: handle.clone(),
                attached: Mutex::new(HashSet::new()),
            },
        );

        info!(
            "Created region '{}' sized for {} candidates",
            key, candidate_count
        );
        Ok(handle)
    }

    /// Map an existing region; fails with NotFound when none exists
    pub fn attach(&self, key: &RegionKey, pid: Pid) -> Result<RegionHandle, RegionError> {
        let entry = self
            .regions
            .get(key)
            .ok_or_else(|| RegionError::NotFound(key.to_string()))?;

        entry.attached.lock().insert(pid);
        debug!("PID {} attached to region '{}'", pid, key);
        Ok(entry.handle.clone())
    }

    /// Unmap without destroying
    pub fn detach(&self, key: &RegionKey, pid: Pid) -> Result<(), RegionError> {
        let entry = self
            .regions
            .get(key)
            .ok_or_else(|| RegionError::NotFound(key.to_string()))?;

        if entry.attached.lock().remove(&pid) {
            debug!("PID {} detached from region '{}'", pid, key);
        } else {
            warn!("PID {} was not attached to region '{}'", pid, key);
        }
        Ok(())
    }

    /// Unmap and reclaim backing storage; lifecycle controller only
    pub fn destroy(&self, key: &RegionKey) -> Result<(), RegionError> {
        let (_, entry) = self
            .regions
            .remove(key)
            .ok_or_else(|| RegionError::NotFound(key.to_string()))?;

        let attached = entry.attached.lock().len();
        if attached > 0 {
            warn!(
                "Destroyed region '{}' with {} participants still attached",
                key, attached
            );
        } else {
            info!("Destroyed region '{}'", key);
        }
        Ok(())
    }

    /// Number of participants currently attached
    pub fn attached_count(&self, key: &RegionKey) -> Result<usize, RegionError> {
        let entry = self
            .regions
            .get(key)
            .ok_or_else(|| RegionError::NotFound(key.to_string()))?;
        let count = entry.attached.lock().len();
        Ok(count)
    }
}

impl Default for RegionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RegionManager {
    fn clone(&self) -> Self {
        Self {
            regions: Arc::clone(&self.regions),
        }
    }
}
