//! Aggregated load progress across a set of resources.
//!
//! A [`ProgressTracker`] is owned by whoever starts the loads (the gameplay
//! screen in the client). Resources are registered up front, then marked
//! loaded or failed as the fetches resolve. The tracker reports a single
//! percentage computed from how many registered resources have finished.
//!
//! Failed resources never count as loaded, so a failure looks exactly like a
//! stalled fetch to observers: progress stops short of 100.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{Error, Result};

/// Load status of a single tracked resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// Fetch issued, not yet resolved.
    #[default]
    Pending,
    /// Resource and all of its dependencies are available.
    Loaded,
    /// Fetch failed. Counts as outstanding for progress purposes.
    Failed,
}

/// Tracks the load status of a set of resources keyed by `K`.
#[derive(Debug, Clone)]
pub struct ProgressTracker<K> {
    statuses: HashMap<K, LoadStatus>,
}

impl<K> Default for ProgressTracker<K> {
    fn default() -> Self {
        Self {
            statuses: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone + Debug> ProgressTracker<K> {
    /// Register a resource as pending.
    ///
    /// Returns false if the resource was already registered, in which case its
    /// status is left untouched.
    pub fn register(&mut self, id: K) -> bool {
        if self.statuses.contains_key(&id) {
            tracing::warn!("{id:?} registered twice; keeping its current status");
            return false;
        }
        self.statuses.insert(id, LoadStatus::Pending);
        true
    }

    /// Mark a resource as loaded.
    ///
    /// Returns whether the status changed.
    pub fn mark_loaded(&mut self, id: &K) -> Result<bool> {
        let status = self.status_mut(id)?;
        if *status == LoadStatus::Loaded {
            return Ok(false);
        }
        *status = LoadStatus::Loaded;
        Ok(true)
    }

    /// Mark a resource as failed.
    ///
    /// A resource that already loaded stays loaded, which keeps progress
    /// non-decreasing. Returns whether the status changed.
    pub fn mark_failed(&mut self, id: &K) -> Result<bool> {
        let status = self.status_mut(id)?;
        if *status != LoadStatus::Pending {
            return Ok(false);
        }
        *status = LoadStatus::Failed;
        Ok(true)
    }

    /// Status of a resource, if registered.
    pub fn status(&self, id: &K) -> Option<LoadStatus> {
        self.statuses.get(id).copied()
    }

    /// Resources still pending (not loaded and not failed).
    pub fn pending(&self) -> impl Iterator<Item = &K> {
        self.statuses
            .iter()
            .filter(|(_, status)| **status == LoadStatus::Pending)
            .map(|(id, _)| id)
    }

    /// Number of registered resources.
    pub fn registered(&self) -> usize {
        self.statuses.len()
    }

    /// Number of loaded resources.
    pub fn loaded(&self) -> usize {
        self.count(LoadStatus::Loaded)
    }

    /// Number of failed resources.
    pub fn failed(&self) -> usize {
        self.count(LoadStatus::Failed)
    }

    /// Completion percentage in `[0, 100]`.
    ///
    /// An empty tracker reports 0: nothing has started, so nothing is done.
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f32 {
        let total = self.registered();
        if total == 0 {
            return 0.0;
        }
        self.loaded() as f32 / total as f32 * 100.0
    }

    /// Whether every registered resource has loaded.
    pub fn is_complete(&self) -> bool {
        self.registered() > 0 && self.loaded() == self.registered()
    }

    fn count(&self, wanted: LoadStatus) -> usize {
        self.statuses.values().filter(|s| **s == wanted).count()
    }

    fn status_mut(&mut self, id: &K) -> Result<&mut LoadStatus> {
        self.statuses
            .get_mut(id)
            .ok_or_else(|| Error::UnknownResource {
                id: format!("{id:?}"),
            })
    }
}
