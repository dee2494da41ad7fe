//! The roster: an id-ordered player set with dense, stable indices.
//!
//! Members are kept in two parallel structures: an ordered map keyed by
//! player id, and a dense list of entries where an entry's position equals
//! its cached index. Index 0 is conventionally the house.
//!
//! ## Invariants
//!
//! - Valid indices are exactly `0..len()`, each used once.
//! - An entry's index equals its player's rank (members with a smaller id).
//! - New members are appended: a player whose rank would not be `len()` is
//!   rejected with [`RosterError::OutOfOrderInsert`].
//! - Removing index `k` shifts every index above `k` down by one, leaves
//!   lower indices alone, and sets the removed entry to `INVALID_INDEX`.
//!
//! No roster lock is held while subscribers run.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;
use parking_lot::Mutex;
use rustc_hash::FxHashSet;

use super::dispatch::{Delivery, Dispatcher, RosterEvent, SubscriptionToken};
use super::entry::RosterEntry;
use super::error::RosterError;
use crate::core::player::PlayerId;
use crate::runtime::affinity::AffinityThread;

#[derive(Debug, Default)]
struct Members {
    by_id: BTreeMap<PlayerId, RosterEntry>,
    dense: Vec<RosterEntry>,
    // Ids whose removal has been announced but not yet erased.
    removing: FxHashSet<PlayerId>,
}

impl Members {
    fn rank(&self, id: &PlayerId) -> usize {
        self.by_id.range(..id).count()
    }

    fn check_append(&self, id: &PlayerId) -> Result<(), RosterError> {
        if self.by_id.contains_key(id) {
            return Ok(());
        }
        let rank = self.rank(id);
        let tail = self.dense.len();
        if rank != tail {
            return Err(RosterError::OutOfOrderInsert {
                player: id.clone(),
                rank,
                tail,
            });
        }
        Ok(())
    }

    // Single index-shift routine run once per removal.
    fn erase(&mut self, entry: &RosterEntry) -> bool {
        let Some(pos) = self.dense.iter().position(|e| e.same_entry(entry)) else {
            return false;
        };
        let removed_index = entry.raw_index();
        self.by_id.remove(entry.player());
        self.dense.remove(pos);
        for other in &self.dense {
            if other.raw_index() > removed_index {
                other.shift_down();
            }
        }
        entry.invalidate();
        true
    }
}

/// Identity-keyed player set exposing dense indices.
#[derive(Debug)]
pub struct Roster {
    members: Mutex<Members>,
    dispatcher: Dispatcher,
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

impl Roster {
    /// Roster whose subscribers all run on the broadcasting thread.
    #[must_use]
    pub fn new() -> Self {
        Self {
            members: Mutex::new(Members::default()),
            dispatcher: Dispatcher::new(None),
        }
    }

    /// Roster that can deliver to affinity-bound subscribers.
    #[must_use]
    pub fn with_affinity(affinity: Arc<AffinityThread>) -> Self {
        Self {
            members: Mutex::new(Members::default()),
            dispatcher: Dispatcher::new(Some(affinity)),
        }
    }

    #[must_use]
    pub fn affinity(&self) -> Option<&Arc<AffinityThread>> {
        self.dispatcher.affinity()
    }

    /// Check that `id` is tracked already or would be appended at the tail.
    ///
    /// # Errors
    ///
    /// [`RosterError::OutOfOrderInsert`] when adding `id` would land it
    /// anywhere but the tail.
    pub fn check_append(&self, id: &PlayerId) -> Result<(), RosterError> {
        self.members.lock().check_append(id)
    }

    /// Entry for `id`, creating and announcing it if not yet tracked.
    ///
    /// An existing entry is returned unchanged, whatever `name` says.
    ///
    /// # Errors
    ///
    /// [`RosterError::OutOfOrderInsert`] when `id` would not be the tail.
    pub fn get_or_create(&self, id: &PlayerId, name: &str) -> Result<RosterEntry, RosterError> {
        let entry = {
            let mut members = self.members.lock();
            if let Some(existing) = members.by_id.get(id) {
                return Ok(existing.clone());
            }
            members.check_append(id)?;

            let entry = RosterEntry::new(id.clone(), name, members.dense.len());
            members.by_id.insert(id.clone(), entry.clone());
            members.dense.push(entry.clone());
            entry
        };

        debug!("Roster added {} ({}) at index {}", id, name, entry.raw_index());
        self.dispatcher.dispatch(&RosterEvent::Added(entry.clone()));
        Ok(entry)
    }

    /// Remove `id`. Subscribers see the removal before the roster changes.
    ///
    /// Returns `false` if `id` was not tracked, or if another caller is
    /// already removing it. Only the caller that claims the removal
    /// broadcasts [`RosterEvent::Removed`].
    pub fn remove(&self, id: &PlayerId) -> bool {
        let entry = {
            let mut members = self.members.lock();
            let Some(entry) = members.by_id.get(id).cloned() else {
                return false;
            };
            if !members.removing.insert(id.clone()) {
                return false;
            }
            entry
        };

        self.dispatcher.dispatch(&RosterEvent::Removed(entry.snapshot()));

        let erased = {
            let mut members = self.members.lock();
            members.removing.remove(id);
            members.erase(&entry)
        };
        if erased {
            debug!("Roster removed {id}");
        }
        erased
    }

    /// Rank of `id` among tracked players, `None` if not tracked.
    #[must_use]
    pub fn index_of(&self, id: &PlayerId) -> Option<usize> {
        let members = self.members.lock();
        members.by_id.contains_key(id).then(|| members.rank(id))
    }

    #[must_use]
    pub fn entry(&self, id: &PlayerId) -> Option<RosterEntry> {
        self.members.lock().by_id.get(id).cloned()
    }

    #[must_use]
    pub fn entry_at(&self, index: usize) -> Option<RosterEntry> {
        self.members.lock().dense.get(index).cloned()
    }

    /// All entries in index order.
    #[must_use]
    pub fn entries(&self) -> Vec<RosterEntry> {
        self.members.lock().dense.clone()
    }

    /// Tracked ids in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<PlayerId> {
        self.members.lock().by_id.keys().cloned().collect()
    }

    #[must_use]
    pub fn contains(&self, id: &PlayerId) -> bool {
        self.members.lock().by_id.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.lock().dense.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.lock().dense.is_empty()
    }

    /// Subscribe to membership changes.
    ///
    /// # Errors
    ///
    /// [`RosterError::NoAffinityThread`] for an `Affinity` subscriber on a
    /// roster built without one.
    pub fn subscribe<F>(
        &self,
        name: impl Into<String>,
        delivery: Delivery,
        handler: F,
    ) -> Result<SubscriptionToken, RosterError>
    where
        F: Fn(&RosterEvent) + Send + Sync + 'static,
    {
        self.dispatcher.subscribe(name, delivery, handler)
    }

    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        self.dispatcher.unsubscribe(token)
    }
}
