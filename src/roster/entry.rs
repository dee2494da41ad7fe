//! Roster entries.
//!
//! A [`RosterEntry`] is a cheap, cloneable handle onto one tracked player.
//! It caches the player's dense index, which the owning roster keeps equal
//! to the player's rank. Once the player is removed the index becomes
//! [`INVALID_INDEX`] for good.

use std::sync::atomic::{AtomicIsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::attributes::Attributes;
use super::error::RosterError;
use crate::core::player::PlayerId;

/// Index of an entry that is no longer tracked.
pub const INVALID_INDEX: isize = -1;

#[derive(Debug)]
struct EntryInner {
    player: PlayerId,
    name: String,
    index: AtomicIsize,
    attributes: Mutex<Attributes>,
}

/// Handle onto a tracked player.
///
/// Clones share state: an index change made by the roster is visible
/// through every clone.
#[derive(Clone, Debug)]
pub struct RosterEntry {
    inner: Arc<EntryInner>,
}

impl RosterEntry {
    pub(crate) fn new(player: PlayerId, name: impl Into<String>, index: usize) -> Self {
        Self {
            inner: Arc::new(EntryInner {
                player,
                name: name.into(),
                index: AtomicIsize::new(index as isize),
                attributes: Mutex::new(Attributes::new()),
            }),
        }
    }

    #[must_use]
    pub fn player(&self) -> &PlayerId {
        &self.inner.player
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Dense index of the entry.
    ///
    /// # Errors
    ///
    /// [`RosterError::StaleEntry`] once the entry has been removed.
    pub fn index(&self) -> Result<usize, RosterError> {
        usize::try_from(self.raw_index()).map_err(|_| RosterError::StaleEntry {
            player: self.inner.player.clone(),
        })
    }

    /// Cached index, [`INVALID_INDEX`] once removed.
    #[must_use]
    pub fn raw_index(&self) -> isize {
        self.inner.index.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.raw_index() >= 0
    }

    pub fn set_attribute(&self, name: impl Into<String>) -> bool {
        self.inner.attributes.lock().set(name)
    }

    pub fn clear_attribute(&self, name: &str) -> bool {
        self.inner.attributes.lock().clear(name)
    }

    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.inner.attributes.lock().is_set(name)
    }

    pub fn clear_attributes(&self) {
        self.inner.attributes.lock().clear_all();
    }

    /// Point-in-time copy of the entry.
    #[must_use]
    pub fn snapshot(&self) -> EntrySnapshot {
        EntrySnapshot {
            player: self.inner.player.clone(),
            name: self.inner.name.clone(),
            index: self.raw_index(),
            attributes: self.inner.attributes.lock().clone(),
        }
    }

    /// Whether both handles refer to the same entry.
    #[must_use]
    pub fn same_entry(&self, other: &RosterEntry) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn shift_down(&self) {
        self.inner.index.fetch_sub(1, Ordering::AcqRel);
    }

    pub(crate) fn invalidate(&self) {
        self.inner.index.store(INVALID_INDEX, Ordering::Release);
    }
}

/// Frozen copy of a [`RosterEntry`], carried by removal events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntrySnapshot {
    pub player: PlayerId,
    pub name: String,
    pub index: isize,
    pub attributes: Attributes,
}

impl EntrySnapshot {
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.is_set(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::attributes::DEALT;

    #[test]
    fn test_clones_share_state() {
        let entry = RosterEntry::new(PlayerId::new("1"), "The Shark", 1);
        let other = entry.clone();
        entry.set_attribute(DEALT);
        assert!(other.has_attribute(DEALT));
        entry.shift_down();
        assert_eq!(other.index(), Ok(0));
        assert!(entry.same_entry(&other));
    }

    #[test]
    fn test_invalidated_entry_is_stale() {
        let entry = RosterEntry::new(PlayerId::new("3"), "c", 2);
        entry.invalidate();
        assert!(!entry.is_valid());
        assert_eq!(entry.raw_index(), INVALID_INDEX);
        assert_eq!(
            entry.index(),
            Err(RosterError::StaleEntry {
                player: PlayerId::new("3")
            })
        );
    }

    #[test]
    fn test_snapshot_is_frozen() {
        let entry = RosterEntry::new(PlayerId::new("2"), "b", 1);
        entry.set_attribute(DEALT);
        let snapshot = entry.snapshot();
        entry.clear_attributes();
        entry.invalidate();
        assert_eq!(snapshot.index, 1);
        assert!(snapshot.has_attribute(DEALT));
        assert!(!entry.has_attribute(DEALT));
    }
}
