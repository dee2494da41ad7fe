//! Round-local flags attached to roster entries.
//!
//! Flags are plain names: present means set. They live on the roster entry,
//! not on the player, so round bookkeeping never touches player state.

use rustc_hash::FxHashSet;

/// Flag set when a participant's hand has been dealt this round.
pub const DEALT: &str = "dealt";

/// A set of named boolean flags.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes {
    flags: FxHashSet<String>,
}

impl Attributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a flag. Returns `true` if it was not already set.
    pub fn set(&mut self, name: impl Into<String>) -> bool {
        self.flags.insert(name.into())
    }

    /// Clear a flag. Returns `true` if it was set.
    pub fn clear(&mut self, name: &str) -> bool {
        self.flags.remove(name)
    }

    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.flags.contains(name)
    }

    pub fn clear_all(&mut self) {
        self.flags.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Set flags in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.flags.iter().cloned().collect();
        names.sort();
        names
    }
}
