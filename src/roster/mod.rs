//! Player roster with dense indices.
//!
//! ## Key Types
//!
//! - `Roster`: id-ordered set plus dense entry list, tail-append only
//! - `RosterEntry`: shared handle caching a player's index and round flags
//! - `Dispatcher` / `Delivery`: ordered event fan-out, optionally through
//!   an affinity thread
//! - `RosterError`: invariant violations

pub mod attributes;
pub mod dispatch;
pub mod entry;
pub mod error;
pub mod list;

pub use attributes::{Attributes, DEALT};
pub use dispatch::{Delivery, Dispatcher, RosterEvent, SubscriptionToken};
pub use entry::{EntrySnapshot, RosterEntry, INVALID_INDEX};
pub use error::RosterError;
pub use list::Roster;
