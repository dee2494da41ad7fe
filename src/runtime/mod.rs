//! Threads and tasks around the table.
//!
//! ## Key Types
//!
//! - `AffinityThread`: designated thread for affinity-bound callbacks
//! - `TableWorker` / `TableHandle`: FIFO single-worker queue owning a table
//! - `AutoDealer`: recurring poll that deals the house when everyone is dealt

pub mod affinity;
pub mod auto_deal;
pub mod worker;

pub use affinity::AffinityThread;
pub use auto_deal::{AutoDealTiming, AutoDealer};
pub use worker::{TableCommand, TableHandle, TableWorker, WorkerError};
